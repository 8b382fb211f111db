//! CLI binary for pdftitle.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RunConfig` and prints per-file results.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use pdftitle::pipeline::input::parse_path_list;
use pdftitle::{
    run_batch, BatchProgressCallback, BatchSummary, DocumentMetadata, FileOutcome, PdfTitleError,
    ProgressCallback, RunConfig,
};
use std::io::{self, IsTerminal, Read};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints the per-file banner and results, with an optional indicatif bar
/// pinned below the log lines.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl CliProgressCallback {
    fn new(show_bar: bool, quiet: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Processing");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar, quiet })
    }

    /// Print to stdout without tearing the progress bar.
    fn out(&self, line: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        let line = line.as_ref();
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    /// Print to stderr; shown even in quiet mode.
    fn err(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }

    fn print_metadata(&self, meta: &DocumentMetadata) {
        self.out("--- Metadata Found ---");
        let rows = [
            ("Title", &meta.title),
            ("Author", &meta.author),
            ("Subject", &meta.subject),
            ("Keywords", &meta.keywords),
            ("Creation Date", &meta.creation_date),
            ("Modification Date", &meta.modification_date),
            ("Normalized", &meta.normalized),
        ];
        for (label, value) in rows {
            if let Some(v) = value {
                self.out(format!("{:<19}{}", format!("{label}:"), v));
            }
        }
        self.out("----------------------");
    }

    fn advance(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
        self.out("---");
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(bar) = &self.bar {
            bar.set_length(total_files as u64);
        }
    }

    fn on_file_start(&self, _index: usize, _total: usize, path: &Path) {
        self.out(format!("{} {}", cyan("Processing:"), path.display()));
        if let Some(bar) = &self.bar {
            bar.set_message(path.display().to_string());
        }
    }

    fn on_file_complete(&self, _index: usize, _total: usize, _path: &Path, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Inspected(meta) => self.print_metadata(meta),
            FileOutcome::MetadataUpdated { title, author } => {
                if let Some(t) = title {
                    self.out(format!("Title set to: '{t}'"));
                }
                if let Some(a) = author {
                    self.out(format!("Author set to: '{a}'"));
                }
                self.out(format!("{} Metadata updated successfully.", green("✓")));
            }
            FileOutcome::AlreadyNormalized => {
                self.out(dim("Filename is already normalized."));
            }
            FileOutcome::Renamed { from, to } => {
                self.out(format!(
                    "Renamed '{}' to '{}'",
                    file_name(from),
                    bold(&file_name(to))
                ));
                self.out(format!("{} File renamed successfully.", green("✓")));
            }
        }
        self.advance();
    }

    fn on_file_error(&self, _index: usize, _total: usize, path: &Path, error: &PdfTitleError) {
        self.err(format!(
            "{} Error processing '{}': {}. Moving to quarantine.",
            red("✗"),
            path.display(),
            error
        ));
    }

    fn on_quarantined(&self, _path: &Path, destination: &Path) {
        self.out(format!("Moving broken file to: {}", destination.display()));
        self.advance();
    }

    fn on_quarantine_failed(&self, _path: &Path, error: &PdfTitleError) {
        self.err(format!("{} {}", red("✗"), error));
        self.advance();
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        if self.quiet || summary.total() == 0 {
            return;
        }
        if summary.failed() == 0 {
            eprintln!(
                "{} {} files processed successfully",
                green("✔"),
                bold(&summary.succeeded().to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files processed  ({} failed, {} quarantined)",
                cyan("⚠"),
                bold(&summary.succeeded().to_string()),
                summary.total(),
                red(&summary.failed().to_string()),
                summary.quarantined(),
            );
        }
    }
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Show metadata; fill in a missing Title/Author from the file name
  pdftitle my_report-final.pdf

  # Read paths from stdin
  ls *.pdf | pdftitle

  # Set metadata explicitly
  pdftitle --settitle "Dune" --setauthor "Frank Herbert" scan_0001.pdf

  # Rename to <Title>-<Author>.pdf
  pdftitle --normalize *.pdf

  # Use the first line of page 1 as the Title when none is set
  pdftitle --title-from-content scan_*.pdf

MODES (first match wins):
  --settitle / --setauthor   write the given values, nothing else
  --normalize                rename to <Title>-<Author><ext>; needs both fields
  (default)                  print metadata, or auto-fill a missing Title
                             from the file name and Author with the default

Files that fail are moved to an `error/` directory next to them; the batch
always continues with the next file.

ENVIRONMENT VARIABLES:
  PDFTITLE_DEFAULT_AUTHOR   Author used when auto-filling (default: NIF)
  PDFTITLE_QUARANTINE_DIR   Quarantine directory name (default: error)
  RUST_LOG                  Override log filter (e.g. pdftitle=debug)
"#;

/// Fill in PDF Title/Author metadata and rename files to Title-Author.pdf.
#[derive(Parser, Debug)]
#[command(
    name = "pdftitle",
    version,
    about = "Fill in PDF Title/Author metadata and rename files to Title-Author.pdf",
    long_about = "Inspect a batch of PDF files, fill in a missing Title/Author from the file \
name (or explicit values), and optionally rename each file to a filesystem-safe \
<Title>-<Author>.pdf. Failing files are quarantined instead of aborting the batch.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files to process. Read from stdin (one per line) when omitted.
    files: Vec<PathBuf>,

    /// Explicitly set the PDF title.
    #[arg(long = "settitle", value_name = "TEXT")]
    set_title: Option<String>,

    /// Explicitly set the PDF author.
    #[arg(long = "setauthor", value_name = "TEXT")]
    set_author: Option<String>,

    /// Rename files based on Title and Author (Title-Author.pdf).
    #[arg(long)]
    normalize: bool,

    /// Use the first line of page 1 as Title when the document has none.
    #[arg(long, env = "PDFTITLE_TITLE_FROM_CONTENT")]
    title_from_content: bool,

    /// Author written when auto-filling a document without one.
    #[arg(long, env = "PDFTITLE_DEFAULT_AUTHOR", default_value = pdftitle::DEFAULT_AUTHOR)]
    default_author: String,

    /// Name of the quarantine directory created next to failing files.
    #[arg(long, env = "PDFTITLE_QUARANTINE_DIR", default_value = pdftitle::DEFAULT_QUARANTINE_DIR)]
    quarantine_dir: String,

    /// Disable progress bar.
    #[arg(long, env = "PDFTITLE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFTITLE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFTITLE_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The per-file lines already tell the user what happened; library logs
    // only add noise unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Collect input paths ──────────────────────────────────────────────
    let files = collect_files(&cli)?;
    if files.is_empty() {
        println!("Usage: pdftitle [options] <files...>");
        println!("       ls *.pdf | pdftitle [options]");
        println!();
        Cli::command()
            .print_help()
            .context("Failed to print help")?;
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress = CliProgressCallback::new(show_progress, cli.quiet);
    let config = build_config(&cli, progress as ProgressCallback)?;

    // ── Run batch ────────────────────────────────────────────────────────
    // Per-file failures are reported and quarantined; they never change the
    // exit status.
    with_quiet_panics(|| run_batch(&files, &config));
    Ok(())
}

/// Route panic reports to the debug log while `f` runs.
///
/// The batch runner recovers per-file panics and reports them as file
/// errors, so the default hook's stderr dump would only tear the progress bar.
fn with_quiet_panics<T>(f: impl FnOnce() -> T) -> T {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!("recovered panic: {info}")));
    let result = f();
    panic::set_hook(previous);
    result
}

/// Positional arguments, or newline-delimited paths from a piped stdin.
fn collect_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    if !cli.files.is_empty() {
        return Ok(cli.files.clone());
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    let mut bytes = Vec::new();
    stdin
        .lock()
        .read_to_end(&mut bytes)
        .context("Failed to read file list from stdin")?;
    Ok(parse_path_list(&bytes))
}

/// Map CLI args to `RunConfig`.
fn build_config(cli: &Cli, progress: ProgressCallback) -> Result<RunConfig> {
    let mut builder = RunConfig::builder()
        .normalize(cli.normalize)
        .title_from_content(cli.title_from_content)
        .default_author(cli.default_author.clone())
        .quarantine_dir_name(cli.quarantine_dir.clone())
        .progress_callback(progress);

    if let Some(ref t) = cli.set_title {
        builder = builder.title_override(t.clone());
    }
    if let Some(ref a) = cli.set_author {
        builder = builder.author_override(a.clone());
    }

    builder.build().context("Invalid configuration")
}
