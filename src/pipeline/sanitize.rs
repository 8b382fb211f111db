//! Turn arbitrary metadata text into a filename-safe token.
//!
//! ## Rule Order
//!
//! `+` and `ñ`/`Ñ` must be rewritten before the final strip, otherwise the
//! strip would delete them instead of transliterating. Spaces become
//! underscores before the strip for the same reason. The strip runs last and
//! removes runs of anything outside `[A-Za-z0-9_]` entirely, without leaving a
//! separator behind.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sanitise `input` into a token made only of ASCII letters, digits and `_`.
///
/// Total and deterministic. The result may be empty when nothing in the input
/// survives; callers treat that as a valid (if degenerate) token.
///
/// Rules (applied in order):
/// 1. `+` becomes `Plus`
/// 2. `ñ` becomes `gn`, `Ñ` becomes `Gn`
/// 3. Space becomes `_`
/// 4. Everything outside `[A-Za-z0-9_]` is removed
pub fn sanitize(input: &str) -> String {
    let s = replace_plus(input);
    let s = transliterate_enye(&s);
    let s = spaces_to_underscores(&s);
    strip_unsafe(&s)
}

// ── Rule 1: Plus ─────────────────────────────────────────────────────────────

fn replace_plus(input: &str) -> String {
    input.replace('+', "Plus")
}

// ── Rule 2: ñ / Ñ ────────────────────────────────────────────────────────────

fn transliterate_enye(input: &str) -> String {
    input.replace('ñ', "gn").replace('Ñ', "Gn")
}

// ── Rule 3: Spaces ───────────────────────────────────────────────────────────

fn spaces_to_underscores(input: &str) -> String {
    input.replace(' ', "_")
}

// ── Rule 4: Strip everything else ────────────────────────────────────────────

static RE_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

fn strip_unsafe(input: &str) -> String {
    RE_UNSAFE.replace_all(input, "").into_owned()
}
