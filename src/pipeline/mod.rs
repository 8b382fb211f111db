//! Pipeline stages for metadata resolution and filename normalisation.
//!
//! Each submodule implements exactly one step, so every decision rule can be
//! tested on its own without a real PDF.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ resolve ──▶ (persist) ──▶ normalize ──▶ sanitize + unique ──▶ rename
//! (path)    (decide)     (store)       (orchestrate)
//! ```
//!
//! 1. [`input`]     — check the path names a readable `%PDF` file
//! 2. [`resolve`]   — pick Title/Author from overrides, metadata, text or name
//! 3. [`sanitize`]  — reduce metadata text to `[A-Za-z0-9_]`
//! 4. [`unique`]    — find a destination that does not exist yet
//! 5. [`normalize`] — mark the document and move it to its canonical name

pub mod input;
pub mod normalize;
pub mod resolve;
pub mod sanitize;
pub mod unique;
