//! Low-level scanners for Latte templates.
//!
//! This crate produces `(RawTag, len)` pairs over a sentinel-terminated
//! buffer. It knows the three delimiter conventions ([`SyntaxMode`]), the
//! macro tag grammar and the `n:` attribute grammar, but nothing about
//! spans, token lists or diagnostics; `latte_lexer` cooks its output.
//!
//! # Layers
//!
//! - [`SourceBuffer`] / [`Cursor`]: byte access with a `0x00` sentinel
//! - [`SyntaxModeState`]: the `{syntax}` / `n:syntax` mode stack
//! - [`scan_macro`] / [`scan_comment`]: everything after a `{` or `{{`
//! - [`scan_attribute`]: one `n:` attribute inside an HTML tag header
//!
//! Every scanner call either consumes at least one byte or reports that it
//! did not apply, so callers always make forward progress.

mod attribute_scanner;
mod cursor;
mod macro_scanner;
mod source_buffer;
mod syntax_mode;
mod tag;
mod version;

pub use attribute_scanner::{is_known_attribute, scan_attribute, AttributeScan};
pub use cursor::Cursor;
pub use macro_scanner::{scan_comment, scan_macro, MacroScan};
pub use source_buffer::SourceBuffer;
pub use syntax_mode::{
    find_syntax_close, syntax_close_len, SyntaxMode, SyntaxModeError, SyntaxModeState,
    SyntaxTransition,
};
pub use tag::{RawTag, RawToken};
pub use version::{LatteVersion, ParseVersionError};
