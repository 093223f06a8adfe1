//! Lexer for Latte templates.
//!
//! Drives the low-level scanners from `latte_lexer_core` over a whole file
//! and produces a [`TokenList`] that covers every byte of the source, plus
//! the diagnostics found along the way. Lexing never fails: malformed
//! input becomes error tokens and [`LexError`]s.
//!
//! ```
//! use latte_ir::TokenKind;
//! use latte_lexer::{lex, LexOptions};
//!
//! let output = lex("{if $x}A{/if}", &LexOptions::default());
//! assert!(output.errors.is_empty());
//! assert_eq!(output.tokens[0].kind, TokenKind::MacroStart);
//! ```

mod constructs;
mod convert;
mod lex_error;
mod lexer;
mod options;
mod registry;

use std::sync::Once;

use latte_ir::TokenList;
use latte_lexer_core::SourceBuffer;

pub use constructs::OpenConstruct;
pub use lex_error::{LexError, LexErrorKind};
pub use latte_lexer_core::{LatteVersion, SyntaxMode};
pub use options::{EndOfInputPolicy, LexOptions};
pub use registry::{MacroKind, MacroRegistry};

use lexer::RootLexer;

/// Result of lexing one template.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LexOutput {
    /// Tokens covering the whole source.
    pub tokens: TokenList,
    /// Diagnostics, sorted by start offset.
    pub errors: Vec<LexError>,
    /// Block macros still open at end of input, outermost first.
    pub unclosed: Vec<OpenConstruct>,
    /// Syntax mode in effect at end of input.
    pub final_mode: SyntaxMode,
    /// `{syntax}` tags left open at end of input.
    pub mode_depth: usize,
    /// Offsets where the lexer stood in `Default` mode with no `{syntax}`
    /// open, between two constructs. Lexing may restart from any of them
    /// as if from the start of a file, and no token crosses one except
    /// merged text.
    ///
    /// Ascending. Empty unless [`LexOptions::record_restart_points`] is set.
    pub restart_points: Vec<u32>,
}

impl LexOutput {
    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex `source` with the built-in macro table.
pub fn lex(source: &str, options: &LexOptions) -> LexOutput {
    lex_with_registry(source, options, &MacroRegistry::new())
}

/// Lex `source`, classifying macros through `registry`.
///
/// Reuse one registry across calls to keep its lookup cache warm.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        len = source.len(),
        version = %options.version,
        context = options.context.as_deref().unwrap_or(""),
    )
)]
pub fn lex_with_registry(source: &str, options: &LexOptions, registry: &MacroRegistry) -> LexOutput {
    let buf = SourceBuffer::new(source);
    let output = RootLexer::new(buf.cursor(), options.version, registry).run(options);
    tracing::debug!(
        tokens = output.tokens.len(),
        errors = output.errors.len(),
        unclosed = output.unclosed.len(),
        final_mode = %output.final_mode,
        "lexed"
    );
    output
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and nothing after the first call.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests;
