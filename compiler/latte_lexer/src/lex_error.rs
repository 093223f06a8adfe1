//! Lexer diagnostics.
//!
//! Every error here is local and non-fatal. The token stream is always
//! complete; errors are reported alongside it for the editor to annotate.

use latte_ir::Span;

/// A lexer error located in the source.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

impl LexError {
    #[inline]
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

impl std::error::Error for LexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// What went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    // === Token-level errors ===
    /// Macro delimiter followed by text that cannot form a macro name.
    #[error("invalid macro name")]
    InvalidMacroName,
    /// Malformed or unknown `n:` attribute name.
    #[error("invalid n:attribute syntax")]
    InvalidAttributeSyntax,
    /// Quoted attribute value never closed.
    #[error("unclosed attribute quotes")]
    UnclosedAttributeQuotes,

    // === Mode errors ===
    /// `{syntax ...}` or `n:syntax` with an unknown mode; the mode is kept.
    #[error("invalid syntax mode `{value}`")]
    InvalidSyntaxMode { value: String },

    // === Structure errors ===
    /// Block macro still open at end of input. Only reported under
    /// [`EndOfInputPolicy::VersionGated`](crate::EndOfInputPolicy::VersionGated).
    #[error("unclosed {{{name}}}")]
    UnclosedMacro { name: String },
}

impl LexErrorKind {
    /// Short kebab-case code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            LexErrorKind::InvalidMacroName => "invalid-macro-name",
            LexErrorKind::InvalidAttributeSyntax => "invalid-attribute-syntax",
            LexErrorKind::UnclosedAttributeQuotes => "unclosed-attribute-quotes",
            LexErrorKind::InvalidSyntaxMode { .. } => "invalid-syntax-mode",
            LexErrorKind::UnclosedMacro { .. } => "unclosed-macro",
        }
    }
}
