//! Lexer configuration.

use latte_lexer_core::LatteVersion;

/// What to do with block macros still open at end of input.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum EndOfInputPolicy {
    /// Close every open construct silently. Never reports.
    #[default]
    AutoClose,
    /// Report [`UnclosedMacro`](crate::LexErrorKind::UnclosedMacro) per
    /// version: on 2.x `block`, `define` and `snippet` may stay open, on
    /// 3.x and later nothing may.
    VersionGated,
}

/// Options for a single [`lex`](crate::lex) call.
///
/// The version is an explicit input; nothing in the lexer reads a global.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LexOptions {
    pub version: LatteVersion,
    pub end_of_input: EndOfInputPolicy,
    /// Label recorded on the lexer's tracing span (a document path, a test
    /// name, ...).
    pub context: Option<String>,
    /// Fill [`LexOutput::restart_points`](crate::LexOutput::restart_points).
    pub record_restart_points: bool,
}

impl LexOptions {
    pub fn new(version: LatteVersion) -> Self {
        LexOptions {
            version,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: LatteVersion) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_end_of_input(mut self, policy: EndOfInputPolicy) -> Self {
        self.end_of_input = policy;
        self
    }

    #[must_use]
    pub fn with_restart_points(mut self) -> Self {
        self.record_restart_points = true;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
