//! Open block macro tracking and end-of-input resolution.

use latte_ir::Span;
use latte_lexer_core::LatteVersion;

use crate::{EndOfInputPolicy, LexError, LexErrorKind};

/// A block macro whose closing tag has not been seen.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OpenConstruct {
    pub name: String,
    /// Span of the opening macro tag.
    pub span: Span,
}

/// Stack of open block macros, innermost last.
#[derive(Clone, Debug, Default)]
pub(crate) struct ConstructStack {
    open: Vec<OpenConstruct>,
}

impl ConstructStack {
    pub(crate) fn push(&mut self, name: &str, span: Span) {
        tracing::trace!(name, %span, depth = self.open.len() + 1, "open construct");
        self.open.push(OpenConstruct {
            name: name.to_owned(),
            span,
        });
    }

    /// Close the nearest construct named `name`, or the innermost one for
    /// `None` (`{/}`). Constructs above the match are closed with it.
    ///
    /// Returns the matched construct; an unmatched close changes nothing.
    pub(crate) fn close(&mut self, name: Option<&str>) -> Option<OpenConstruct> {
        let index = match name {
            Some(name) => self.open.iter().rposition(|c| c.name == name)?,
            None => self.open.len().checked_sub(1)?,
        };
        let implicit = self.open.len() - index - 1;
        if implicit > 0 {
            tracing::trace!(implicit, "closing nested constructs implicitly");
        }
        self.open.truncate(index + 1);
        let closed = self.open.pop();
        if let Some(c) = &closed {
            tracing::trace!(name = %c.name, depth = self.open.len(), "close construct");
        }
        closed
    }

    pub(crate) fn len(&self) -> usize {
        self.open.len()
    }

    pub(crate) fn into_vec(self) -> Vec<OpenConstruct> {
        self.open
    }
}

/// Block macros 2.x allows to stay open at end of file.
const LEGACY_UNCLOSED_OK: &[&str] = &["block", "define", "snippet"];

/// Decide which constructs still open at end of input are errors.
pub(crate) fn resolve(
    unclosed: &[OpenConstruct],
    policy: EndOfInputPolicy,
    version: LatteVersion,
) -> Vec<LexError> {
    match policy {
        EndOfInputPolicy::AutoClose => {
            if !unclosed.is_empty() {
                tracing::debug!(count = unclosed.len(), "auto-closing open constructs");
            }
            Vec::new()
        }
        EndOfInputPolicy::VersionGated => unclosed
            .iter()
            .filter(|c| !(version.is_legacy() && LEGACY_UNCLOSED_OK.contains(&c.name.as_str())))
            .map(|c| {
                LexError::new(
                    c.span,
                    LexErrorKind::UnclosedMacro {
                        name: c.name.clone(),
                    },
                )
            })
            .collect(),
    }
}
