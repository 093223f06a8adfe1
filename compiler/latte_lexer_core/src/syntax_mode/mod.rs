//! Syntax mode state machine.
//!
//! Latte lets a template change its own delimiters while it is being read:
//!
//! - `{syntax double}` ... `{/syntax}` nests a region using `{{ }}`
//! - `{syntax off}` ... `{/syntax}` nests a region with no macros at all
//! - `n:syntax="off"` on an element switches mode without nesting
//!
//! `{/syntax}` may carry whitespace before its closing delimiter
//! (`{/syntax }`).
//!
//! [`SyntaxModeState`] tracks the mode in effect plus the stack of modes
//! saved by `{syntax ...}` tags. It never fails hard: an unknown mode name
//! is reported as [`SyntaxModeError::InvalidSyntaxMode`] and leaves the
//! state untouched, and a `{/syntax}` with nothing to pop restores
//! [`SyntaxMode::Default`].

use std::fmt;

use memchr::memmem;

use crate::cursor::is_whitespace;

/// Delimiter convention in effect at a lexer position.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum SyntaxMode {
    /// Macros are written `{name ...}`.
    #[default]
    Default,
    /// Macros are written `{{name ...}}`.
    Double,
    /// No macros; everything is text until `{/syntax}`.
    Off,
}

impl SyntaxMode {
    /// Parse a mode name as written in `{syntax ...}` or `n:syntax`.
    ///
    /// `latte` is the historical alias of `default`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" | "latte" => Some(SyntaxMode::Default),
            "double" => Some(SyntaxMode::Double),
            "off" => Some(SyntaxMode::Off),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SyntaxMode::Default => "default",
            SyntaxMode::Double => "double",
            SyntaxMode::Off => "off",
        }
    }

    /// Opening macro delimiter, or `None` when macros are disabled.
    pub fn open_delim(self) -> Option<&'static [u8]> {
        match self {
            SyntaxMode::Default => Some(b"{"),
            SyntaxMode::Double => Some(b"{{"),
            SyntaxMode::Off => None,
        }
    }

    /// Closing macro delimiter, or `None` when macros are disabled.
    pub fn close_delim(self) -> Option<&'static [u8]> {
        match self {
            SyntaxMode::Default => Some(b"}"),
            SyntaxMode::Double => Some(b"}}"),
            SyntaxMode::Off => None,
        }
    }
}

impl fmt::Display for SyntaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recoverable failure of a mode change. The previous mode is retained.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SyntaxModeError {
    #[error("invalid syntax mode `{0}` (expected default, double or off)")]
    InvalidSyntaxMode(String),
}

/// What a processed tag did to the mode state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SyntaxTransition {
    /// `{syntax X}`: `from` was saved and `to` is now in effect.
    Pushed { from: SyntaxMode, to: SyntaxMode },
    /// `{/syntax}`: `to` is now in effect. `underflow` is set when the
    /// stack was already empty and the mode fell back to default.
    Popped { to: SyntaxMode, underflow: bool },
    /// `n:syntax=X`: flat override, nothing saved.
    Overridden { from: SyntaxMode, to: SyntaxMode },
    /// The text contained no syntax tag.
    Unchanged,
}

/// Current syntax mode plus the stack of saved modes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyntaxModeState {
    current: SyntaxMode,
    saved: Vec<SyntaxMode>,
}

impl SyntaxModeState {
    /// Fresh state: [`SyntaxMode::Default`], empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current_mode(&self) -> SyntaxMode {
        self.current
    }

    /// Number of saved modes (nesting depth of `{syntax}` tags).
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Force the mode by name without touching the stack.
    ///
    /// Used for externally detected `n:syntax` attributes and by tests.
    pub fn set_mode(&mut self, name: &str) -> Result<SyntaxMode, SyntaxModeError> {
        let mode = parse_mode(name)?;
        self.current = mode;
        Ok(mode)
    }

    /// Save the current mode and switch to `mode`.
    pub fn push(&mut self, mode: SyntaxMode) -> SyntaxTransition {
        let from = self.current;
        self.saved.push(from);
        self.current = mode;
        SyntaxTransition::Pushed { from, to: mode }
    }

    /// Restore the most recently saved mode, or default if none is saved.
    pub fn pop(&mut self) -> SyntaxTransition {
        let (to, underflow) = match self.saved.pop() {
            Some(mode) => (mode, false),
            None => (SyntaxMode::Default, true),
        };
        self.current = to;
        SyntaxTransition::Popped { to, underflow }
    }

    /// Switch to `mode` without saving the previous one.
    pub fn override_mode(&mut self, mode: SyntaxMode) -> SyntaxTransition {
        let from = self.current;
        self.current = mode;
        SyntaxTransition::Overridden { from, to: mode }
    }

    /// The mode a `{/syntax}` would restore.
    #[inline]
    pub fn outer_mode(&self) -> SyntaxMode {
        self.saved.last().copied().unwrap_or_default()
    }

    /// Apply the first syntax tag found in `text`.
    ///
    /// Recognizes `{syntax <mode>}` (push), `{/syntax}` (pop) and
    /// `n:syntax="<mode>"` / `n:syntax=<mode>` (override). Text without any
    /// of these yields [`SyntaxTransition::Unchanged`].
    pub fn process_syntax_tag(&mut self, text: &str) -> Result<SyntaxTransition, SyntaxModeError> {
        match find_syntax_tag(text) {
            Some(SyntaxTag::Open(arg)) => {
                let mode = parse_mode(arg)?;
                Ok(self.push(mode))
            }
            Some(SyntaxTag::Close) => Ok(self.pop()),
            Some(SyntaxTag::Attribute(value)) => {
                let mode = parse_mode(value)?;
                Ok(self.override_mode(mode))
            }
            None => Ok(SyntaxTransition::Unchanged),
        }
    }
}

fn parse_mode(name: &str) -> Result<SyntaxMode, SyntaxModeError> {
    let name = name.trim();
    SyntaxMode::from_name(name).ok_or_else(|| SyntaxModeError::InvalidSyntaxMode(name.to_owned()))
}

/// A syntax tag located in raw text, borrowing its argument.
#[derive(Debug, PartialEq, Eq)]
enum SyntaxTag<'t> {
    Open(&'t str),
    Close,
    Attribute(&'t str),
}

const OPEN_TAG: &[u8] = b"{syntax";
const CLOSE_TAG: &[u8] = b"{/syntax";
const CLOSE_NAME: &[u8] = b"/syntax";
const ATTRIBUTE: &[u8] = b"n:syntax=";

/// Length of the `{/syntax}` tag written in `mode`'s delimiters at the
/// start of `bytes`, if there is one. Whitespace is allowed before the
/// closing delimiter.
pub fn syntax_close_len(bytes: &[u8], mode: SyntaxMode) -> Option<usize> {
    let (Some(open), Some(close)) = (mode.open_delim(), mode.close_delim()) else {
        return None;
    };
    let rest = bytes.strip_prefix(open)?.strip_prefix(CLOSE_NAME)?;
    let ws = rest.iter().take_while(|&&b| is_whitespace(b)).count();
    rest[ws..]
        .starts_with(close)
        .then_some(open.len() + CLOSE_NAME.len() + ws + close.len())
}

/// Earliest `{/syntax}` in `bytes`, as seen from inside an `off` region.
///
/// `outer` is the mode the tag restores. When it is `double`, the
/// `{{/syntax}}` form is preferred over the single-brace form it contains.
/// Returns the tag offset and the mode whose delimiters it is written in.
pub fn find_syntax_close(bytes: &[u8], outer: SyntaxMode) -> Option<(usize, SyntaxMode)> {
    memmem::find_iter(bytes, CLOSE_TAG).find_map(|at| {
        if outer == SyntaxMode::Double
            && at > 0
            && syntax_close_len(&bytes[at - 1..], SyntaxMode::Double).is_some()
        {
            return Some((at - 1, SyntaxMode::Double));
        }
        syntax_close_len(&bytes[at..], SyntaxMode::Default).map(|_| (at, SyntaxMode::Default))
    })
}

/// Locate the earliest syntax tag in `text`.
fn find_syntax_tag(text: &str) -> Option<SyntaxTag<'_>> {
    let bytes = text.as_bytes();

    // `{syntax` only counts when the name ends there (not `{syntaxFoo}`).
    let open = memmem::find_iter(bytes, OPEN_TAG).find(|&at| {
        let next = bytes.get(at + OPEN_TAG.len()).copied().unwrap_or(b'}');
        next == b'}' || is_whitespace(next)
    });
    let close = memmem::find_iter(bytes, CLOSE_TAG)
        .find(|&at| syntax_close_len(&bytes[at..], SyntaxMode::Default).is_some());
    let attribute = memmem::find(bytes, ATTRIBUTE);

    let earliest = [open, close, attribute].into_iter().flatten().min()?;

    if Some(earliest) == close {
        return Some(SyntaxTag::Close);
    }
    if Some(earliest) == open {
        let rest = &text[earliest + OPEN_TAG.len()..];
        let arg = rest.split('}').next().unwrap_or_default();
        return Some(SyntaxTag::Open(arg));
    }
    let rest = &text[earliest + ATTRIBUTE.len()..];
    Some(SyntaxTag::Attribute(attribute_value(rest)))
}

/// Value of an attribute given the text right after `=`.
fn attribute_value(rest: &str) -> &str {
    match rest.as_bytes().first() {
        Some(&quote @ (b'"' | b'\'')) => {
            let inner = &rest[1..];
            let end = memchr::memchr(quote, inner.as_bytes()).unwrap_or(inner.len());
            &inner[..end]
        }
        _ => {
            let end = rest
                .bytes()
                .position(|b| is_whitespace(b) || b == b'>')
                .unwrap_or(rest.len());
            &rest[..end]
        }
    }
}
