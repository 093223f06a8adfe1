//! Token types produced by the Latte lexer.
//!
//! A token is a classified `(kind, span)` pair. A complete [`TokenList`] for
//! a file covers every byte of the source exactly once: tokens are ordered,
//! never overlap, never have zero length, and leave no gaps.

use std::fmt;

use crate::Span;

/// Classification of a token.
///
/// Discriminants are grouped by layer: plain content `0..16`, macro tokens
/// `16..32`, n:attribute tokens `32..48`, errors `240..`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TokenKind {
    // === Plain content ===
    /// HTML or any other text the lexer passes through verbatim.
    Text = 0,
    /// Latte comment `{* ... *}`.
    Comment = 1,

    // === Macros ===
    /// Opening delimiter: `{` or `{{`.
    MacroStart = 16,
    /// Macro name, including a leading `/` for closing tags.
    MacroName = 17,
    /// Arguments / expression between the name and the closing delimiter.
    MacroContent = 18,
    /// Closing delimiter: `}` or `}}`.
    MacroEnd = 19,
    /// Whitespace inside a macro, between the name and the content.
    MacroWhitespace = 20,

    // === n:attributes ===
    /// `n:`-prefixed attribute name.
    AttributeName = 32,
    /// The `=` after an attribute name.
    AttributeStart = 33,
    /// Attribute value; for quoted values this includes the opening quote.
    AttributeValue = 34,
    /// Closing quote of a quoted attribute value.
    AttributeEnd = 35,

    // === Errors ===
    /// Macro opening delimiter followed by text that cannot form a name.
    InvalidMacroName = 240,
    /// Malformed or unknown `n:` attribute name.
    InvalidAttributeSyntax = 241,
    /// Attribute value quote never closed before end of input.
    UnclosedAttributeQuotes = 242,
}

impl TokenKind {
    /// Returns `true` for the error kinds.
    #[inline]
    pub fn is_error(self) -> bool {
        (self as u8) >= 240
    }

    /// Human-readable name used in diagnostics and trace output.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::Comment => "comment",
            TokenKind::MacroStart => "macro-start",
            TokenKind::MacroName => "macro-name",
            TokenKind::MacroContent => "macro-content",
            TokenKind::MacroEnd => "macro-end",
            TokenKind::MacroWhitespace => "macro-whitespace",
            TokenKind::AttributeName => "attribute-name",
            TokenKind::AttributeStart => "attribute-start",
            TokenKind::AttributeValue => "attribute-value",
            TokenKind::AttributeEnd => "attribute-end",
            TokenKind::InvalidMacroName => "invalid-macro-name",
            TokenKind::InvalidAttributeSyntax => "invalid-attribute-syntax",
            TokenKind::UnclosedAttributeQuotes => "unclosed-attribute-quotes",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A token with its span in the source.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// The token's text within `source`.
    ///
    /// Returns an empty string if the span does not fall on character
    /// boundaries of `source` (i.e. the token came from different text).
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.to_range()).unwrap_or_default()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Ordered list of tokens for one source text.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    #[inline]
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        TokenList {
            tokens: Vec::with_capacity(capacity),
        }
    }

    /// Append a token, merging it into the previous token when both are
    /// [`TokenKind::Text`] and adjacent.
    ///
    /// Zero-length tokens are dropped.
    pub fn push(&mut self, token: Token) {
        if token.span.is_empty() {
            return;
        }
        if token.kind == TokenKind::Text {
            if let Some(last) = self.tokens.last_mut() {
                if last.kind == TokenKind::Text && last.span.end == token.span.start {
                    last.span.end = token.span.end;
                    return;
                }
            }
        }
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Kinds of all tokens, in order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// Check that the tokens tile `[0, source_len)` exactly.
    ///
    /// Returns the offset of the first gap or overlap on failure.
    pub fn check_coverage(&self, source_len: u32) -> Result<(), u32> {
        let mut expected = 0;
        for token in &self.tokens {
            if token.span.start != expected || token.span.is_empty() {
                return Err(expected);
            }
            expected = token.span.end;
        }
        if expected == source_len {
            Ok(())
        } else {
            Err(expected)
        }
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl std::ops::Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}
