//! Raw tag to token kind conversion.

use latte_ir::TokenKind;
use latte_lexer_core::RawTag;

use crate::LexErrorKind;

/// Map a raw scanner tag onto the public token kind.
pub(crate) fn token_kind(tag: RawTag) -> TokenKind {
    match tag {
        RawTag::Text => TokenKind::Text,
        RawTag::Comment => TokenKind::Comment,
        RawTag::MacroStart => TokenKind::MacroStart,
        RawTag::MacroName => TokenKind::MacroName,
        RawTag::MacroContent => TokenKind::MacroContent,
        RawTag::MacroEnd => TokenKind::MacroEnd,
        RawTag::MacroWhitespace => TokenKind::MacroWhitespace,
        RawTag::AttributeName => TokenKind::AttributeName,
        RawTag::AttributeStart => TokenKind::AttributeStart,
        RawTag::AttributeValue => TokenKind::AttributeValue,
        RawTag::AttributeEnd => TokenKind::AttributeEnd,
        RawTag::InvalidMacroName => TokenKind::InvalidMacroName,
        RawTag::InvalidAttributeSyntax => TokenKind::InvalidAttributeSyntax,
        RawTag::UnclosedAttributeQuotes => TokenKind::UnclosedAttributeQuotes,
    }
}

/// Diagnostic carried by an error tag, if any.
pub(crate) fn error_kind(tag: RawTag) -> Option<LexErrorKind> {
    match tag {
        RawTag::InvalidMacroName => Some(LexErrorKind::InvalidMacroName),
        RawTag::InvalidAttributeSyntax => Some(LexErrorKind::InvalidAttributeSyntax),
        RawTag::UnclosedAttributeQuotes => Some(LexErrorKind::UnclosedAttributeQuotes),
        _ => None,
    }
}
