//! `n:` attribute scanner.
//!
//! Called by the root lexer inside an HTML tag header when the cursor is on
//! `n:`. One call scans one attribute:
//!
//! ```text
//! n:foreach="$items as $item"
//! ^^^^^^^^^^^^^^^^^^^^^^^^^^^
//! |        |^               ^
//! |        ||               AttributeEnd
//! |        |AttributeValue
//! |        AttributeStart
//! AttributeName
//! ```
//!
//! Names are validated against the known n:attribute set. A name that does
//! not validate becomes `InvalidAttributeSyntax`; the value is still scanned
//! normally so the rest of the tag header is unaffected.

use crate::cursor::{is_whitespace, Cursor};
use crate::syntax_mode::{SyntaxModeError, SyntaxModeState, SyntaxTransition};
use crate::tag::{emit, RawTag, RawToken};
use crate::version::LatteVersion;

/// n:attributes available in every version.
const KNOWN_ATTRIBUTES: &[&str] = &[
    "attr",
    "block",
    "capture",
    "class",
    "define",
    "first",
    "for",
    "foreach",
    "href",
    "if",
    "ifchanged",
    "ifcontent",
    "ifset",
    "last",
    "name",
    "nonce",
    "sep",
    "snippet",
    "spaceless",
    "syntax",
    "tag",
    "translate",
    "try",
    "while",
];

/// n:attributes introduced in Latte 3.
const KNOWN_ATTRIBUTES_3X: &[&str] = &["else", "elseif"];

/// Summary of one scanned attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeScan {
    /// `false` if the name was emitted as `InvalidAttributeSyntax`.
    pub valid_name: bool,
    /// Outcome of an `n:syntax` attribute, forwarded to the mode state.
    pub syntax: Option<Result<SyntaxTransition, SyntaxModeError>>,
}

/// Returns `true` if `name` (without the `n:` prefix) is an n:attribute
/// `version` understands.
///
/// Accepted shapes are `base`, `base-suffix`, `inner-base` and `tag-base`,
/// optionally followed by `:modifier` or `.modifier` parts.
pub fn is_known_attribute(name: &str, version: LatteVersion) -> bool {
    let unprefixed = name
        .strip_prefix("inner-")
        .or_else(|| name.strip_prefix("tag-"))
        .unwrap_or(name);
    let base = unprefixed
        .split([':', '.'])
        .next()
        .unwrap_or(unprefixed);

    if is_base_attribute(base, version) {
        return true;
    }
    match base.split_once('-') {
        Some((head, tail)) => !tail.is_empty() && is_base_attribute(head, version),
        None => false,
    }
}

fn is_base_attribute(base: &str, version: LatteVersion) -> bool {
    KNOWN_ATTRIBUTES.contains(&base)
        || (version.is_at_least(LatteVersion::V3x) && KNOWN_ATTRIBUTES_3X.contains(&base))
}

/// Scan one `n:` attribute. The cursor must sit on `n:`; it is left right
/// after the attribute value (or the name, if there is no `=`).
///
/// An `n:syntax` attribute with a value is applied to `modes` immediately.
pub fn scan_attribute(
    cursor: &mut Cursor<'_>,
    version: LatteVersion,
    modes: &mut SyntaxModeState,
    out: &mut Vec<RawToken>,
) -> AttributeScan {
    debug_assert!(cursor.starts_with(b"n:"), "scan_attribute called off `n:`");
    let start = cursor.pos();
    cursor.advance_n(2);
    let name_start = cursor.pos();
    cursor.eat_while(is_name_byte);
    let name = cursor.slice_from(name_start);

    let valid_name = !name.is_empty() && is_known_attribute(name, version);
    let tag = if valid_name {
        RawTag::AttributeName
    } else {
        RawTag::InvalidAttributeSyntax
    };
    emit(out, tag, start, cursor.pos());

    if cursor.current() != b'=' {
        return AttributeScan {
            valid_name,
            syntax: None,
        };
    }
    let eq = cursor.pos();
    cursor.advance();
    emit(out, RawTag::AttributeStart, eq, cursor.pos());

    let value_start = cursor.pos();
    match cursor.current() {
        quote @ (b'"' | b'\'') => scan_quoted(cursor, quote, out),
        _ => scan_unquoted(cursor, out),
    }

    let syntax = (name == "syntax" && cursor.pos() > value_start)
        .then(|| modes.process_syntax_tag(cursor.slice_from(start)));

    AttributeScan { valid_name, syntax }
}

fn scan_quoted(cursor: &mut Cursor<'_>, quote: u8, out: &mut Vec<RawToken>) {
    let start = cursor.pos();
    cursor.advance();
    if cursor.skip_to_byte(quote) == 0 {
        emit(out, RawTag::UnclosedAttributeQuotes, start, cursor.pos());
        return;
    }
    emit(out, RawTag::AttributeValue, start, cursor.pos());
    let end = cursor.pos();
    cursor.advance();
    emit(out, RawTag::AttributeEnd, end, cursor.pos());
}

fn scan_unquoted(cursor: &mut Cursor<'_>, out: &mut Vec<RawToken>) {
    let start = cursor.pos();
    while !cursor.is_eof() {
        match cursor.current() {
            b'>' => break,
            b'/' if cursor.peek() == b'>' => break,
            b if is_whitespace(b) => break,
            _ => cursor.advance_char(),
        }
    }
    emit(out, RawTag::AttributeValue, start, cursor.pos());
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}
