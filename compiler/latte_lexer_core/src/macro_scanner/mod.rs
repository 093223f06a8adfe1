//! Macro tag scanner.
//!
//! Splits one macro tag into raw tokens:
//!
//! ```text
//! {  if   $x > 1  }
//! ^  ^^ ^ ^^^^^^  ^
//! |  |  | |       MacroEnd
//! |  |  | MacroContent
//! |  |  MacroWhitespace
//! |  MacroName
//! MacroStart
//! ```
//!
//! The content is not parsed. The scanner only tracks brace depth and
//! skips quoted strings so that `}` inside `{if $a['}']}` or
//! `{var $x = [a => {b}]}` does not end the tag early. A tag without its
//! closing delimiter runs to end of input and gets no `MacroEnd`; the
//! caller decides what that means.

use crate::cursor::{is_whitespace, Cursor};
use crate::syntax_mode::SyntaxMode;
use crate::tag::{emit, RawTag, RawToken};
use crate::version::LatteVersion;

/// Summary of one scanned macro tag. Offsets are absolute.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MacroScan {
    /// Byte range of the `MacroName` token, if the tag has a valid name.
    pub name: Option<(u32, u32)>,
    /// `true` if the closing delimiter was found.
    pub closed: bool,
}

/// Scan a macro tag. The cursor must sit on the opening delimiter of
/// `mode` (`{` or `{{`); it is left right after the tag.
///
/// Always consumes at least the opening delimiter.
pub fn scan_macro(
    cursor: &mut Cursor<'_>,
    mode: SyntaxMode,
    version: LatteVersion,
    out: &mut Vec<RawToken>,
) -> MacroScan {
    let (open, close) = delimiters(mode);

    let start = cursor.pos();
    cursor.advance_n(len32(open));
    emit(out, RawTag::MacroStart, start, cursor.pos());

    let ws = cursor.pos();
    cursor.eat_whitespace();
    emit(out, RawTag::MacroWhitespace, ws, cursor.pos());

    let name = if cursor.starts_with(close) {
        None
    } else {
        scan_name(cursor, version, out)
    };

    let ws = cursor.pos();
    cursor.eat_whitespace();
    emit(out, RawTag::MacroWhitespace, ws, cursor.pos());

    let content = cursor.pos();
    let closed = scan_content(cursor, close);
    emit(out, RawTag::MacroContent, content, cursor.pos());

    if closed {
        let end = cursor.pos();
        cursor.advance_n(len32(close));
        emit(out, RawTag::MacroEnd, end, cursor.pos());
    }

    MacroScan { name, closed }
}

/// Scan a Latte comment `{* ... *}` (or `{{* ... *}}` in double mode) as a
/// single `Comment` token. The cursor must sit on the opening delimiter.
///
/// Returns `false` if the comment runs to end of input.
pub fn scan_comment(cursor: &mut Cursor<'_>, mode: SyntaxMode, out: &mut Vec<RawToken>) -> bool {
    let (open, close) = delimiters(mode);
    let start = cursor.pos();
    // Opening delimiter plus the star.
    cursor.advance_n(len32(open) + 1);

    let closed = loop {
        if cursor.skip_to_byte(b'*') == 0 {
            break false;
        }
        cursor.advance();
        if cursor.starts_with(close) {
            cursor.advance_n(len32(close));
            break true;
        }
    };

    emit(out, RawTag::Comment, start, cursor.pos());
    closed
}

// ─── Name ─────────────────────────────────────────────────────────────

fn scan_name(
    cursor: &mut Cursor<'_>,
    version: LatteVersion,
    out: &mut Vec<RawToken>,
) -> Option<(u32, u32)> {
    let start = cursor.pos();
    match cursor.current() {
        b'/' => {
            cursor.advance();
            // `{/}` closes the innermost block; the name is just `/`.
            if is_ident_start(cursor.current()) {
                cursor.eat_while(is_ident_continue);
            }
        }
        b if is_ident_start(b) => {
            cursor.advance();
            cursor.eat_while(is_ident_continue);
        }
        b'=' => cursor.advance(),
        b'!' if version.is_legacy() => cursor.advance(),
        // `{$var}` prints a variable; there is no name.
        b'$' => return None,
        _ => {
            invalid_name(cursor, start, out);
            return None;
        }
    }
    emit(out, RawTag::MacroName, start, cursor.pos());
    Some((start, cursor.pos()))
}

fn invalid_name(cursor: &mut Cursor<'_>, start: u32, out: &mut Vec<RawToken>) {
    cursor.advance_char();
    while !cursor.is_eof() {
        let b = cursor.current();
        if is_whitespace(b) || b == b'}' {
            break;
        }
        cursor.advance_char();
    }
    emit(out, RawTag::InvalidMacroName, start, cursor.pos());
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// ─── Content ──────────────────────────────────────────────────────────

/// Advance to the closing delimiter at brace depth zero, or to EOF.
/// Returns `true` if the cursor stopped on the delimiter.
fn scan_content(cursor: &mut Cursor<'_>, close: &[u8]) -> bool {
    let mut depth: u32 = 0;
    loop {
        cursor.eat_while(|b| !matches!(b, b'{' | b'}' | b'\'' | b'"' | 0));
        match cursor.current() {
            b'}' if depth == 0 && cursor.starts_with(close) => return true,
            b'}' => {
                depth = depth.saturating_sub(1);
                cursor.advance();
            }
            b'{' => {
                depth += 1;
                cursor.advance();
            }
            quote @ (b'\'' | b'"') => skip_string(cursor, quote),
            _ if cursor.is_eof() => return false,
            // Interior null byte.
            _ => cursor.advance(),
        }
    }
}

/// Skip a quoted string, honoring backslash escapes. Stops at EOF if the
/// string is never closed.
fn skip_string(cursor: &mut Cursor<'_>, quote: u8) {
    cursor.advance();
    loop {
        match cursor.skip_to_either(quote, b'\\') {
            b'\\' => {
                cursor.advance();
                cursor.advance_char();
            }
            0 => return,
            _ => {
                cursor.advance();
                return;
            }
        }
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────

fn delimiters(mode: SyntaxMode) -> (&'static [u8], &'static [u8]) {
    match (mode.open_delim(), mode.close_delim()) {
        (Some(open), Some(close)) => (open, close),
        _ => (&b"{"[..], &b"}"[..]),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "delimiters are at most two bytes"
)]
fn len32(delim: &[u8]) -> u32 {
    delim.len() as u32
}

#[cfg(test)]
mod tests;
