use super::*;
use crate::SourceBuffer;
use pretty_assertions::assert_eq;

/// Scan one macro at the start of `source`, returning `(tag, text)` pairs
/// and the scan summary.
fn scan(source: &str, mode: SyntaxMode, version: LatteVersion) -> (Vec<(RawTag, &str)>, MacroScan, u32) {
    let buf = SourceBuffer::new(source);
    let mut cursor = buf.cursor();
    let mut out = Vec::new();
    let scan = scan_macro(&mut cursor, mode, version, &mut out);
    (pieces(source, &out), scan, cursor.pos())
}

fn pieces<'s>(source: &'s str, tokens: &[RawToken]) -> Vec<(RawTag, &'s str)> {
    let mut pos = 0usize;
    tokens
        .iter()
        .map(|t| {
            let text = &source[pos..pos + t.len as usize];
            pos += t.len as usize;
            (t.tag, text)
        })
        .collect()
}

fn default(source: &str) -> (Vec<(RawTag, &str)>, MacroScan, u32) {
    scan(source, SyntaxMode::Default, LatteVersion::V3x)
}

// ─── Names ────────────────────────────────────────────────────────────

#[test]
fn simple_macro() {
    let (tokens, scan, end) = default("{if $x}A");
    assert_eq!(
        tokens,
        vec![
            (RawTag::MacroStart, "{"),
            (RawTag::MacroName, "if"),
            (RawTag::MacroWhitespace, " "),
            (RawTag::MacroContent, "$x"),
            (RawTag::MacroEnd, "}"),
        ]
    );
    assert_eq!(scan.name, Some((1, 3)));
    assert!(scan.closed);
    assert_eq!(end, 7);
}

#[test]
fn closing_tag_name_includes_slash() {
    let (tokens, scan, _) = default("{/foreach}");
    assert_eq!(
        tokens,
        vec![
            (RawTag::MacroStart, "{"),
            (RawTag::MacroName, "/foreach"),
            (RawTag::MacroEnd, "}"),
        ]
    );
    assert_eq!(scan.name, Some((1, 9)));
}

#[test]
fn anonymous_close() {
    let (tokens, scan, _) = default("{/}");
    assert_eq!(tokens[1], (RawTag::MacroName, "/"));
    assert_eq!(scan.name, Some((1, 2)));
}

#[test]
fn symbolic_print_name() {
    let (tokens, _, _) = default("{=$a + 1}");
    assert_eq!(tokens[1], (RawTag::MacroName, "="));
    assert_eq!(tokens[2], (RawTag::MacroContent, "$a + 1"));
}

#[test]
fn translation_shortcut_is_identifier() {
    let (tokens, _, _) = default("{_'Hello'}");
    assert_eq!(tokens[1], (RawTag::MacroName, "_"));
    assert_eq!(tokens[2], (RawTag::MacroContent, "'Hello'"));
}

#[test]
fn variable_print_has_no_name() {
    let (tokens, scan, _) = default("{$user->name}");
    assert_eq!(
        tokens,
        vec![
            (RawTag::MacroStart, "{"),
            (RawTag::MacroContent, "$user->name"),
            (RawTag::MacroEnd, "}"),
        ]
    );
    assert_eq!(scan.name, None);
}

#[test]
fn invalid_name_stops_at_whitespace() {
    let (tokens, scan, _) = default("{123abc $x}");
    assert_eq!(
        tokens,
        vec![
            (RawTag::MacroStart, "{"),
            (RawTag::InvalidMacroName, "123abc"),
            (RawTag::MacroWhitespace, " "),
            (RawTag::MacroContent, "$x"),
            (RawTag::MacroEnd, "}"),
        ]
    );
    assert_eq!(scan.name, None);
}

#[test]
fn invalid_name_stops_at_close() {
    let (tokens, _, _) = default("{@@}");
    assert_eq!(tokens[1], (RawTag::InvalidMacroName, "@@"));
    assert_eq!(tokens[2], (RawTag::MacroEnd, "}"));
}

#[test]
fn invalid_name_keeps_multibyte_chars_whole() {
    let (tokens, _, _) = default("{žluť}");
    assert_eq!(tokens[1], (RawTag::InvalidMacroName, "žluť"));
}

#[test]
fn noescape_is_valid_only_on_2x() {
    let (legacy, _, _) = scan("{!$html}", SyntaxMode::Default, LatteVersion::V2x);
    assert_eq!(legacy[1], (RawTag::MacroName, "!"));
    assert_eq!(legacy[2], (RawTag::MacroContent, "$html"));

    let (modern, scan, _) = scan("{!$html}", SyntaxMode::Default, LatteVersion::V3x);
    assert_eq!(modern[1], (RawTag::InvalidMacroName, "!$html"));
    assert_eq!(scan.name, None);
}

// ─── Content ──────────────────────────────────────────────────────────

#[test]
fn brace_in_string_does_not_close() {
    let (tokens, _, end) = default("{if $a === '}'}x");
    assert_eq!(tokens[3], (RawTag::MacroContent, "$a === '}'"));
    assert_eq!(end, 15);
}

#[test]
fn escaped_quote_in_string() {
    let (tokens, _, _) = default(r#"{var $s = "a\"}b"}"#);
    assert_eq!(tokens[3], (RawTag::MacroContent, r#"$s = "a\"}b""#));
    assert_eq!(tokens[4], (RawTag::MacroEnd, "}"));
}

#[test]
fn nested_braces_are_balanced() {
    let (tokens, _, _) = default("{var $x = [a => {b}]}tail");
    assert_eq!(tokens[3], (RawTag::MacroContent, "$x = [a => {b}]"));
    assert_eq!(tokens[4], (RawTag::MacroEnd, "}"));
}

#[test]
fn unterminated_macro_has_no_end() {
    let (tokens, scan, end) = default("{block content\nHello");
    assert_eq!(
        tokens,
        vec![
            (RawTag::MacroStart, "{"),
            (RawTag::MacroName, "block"),
            (RawTag::MacroWhitespace, " "),
            (RawTag::MacroContent, "content\nHello"),
        ]
    );
    assert!(!scan.closed);
    assert_eq!(end, 20);
}

#[test]
fn unterminated_string_runs_to_eof() {
    let (tokens, scan, _) = default("{if $a == 'x}rest");
    assert_eq!(tokens.last(), Some(&(RawTag::MacroContent, "$a == 'x}rest")));
    assert!(!scan.closed);
}

// ─── Double mode ──────────────────────────────────────────────────────

#[test]
fn double_mode_delimiters() {
    let (tokens, scan, _) = scan("{{if $x}}A", SyntaxMode::Double, LatteVersion::V3x);
    assert_eq!(
        tokens,
        vec![
            (RawTag::MacroStart, "{{"),
            (RawTag::MacroName, "if"),
            (RawTag::MacroWhitespace, " "),
            (RawTag::MacroContent, "$x"),
            (RawTag::MacroEnd, "}}"),
        ]
    );
    assert!(scan.closed);
}

#[test]
fn double_mode_single_brace_is_content() {
    let (tokens, _, _) = scan("{{= $a} b}}", SyntaxMode::Double, LatteVersion::V3x);
    assert_eq!(tokens[3], (RawTag::MacroContent, "$a} b"));
    assert_eq!(tokens[4], (RawTag::MacroEnd, "}}"));
}

#[test]
fn double_mode_leading_whitespace() {
    let (tokens, _, _) = scan("{{ if $x }}", SyntaxMode::Double, LatteVersion::V3x);
    assert_eq!(tokens[1], (RawTag::MacroWhitespace, " "));
    assert_eq!(tokens[2], (RawTag::MacroName, "if"));
    assert_eq!(tokens[4], (RawTag::MacroContent, "$x "));
}

#[test]
fn double_mode_empty_tag() {
    let (tokens, scan, _) = scan("{{}}", SyntaxMode::Double, LatteVersion::V3x);
    assert_eq!(tokens, vec![(RawTag::MacroStart, "{{"), (RawTag::MacroEnd, "}}")]);
    assert_eq!(scan.name, None);
}

// ─── Comments ─────────────────────────────────────────────────────────

#[test]
fn comment_is_one_token() {
    let source = "{* note {if} *}after";
    let buf = SourceBuffer::new(source);
    let mut cursor = buf.cursor();
    let mut out = Vec::new();
    assert!(scan_comment(&mut cursor, SyntaxMode::Default, &mut out));
    assert_eq!(pieces(source, &out), vec![(RawTag::Comment, "{* note {if} *}")]);
    assert_eq!(cursor.pos(), 15);
}

#[test]
fn comment_with_inner_stars() {
    let source = "{** a * b **}";
    let buf = SourceBuffer::new(source);
    let mut cursor = buf.cursor();
    let mut out = Vec::new();
    assert!(scan_comment(&mut cursor, SyntaxMode::Default, &mut out));
    assert!(cursor.is_eof());
}

#[test]
fn unterminated_comment_runs_to_eof() {
    let source = "{* never closed";
    let buf = SourceBuffer::new(source);
    let mut cursor = buf.cursor();
    let mut out = Vec::new();
    assert!(!scan_comment(&mut cursor, SyntaxMode::Default, &mut out));
    assert_eq!(out, vec![RawToken::new(RawTag::Comment, 15)]);
}

#[test]
fn double_mode_comment_needs_double_close() {
    let source = "{{* a *} b *}}c";
    let buf = SourceBuffer::new(source);
    let mut cursor = buf.cursor();
    let mut out = Vec::new();
    assert!(scan_comment(&mut cursor, SyntaxMode::Double, &mut out));
    assert_eq!(cursor.pos(), 14);
}

// ─── Coverage ─────────────────────────────────────────────────────────

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_coverage {
    use super::super::scan_macro;
    use crate::{LatteVersion, SourceBuffer, SyntaxMode};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tokens_cover_scanned_bytes(body in "[a-z$ {}'\"\\\\/=!*]{0,60}") {
            let source = format!("{{{body}");
            let buf = SourceBuffer::new(&source);
            let mut cursor = buf.cursor();
            let mut out = Vec::new();
            scan_macro(&mut cursor, SyntaxMode::Default, LatteVersion::V3x, &mut out);
            let total: u32 = out.iter().map(|t| t.len).sum();
            prop_assert_eq!(total, cursor.pos());
            prop_assert!(cursor.pos() >= 1);
            prop_assert!(out.iter().all(|t| t.len > 0));
        }
    }
}
