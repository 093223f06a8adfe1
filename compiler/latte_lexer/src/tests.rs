//! Whole-lexer properties: coverage, termination, mode balance.

use std::time::{Duration, Instant};

use super::*;

fn source_len(source: &str) -> u32 {
    u32::try_from(source.len()).unwrap_or(u32::MAX)
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}

#[test]
fn context_label_does_not_change_output() {
    let source = "{if $x}<b n:if=\"$y\">{/if}";
    let plain = lex(source, &LexOptions::default());
    let labelled = lex(source, &LexOptions::default().with_context("layout.latte"));
    assert_eq!(plain, labelled);
}

#[test]
fn restart_points_only_when_requested() {
    let source = "a{if $x}b{/if}";
    assert!(lex(source, &LexOptions::default()).restart_points.is_empty());
    let output = lex(source, &LexOptions::default().with_restart_points());
    assert_eq!(output.restart_points, vec![0, 8]);
}

#[test]
fn restart_points_skip_syntax_regions() {
    let source = "{syntax off}{x}{/syntax} <p>t";
    let output = lex(source, &LexOptions::default().with_restart_points());
    assert_eq!(output.restart_points, vec![0, 24, 28]);
}

#[test]
fn restart_points_skip_quoted_braces() {
    let source = "{if $a == '}' && $c}X{/if}";
    let output = lex(source, &LexOptions::default().with_restart_points());
    assert_eq!(output.restart_points, vec![0, 20]);
}

#[test]
fn pathological_unclosed_input_is_fast() {
    let mut source = String::new();
    for _ in 0..5_000 {
        source.push_str("{if $x}<div class=\"a\"");
    }
    for _ in 0..5_000 {
        source.push_str("<div n:if=\"$a\" {foreach $l as $i}");
    }
    for _ in 0..2_000 {
        source.push_str("{/foreach}{/block}");
    }

    let started = Instant::now();
    let output = lex(&source, &LexOptions::default());
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
    assert_eq!(output.tokens.check_coverage(source_len(&source)), Ok(()));
    assert!(output.errors.is_empty());
    assert_eq!(output.unclosed.len(), 5_000 + 3_000);
}

#[test]
fn pathological_unclosed_tags_and_macros() {
    let source = "<div ".repeat(5_000) + &"{if ".repeat(5_000) + &"<a n:".repeat(5_000);
    let started = Instant::now();
    let output = lex(&source, &LexOptions::default());
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(output.tokens.check_coverage(source_len(&source)), Ok(()));
}

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_lexer {
    use std::time::{Duration, Instant};

    use proptest::prelude::*;

    use latte_ir::TokenKind;

    use crate::{lex, EndOfInputPolicy, LatteVersion, LexOptions, LexOutput, SyntaxMode};

    fn fragment() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("{"),
            Just("}"),
            Just("{{"),
            Just("}}"),
            Just("'"),
            Just("\""),
            Just("\\"),
            Just("{if $x}"),
            Just("{/if}"),
            Just("{/}"),
            Just("{*"),
            Just("*}"),
            Just("<div "),
            Just(">"),
            Just("/>"),
            Just("n:if=\""),
            Just("n:syntax="),
            Just("class='"),
            Just("{syntax off}"),
            Just("{syntax double}"),
            Just("{/syntax}"),
            Just(" "),
            Just("\n"),
            Just("text"),
            Just("ž"),
        ]
    }

    fn version() -> impl Strategy<Value = LatteVersion> {
        prop::sample::select(LatteVersion::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn tokens_tile_the_source(
            parts in prop::collection::vec(fragment(), 0..120),
            version in version(),
        ) {
            let source = parts.concat();
            let options = LexOptions::new(version).with_end_of_input(EndOfInputPolicy::VersionGated);
            let output = lex(&source, &options);
            prop_assert_eq!(output.tokens.check_coverage(super::source_len(&source)), Ok(()));
            let rebuilt: String = output.tokens.iter().map(|t| t.text(&source)).collect();
            prop_assert_eq!(rebuilt, source);
        }

        #[test]
        fn lexing_resumes_at_restart_points(
            parts in prop::collection::vec(fragment(), 0..60),
            version in version(),
        ) {
            let source = parts.concat();
            let options = LexOptions::new(version).with_restart_points();
            let full = lex(&source, &options);
            prop_assert!(full.restart_points.windows(2).all(|w| w[0] < w[1]));
            for &point in &full.restart_points {
                let tail = lex(&source[point as usize..], &options);
                prop_assert_eq!(tokens_from(&tail, 0), tokens_from(&full, point));
            }
        }

        #[test]
        fn deep_nesting_terminates(depth in 0usize..=50, quotes in 0usize..=50) {
            let source = format!(
                "{{if {}{}{}",
                "{".repeat(depth),
                "'\"".repeat(quotes),
                "}".repeat(depth / 2),
            );
            let started = Instant::now();
            let output = lex(&source, &LexOptions::default());
            prop_assert!(started.elapsed() < Duration::from_secs(2));
            prop_assert_eq!(output.tokens.check_coverage(super::source_len(&source)), Ok(()));
        }

        #[test]
        fn balanced_syntax_tags_restore_default(
            nested in prop::collection::vec(prop_oneof![
                Just(SyntaxMode::Default),
                Just(SyntaxMode::Double),
            ], 0..50),
            innermost_off in any::<bool>(),
        ) {
            let mut source = String::new();
            let mut current = SyntaxMode::Default;
            let mut closers = Vec::new();
            for &mode in &nested {
                source.push_str(&open_tag(current, mode.name()));
                source.push('x');
                closers.push(close_tag(mode));
                current = mode;
            }
            if innermost_off {
                source.push_str(&open_tag(current, "off"));
                source.push_str("{if} {{else}}");
                closers.push(close_tag(SyntaxMode::Off));
            }
            for close in closers.iter().rev() {
                source.push_str(close);
            }

            let output = lex(&source, &LexOptions::default());
            prop_assert_eq!(output.final_mode, SyntaxMode::Default);
            prop_assert_eq!(output.mode_depth, 0);
            prop_assert!(output.errors.is_empty());
            prop_assert!(output.unclosed.is_empty());
        }
    }

    /// Tokens from `from` on, rebased to it. A text token cut by `from`
    /// keeps its tail; adjacent text is merged.
    fn tokens_from(output: &LexOutput, from: u32) -> Vec<(TokenKind, u32, u32)> {
        let mut out: Vec<(TokenKind, u32, u32)> = Vec::new();
        for token in output.tokens.iter().filter(|t| t.span.end > from) {
            let start = token.span.start.max(from) - from;
            let end = token.span.end - from;
            match out.last_mut() {
                Some(last) if last.0 == TokenKind::Text && token.kind == TokenKind::Text && last.2 == start => {
                    last.2 = end;
                }
                _ => out.push((token.kind, start, end)),
            }
        }
        out
    }

    /// `{syntax to}` written in the delimiters of `from`.
    fn open_tag(from: SyntaxMode, to: &str) -> String {
        match from {
            SyntaxMode::Double => format!("{{{{syntax {to}}}}}"),
            _ => format!("{{syntax {to}}}"),
        }
    }

    /// A `{/syntax}` tag recognized while `inner` is active.
    fn close_tag(inner: SyntaxMode) -> &'static str {
        match inner {
            SyntaxMode::Double => "{{/syntax}}",
            _ => "{/syntax}",
        }
    }
}
