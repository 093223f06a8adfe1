//! Root lexer: drives the scanners over a whole template.
//!
//! Per position the current syntax mode decides what happens:
//!
//! - `Default` / `Double`: text runs to the next `{` or `<`. A `{` that
//!   opens a macro goes to the macro scanner; `<` followed by a letter
//!   starts an HTML tag header, whose `n:` attributes go to the attribute
//!   scanner.
//! - `Off`: a raw substring search for `{/syntax}` (in the delimiters of
//!   the mode it restores) or `n:syntax=`.
//!   Everything before the hit is text.
//!
//! Raw tokens accumulate as `(tag, len)` and are cooked into a
//! [`TokenList`] at the end. Every step consumes at least one byte.

use latte_ir::{Span, Token, TokenList};
use latte_lexer_core::{
    find_syntax_close, scan_attribute, scan_comment, scan_macro, syntax_close_len, Cursor,
    LatteVersion, RawTag, RawToken, SyntaxMode, SyntaxModeError, SyntaxModeState,
    SyntaxTransition,
};

use crate::constructs::{self, ConstructStack};
use crate::convert::{error_kind, token_kind};
use crate::{LexError, LexErrorKind, LexOptions, LexOutput, MacroRegistry};

pub(crate) struct RootLexer<'a, 'r> {
    cursor: Cursor<'a>,
    version: LatteVersion,
    registry: &'r MacroRegistry,
    modes: SyntaxModeState,
    constructs: ConstructStack,
    raw: Vec<RawToken>,
    errors: Vec<LexError>,
    restart_points: Vec<u32>,
}

impl<'a, 'r> RootLexer<'a, 'r> {
    pub(crate) fn new(cursor: Cursor<'a>, version: LatteVersion, registry: &'r MacroRegistry) -> Self {
        RootLexer {
            cursor,
            version,
            registry,
            modes: SyntaxModeState::new(),
            constructs: ConstructStack::default(),
            // Rough guess: one raw token per 8 bytes of template.
            raw: Vec::with_capacity(cursor.source_len() as usize / 8 + 1),
            errors: Vec::new(),
            restart_points: Vec::new(),
        }
    }

    /// Lex to end of input and cook the result.
    pub(crate) fn run(mut self, options: &LexOptions) -> LexOutput {
        while !self.cursor.is_eof() {
            let before = self.cursor.pos();
            if options.record_restart_points
                && self.modes.current_mode() == SyntaxMode::Default
                && self.modes.depth() == 0
            {
                self.restart_points.push(before);
            }
            match self.modes.current_mode() {
                SyntaxMode::Off => self.off_text(),
                mode => self.markup(mode),
            }
            debug_assert!(self.cursor.pos() > before, "lexer made no progress at {before}");
        }
        tracing::trace!(
            open = self.constructs.len(),
            mode_depth = self.modes.depth(),
            "end of input"
        );
        self.finish(options)
    }

    // ─── Modes ────────────────────────────────────────────────────────

    /// One step in `Default` or `Double` mode.
    fn markup(&mut self, mode: SyntaxMode) {
        let start = self.cursor.pos();
        match self.cursor.skip_to_either(b'{', b'<') {
            b'{' => {
                self.text(start);
                self.brace(mode);
            }
            b'<' => {
                self.text(start);
                self.angle();
            }
            _ => self.text(start),
        }
    }

    /// One step in `Off` mode.
    ///
    /// The closing tag is searched in the delimiters of the mode it
    /// restores, so `{{/syntax}}` ends an `off` region opened from `double`.
    fn off_text(&mut self) {
        const ATTRIBUTE: &[u8] = b"n:syntax=";

        let start = self.cursor.pos();
        let close = find_syntax_close(self.cursor.remaining(), self.modes.outer_mode());
        let attribute = self.cursor.find(ATTRIBUTE);
        match (close, attribute) {
            (Some((c, _)), Some(a)) if (a as usize) < c => {
                self.cursor.advance_n(a);
                self.text(start);
                self.n_attribute();
            }
            (Some((c, mode)), _) => {
                self.cursor.advance_n(u32::try_from(c).unwrap_or(u32::MAX));
                self.text(start);
                self.macro_tag(mode);
            }
            (None, Some(a)) => {
                self.cursor.advance_n(a);
                self.text(start);
                self.n_attribute();
            }
            (None, None) => {
                self.cursor.advance_to(self.cursor.source_len());
                self.text(start);
            }
        }
    }

    // ─── Macros ───────────────────────────────────────────────────────

    /// Cursor on `{`. Decide between macro, comment and literal brace.
    fn brace(&mut self, mode: SyntaxMode) {
        match mode {
            SyntaxMode::Default => {
                // `{` followed by whitespace, a quote or another brace is
                // plain text (JS object literals, `{{` in Default).
                let next = self.cursor.peek();
                let at_end = self.cursor.pos() + 1 >= self.cursor.source_len();
                if at_end || matches!(next, b'}' | b'{' | b'\'' | b'"') || is_whitespace(next) {
                    self.literal_byte();
                } else if next == b'*' {
                    scan_comment(&mut self.cursor, mode, &mut self.raw);
                } else {
                    self.macro_tag(mode);
                }
            }
            SyntaxMode::Double => {
                if self.cursor.starts_with(b"{{*") {
                    scan_comment(&mut self.cursor, mode, &mut self.raw);
                } else if self.cursor.starts_with(b"{{") {
                    self.macro_tag(mode);
                } else if syntax_close_len(self.cursor.remaining(), SyntaxMode::Default).is_some() {
                    self.macro_tag(SyntaxMode::Default);
                } else {
                    self.literal_byte();
                }
            }
            SyntaxMode::Off => self.literal_byte(),
        }
    }

    /// Cursor on an opening delimiter of `mode`.
    fn macro_tag(&mut self, mode: SyntaxMode) {
        let start = self.cursor.pos();
        let scan = scan_macro(&mut self.cursor, mode, self.version, &mut self.raw);
        let end = self.cursor.pos();
        if let Some((name_start, name_end)) = scan.name {
            let name = self.cursor.slice(name_start, name_end);
            self.on_macro(name, Span::new(start, end), scan.closed);
        }
    }

    fn on_macro(&mut self, name: &str, span: Span, closed: bool) {
        if name == "/syntax" {
            let transition = self.modes.pop();
            self.on_syntax(Ok(transition), span);
            return;
        }
        if name == "syntax" {
            let text = self.cursor.slice(span.start, span.end);
            let result = self.modes.process_syntax_tag(text);
            self.on_syntax(result, span);
            return;
        }

        if let Some(closing) = name.strip_prefix('/') {
            self.constructs
                .close((!closing.is_empty()).then_some(closing));
            return;
        }

        if self.registry.is_block(name, self.version) && !(closed && self.is_self_closing(span)) {
            self.constructs.push(name, span);
        }
    }

    /// `{block foo /}`: a block tag that closes itself.
    fn is_self_closing(&self, span: Span) -> bool {
        self.cursor
            .slice(span.start, span.end)
            .trim_end_matches('}')
            .trim_end()
            .ends_with('/')
    }

    fn on_syntax(&mut self, result: Result<SyntaxTransition, SyntaxModeError>, span: Span) {
        match result {
            Ok(transition) => {
                tracing::trace!(?transition, %span, "syntax mode");
                match transition {
                    SyntaxTransition::Pushed { .. } => self.constructs.push("syntax", span),
                    SyntaxTransition::Popped { .. } => {
                        self.constructs.close(Some("syntax"));
                    }
                    SyntaxTransition::Overridden { .. } | SyntaxTransition::Unchanged => {}
                }
            }
            Err(SyntaxModeError::InvalidSyntaxMode(value)) => {
                tracing::debug!(%value, %span, "invalid syntax mode");
                self.errors
                    .push(LexError::new(span, LexErrorKind::InvalidSyntaxMode { value }));
            }
        }
    }

    // ─── HTML tags ────────────────────────────────────────────────────

    /// Cursor on `<`.
    fn angle(&mut self) {
        if self.cursor.peek().is_ascii_alphabetic() {
            self.tag_header();
        } else {
            self.literal_byte();
        }
    }

    /// `<name attr... >`. Stops after `>` / `/>`, before a stray `<`, or at
    /// end of input.
    fn tag_header(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'_' | b'.'));
        self.text(start);

        loop {
            if self.cursor.is_eof() {
                return;
            }
            let start = self.cursor.pos();
            match self.cursor.current() {
                b'>' => {
                    self.cursor.advance();
                    self.text(start);
                    return;
                }
                b'/' if self.cursor.peek() == b'>' => {
                    self.cursor.advance_n(2);
                    self.text(start);
                    return;
                }
                b'<' => return,
                b'{' => self.brace(self.modes.current_mode()),
                b if is_whitespace(b) => {
                    self.cursor.eat_whitespace();
                    self.text(start);
                }
                b'n' if self.cursor.starts_with(b"n:") => self.n_attribute(),
                _ => self.html_attribute(),
            }
        }
    }

    /// Cursor on `n:`.
    fn n_attribute(&mut self) {
        let start = self.cursor.pos();
        let scan = scan_attribute(&mut self.cursor, self.version, &mut self.modes, &mut self.raw);
        if let Some(result) = scan.syntax {
            self.on_syntax(result, Span::new(start, self.cursor.pos()));
        }
    }

    /// A plain HTML attribute. Its text stays `Text`, but macros inside it
    /// (`class="{$cls}"`, `{if $x}checked{/if}`) are still lexed.
    fn html_attribute(&mut self) {
        let start = self.cursor.pos();
        self.cursor.eat_while(is_attribute_name_byte);
        if self.cursor.current() == b'=' {
            self.cursor.advance();
            match self.cursor.current() {
                quote @ (b'"' | b'\'') => {
                    self.cursor.advance();
                    self.text(start);
                    self.quoted_html_value(quote);
                    return;
                }
                _ => self
                    .cursor
                    .eat_while(|b| !is_whitespace(b) && !matches!(b, b'>' | b'{' | b'<' | 0)),
            }
        }
        if self.cursor.pos() == start {
            self.cursor.advance_char();
        }
        self.text(start);
    }

    /// Cursor after the opening quote of a plain attribute value.
    fn quoted_html_value(&mut self, quote: u8) {
        loop {
            let start = self.cursor.pos();
            match self.cursor.skip_to_either(quote, b'{') {
                b'{' => {
                    self.text(start);
                    let mode = self.modes.current_mode();
                    self.brace(mode);
                }
                0 => {
                    self.text(start);
                    return;
                }
                _ => {
                    self.cursor.advance();
                    self.text(start);
                    return;
                }
            }
        }
    }

    // ─── Output ───────────────────────────────────────────────────────

    /// Emit `start..pos` as text (nothing if empty).
    fn text(&mut self, start: u32) {
        let end = self.cursor.pos();
        if end > start {
            self.raw.push(RawToken::new(RawTag::Text, end - start));
        }
    }

    fn literal_byte(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance_char();
        self.text(start);
    }

    fn finish(self, options: &LexOptions) -> LexOutput {
        let RootLexer {
            cursor,
            version,
            modes,
            constructs,
            raw,
            mut errors,
            restart_points,
            ..
        } = self;

        let mut tokens = TokenList::with_capacity(raw.len());
        let mut offset = 0u32;
        for token in &raw {
            let span = Span::new(offset, offset + token.len);
            if let Some(kind) = error_kind(token.tag) {
                errors.push(LexError::new(span, kind));
            }
            tokens.push(Token::new(token_kind(token.tag), span));
            offset += token.len;
        }
        debug_assert_eq!(offset, cursor.source_len(), "raw tokens must cover the source");

        let unclosed = constructs.into_vec();
        errors.extend(constructs::resolve(&unclosed, options.end_of_input, version));
        errors.sort_by_key(|e| e.span.start);

        LexOutput {
            tokens,
            errors,
            unclosed,
            final_mode: modes.current_mode(),
            mode_depth: modes.depth(),
            restart_points,
        }
    }
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

#[inline]
fn is_attribute_name_byte(b: u8) -> bool {
    !is_whitespace(b) && !matches!(b, b'=' | b'>' | b'/' | b'{' | b'<' | b'"' | b'\'' | 0)
}
