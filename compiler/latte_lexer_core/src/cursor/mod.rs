//! Zero-cost cursor over a sentinel-terminated buffer.
//!
//! The cursor advances through the buffer byte-by-byte. EOF is detected
//! when the current byte equals the sentinel (`0x00`) and the position
//! has reached the source length. Delimiter searches use `memchr`, which
//! only ever looks at the template bytes (never the sentinel or padding).
//!
//! # Interior Null Bytes
//!
//! A null at `pos < source_len` is template content; a null at
//! `pos >= source_len` is the sentinel. Use [`Cursor::is_eof`] to tell them
//! apart.
//!
//! # Character Boundaries
//!
//! Every delimiter the Latte scanners stop at is ASCII, and ASCII bytes
//! never occur inside a multi-byte UTF-8 sequence, so any position a
//! scanner stops at is a character boundary of the original `&str`.

/// Zero-cost cursor over a sentinel-terminated byte buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`], enabling cheap state snapshots for lookahead.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// Current read position (byte index into `buf`).
    pos: u32,
    /// Length of actual source content (excludes sentinel and padding).
    source_len: u32,
}

/// &[u8] = 16 (fat pointer), u32 = 4, u32 = 4 => 24 bytes.
const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    /// Create a new cursor at position 0.
    ///
    /// `buf[source_len]` must be `0x00` and all bytes after it must be
    /// `0x00`, as guaranteed by `SourceBuffer::new()`.
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            (source_len as usize) < buf.len(),
            "sentinel must be within buffer bounds"
        );
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Byte at the current position (`0x00` at EOF).
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// Byte one position ahead of current.
    ///
    /// Safe at any position up to EOF thanks to the cache-line padding.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    #[inline]
    pub fn advance(&mut self) {
        debug_assert!(!self.is_eof(), "advance past EOF");
        self.pos += 1;
    }

    /// Advance by `n` bytes, stopping at EOF.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos = self.pos.saturating_add(n).min(self.source_len);
    }

    /// Move forward to the absolute offset `pos` (clamped to EOF).
    #[inline]
    pub fn advance_to(&mut self, pos: u32) {
        debug_assert!(pos >= self.pos, "cursor cannot move backwards");
        self.pos = pos.min(self.source_len);
    }

    /// Returns `true` if the cursor has reached the sentinel.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Template bytes from the current position to EOF.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos as usize..self.source_len as usize]
    }

    /// Returns `true` if the bytes at the current position equal `needle`.
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.remaining().starts_with(needle)
    }

    /// Extract a source substring as `&str`.
    ///
    /// `start..end` must fall within the source content and on character
    /// boundaries, which holds for any pair of positions a scanner stopped
    /// at (see the module docs).
    #[allow(
        unsafe_code,
        reason = "from_utf8_unchecked on source originally validated as &str"
    )]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(
            end <= self.source_len,
            "slice end {end} exceeds source length {}",
            self.source_len
        );
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        // SAFETY: The buffer was copied from a `&str` and both offsets sit on
        // ASCII delimiters or the source bounds, hence on char boundaries.
        unsafe { std::str::from_utf8_unchecked(&self.buf[start as usize..end as usize]) }
    }

    /// Source substring from `start` to the current position.
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false` so the sentinel stops the loop. This
    /// holds for every byte class the Latte scanners use.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
        // An interior null accepted by a careless predicate must not walk
        // into the padding.
        self.pos = self.pos.min(self.source_len);
    }

    /// Number of bytes in the UTF-8 character starting with `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance past one full UTF-8 character (no-op at EOF).
    #[inline]
    pub fn advance_char(&mut self) {
        if !self.is_eof() {
            let width = Self::utf8_char_width(self.current());
            self.advance_n(width);
        }
    }

    /// Advance past ASCII whitespace (space, tab, CR, LF, form feed).
    #[inline]
    pub fn eat_whitespace(&mut self) {
        self.eat_while(is_whitespace);
    }

    /// Advance to the next `byte` or EOF. Returns the byte found, or `0`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets within remaining() fit in u32"
    )]
    pub fn skip_to_byte(&mut self, byte: u8) -> u8 {
        if let Some(off) = memchr::memchr(byte, self.remaining()) {
            self.pos += off as u32;
            byte
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Advance to the next occurrence of either byte, or EOF.
    /// Returns the byte found, or `0` for EOF.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets within remaining() fit in u32"
    )]
    pub fn skip_to_either(&mut self, a: u8, b: u8) -> u8 {
        if let Some(off) = memchr::memchr2(a, b, self.remaining()) {
            self.pos += off as u32;
            self.current()
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Offset (relative to the current position) of the next occurrence of
    /// `needle`, without moving the cursor.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets within remaining() fit in u32"
    )]
    pub fn find(&self, needle: &[u8]) -> Option<u32> {
        memchr::memmem::find(self.remaining(), needle).map(|off| off as u32)
    }
}

/// ASCII whitespace as understood by HTML and Latte tag syntax.
#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}
