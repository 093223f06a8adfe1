//! Raw token tags produced by the scanners.

/// Classification of a raw token.
///
/// Error conditions are tags, not `Result::Err`: the scanners never fail.
/// Discriminants are grouped the same way as the cooked token kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum RawTag {
    // === Plain content: 0-15 ===
    Text = 0,
    Comment = 1,

    // === Macro: 16-31 ===
    MacroStart = 16,
    MacroName = 17,
    MacroContent = 18,
    MacroEnd = 19,
    MacroWhitespace = 20,

    // === n:attribute: 32-47 ===
    AttributeName = 32,
    AttributeStart = 33,
    AttributeValue = 34,
    AttributeEnd = 35,

    // === Errors: 240-255 ===
    InvalidMacroName = 240,
    InvalidAttributeSyntax = 241,
    UnclosedAttributeQuotes = 242,
}

impl RawTag {
    #[inline]
    pub fn is_error(self) -> bool {
        (self as u8) >= 240
    }
}

/// A raw token: a tag and a byte length. Offsets are implied by order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}

impl RawToken {
    #[inline]
    pub const fn new(tag: RawTag, len: u32) -> Self {
        RawToken { tag, len }
    }
}

/// Push a token for `start..end`, skipping empty ranges.
#[inline]
pub(crate) fn emit(out: &mut Vec<RawToken>, tag: RawTag, start: u32, end: u32) {
    if end > start {
        out.push(RawToken::new(tag, end - start));
    }
}

#[cfg(test)]
mod tests;
