//! Text change descriptions for incremental re-lexing.
//!
//! A [`TextChange`] records that the region `[start, old_end)` of the old
//! text was replaced by `new_len` bytes. The change detector derives one by
//! diffing two snapshots and then widens it to whole Latte constructs.

use crate::Span;

/// A single text edit: `[start, old_end)` in the old text replaced with
/// `new_len` bytes.
///
/// ```
/// use latte_ir::incremental::TextChange;
///
/// let insert = TextChange::insert(10, 5);
/// assert_eq!(insert.delta(), 5);
///
/// let replace = TextChange::replace(0, 3, 5);
/// assert_eq!(replace.new_end(), 5);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TextChange {
    /// Start byte offset (same in old and new text).
    pub start: u32,
    /// End byte offset in old text (exclusive).
    pub old_end: u32,
    /// Length of replacement text in bytes.
    pub new_len: u32,
}

impl TextChange {
    #[inline]
    pub const fn new(start: u32, old_end: u32, new_len: u32) -> Self {
        TextChange {
            start,
            old_end,
            new_len,
        }
    }

    /// Insertion of `len` bytes at `at`.
    #[inline]
    pub const fn insert(at: u32, len: u32) -> Self {
        TextChange {
            start: at,
            old_end: at,
            new_len: len,
        }
    }

    /// Deletion of `len` bytes starting at `start`.
    #[inline]
    pub const fn delete(start: u32, len: u32) -> Self {
        TextChange {
            start,
            old_end: start + len,
            new_len: 0,
        }
    }

    #[inline]
    pub const fn replace(start: u32, old_len: u32, new_len: u32) -> Self {
        TextChange {
            start,
            old_end: start + old_len,
            new_len,
        }
    }

    /// Net change in document length (positive = grew, negative = shrank).
    #[inline]
    pub fn delta(&self) -> i64 {
        i64::from(self.new_len) - i64::from(self.old_len())
    }

    #[inline]
    pub const fn old_len(&self) -> u32 {
        self.old_end - self.start
    }

    /// End of the replacement in the new text.
    #[inline]
    pub const fn new_end(&self) -> u32 {
        self.start + self.new_len
    }

    /// Removed region, in old-text coordinates.
    #[inline]
    pub const fn old_span(&self) -> Span {
        Span::new(self.start, self.old_end)
    }

    /// Inserted region, in new-text coordinates.
    #[inline]
    pub const fn new_span(&self) -> Span {
        Span::new(self.start, self.new_end())
    }
}
