//! Latte IR - shared data types for the Latte lexing pipeline.
//!
//! This crate contains the types that cross crate boundaries:
//! - Spans for source locations
//! - Tokens and `TokenList` for lexer output
//! - File identities used by the incremental change detector
//! - Text change descriptions for incremental re-lexing
//!
//! The low-level scanner (`latte_lexer_core`) does not depend on this crate;
//! it produces `(tag, len)` pairs that `latte_lexer` cooks into [`Token`]s.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod file_id;
pub mod incremental;
mod span;
mod token;

pub use file_id::FileId;
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
