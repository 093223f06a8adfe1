//! Widening a raw text change to whole Latte constructs.
//!
//! The diff only knows which bytes differ. A re-lex must start and stop
//! where the lexer is between constructs in plain `Default` mode, the
//! lexer's restart points. Both texts are lexed with restart points on.
//!
//! - The range starts at the last restart point of the new text strictly
//!   before the change. Everything before it lexed identically in the old
//!   text.
//! - It ends at the first restart point at or after the change's end that
//!   the old text shares once shifted by the edit's length delta. From
//!   there on both texts are the same bytes lexed from the same state.
//!
//! Quotes, comments and `{syntax}` regions need no special handling: the
//! lexer never records a restart point inside them.

use latte_ir::{incremental::TextChange, Span};
use latte_lexer::{lex, LatteVersion, LexOptions};

/// Expand `change` (between `old` and `new`) to a span of `new` that
/// starts and ends on construct boundaries.
///
/// Re-lexing the span alone yields exactly the tokens a full lex of `new`
/// has there. Tokens outside it are those of `old`, shifted after the
/// span by the edit's length delta. The span is empty only for a deletion
/// at the very start of the file that leaves a restart point behind.
pub fn expand_to_constructs(old: &str, new: &str, change: TextChange, version: LatteVersion) -> Span {
    let options = LexOptions::new(version).with_restart_points();
    let old_points = lex(old, &options).restart_points;
    let new_points = lex(new, &options).restart_points;

    let start = new_points
        .iter()
        .rev()
        .copied()
        .find(|&p| p < change.start)
        .unwrap_or(0);

    let new_end = change.new_end();
    let shared_end = new_points
        .iter()
        .copied()
        .filter(|&q| q >= new_end)
        .find(|&q| {
            shifted_back(q, change)
                .is_some_and(|old_q| old_points.binary_search(&old_q).is_ok())
        });
    let end = shared_end.unwrap_or_else(|| Span::whole(new.len()).end);

    let span = Span::new(start, end);
    debug_assert!(span.contains_span(change.new_span()), "{span:?} misses {change:?}");
    tracing::trace!(
        old_points = old_points.len(),
        new_points = new_points.len(),
        %span,
        "restart points"
    );
    span
}

/// Offset in the old text of new-text offset `q`, which lies past the edit.
fn shifted_back(q: u32, change: TextChange) -> Option<u32> {
    (q - change.new_end()).checked_add(change.old_end)
}
