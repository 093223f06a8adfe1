//! Snapshot diffing.

use latte_ir::incremental::TextChange;

/// The single edit that turns `old` into `new`, found by trimming the
/// common prefix and suffix. `None` if the texts are equal.
///
/// Both ends of the change fall on character boundaries of both texts.
pub fn compute_change(old: &str, new: &str) -> Option<TextChange> {
    if old == new {
        return None;
    }
    let (old_bytes, new_bytes) = (old.as_bytes(), new.as_bytes());

    let mut prefix = old_bytes
        .iter()
        .zip(new_bytes)
        .take_while(|(a, b)| a == b)
        .count();
    while !old.is_char_boundary(prefix) {
        prefix -= 1;
    }

    let max_suffix = old.len().min(new.len()) - prefix;
    let mut suffix = old_bytes[prefix..]
        .iter()
        .rev()
        .zip(new_bytes[prefix..].iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    while !old.is_char_boundary(old.len() - suffix) {
        suffix -= 1;
    }

    Some(TextChange::new(
        to_u32(prefix),
        to_u32(old.len() - suffix),
        to_u32(new.len() - prefix - suffix),
    ))
}

#[inline]
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
