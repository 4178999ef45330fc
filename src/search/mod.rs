//! Substring search over a suffix array.
//!
//! Four entry points, all pure functions over the immutable text, suffix
//! array and [`BwtIndex`](crate::index::BwtIndex):
//!
//! | | exact | within an edit budget |
//! |---|---|---|
//! | forward, binary search over the text | [`binary_search`] | [`inexact_binary_search`] |
//! | FM-index backward search | [`backwards_search`] | [`inexact_backwards_search`] |
//!
//! Every result is a range of suffix-array rows; the text positions of the
//! occurrences are `sa[begin..end]`.

pub mod exact;
pub mod inexact;

pub use exact::{backwards_search, binary_search};
pub use inexact::{inexact_backwards_search, inexact_binary_search};

use crate::index::types::{SENTINEL, TextPosition};

/// Character at `position`, or the sentinel past the end of the text, so
/// every suffix reads as if padded with sentinels.
#[inline]
pub(crate) fn char_at(text: &[char], position: usize) -> char {
    text.get(position).copied().unwrap_or(SENTINEL)
}

/// One forward step: among rows `[lo, hi)`, all sharing their first
/// `offset` characters, keep those whose character at `offset` is `c`.
///
/// Two binary searches over the rows, one for the first row with that
/// character and one past the last.
#[inline]
pub(crate) fn extend_right(
    text: &[char],
    sa: &[TextPosition],
    lo: usize,
    hi: usize,
    offset: usize,
    c: char,
) -> Option<(usize, usize)> {
    let rows = &sa[lo..hi];
    let first = rows.partition_point(|&p| char_at(text, p + offset) < c);
    let last = first + rows[first..].partition_point(|&p| char_at(text, p + offset) <= c);

    (first < last).then_some((lo + first, lo + last))
}
