//! Exact substring search.
//!
//! Forward search narrows the suffix-array range one pattern character at a
//! time, left to right, by binary searching the text through the suffix
//! array: O(m log n) comparisons and no auxiliary structure.
//!
//! Backward search is the classic FM-index walk, right to left, one
//! `less_than + rank` update per character: O(m) rank queries regardless
//! of text size.

use super::extend_right;
use crate::index::BwtIndex;
use crate::index::types::{Match, TextPosition};

/// Find the suffix-array rows whose suffixes start with `pattern` by
/// binary search.
///
/// Returns `None` when the pattern does not occur. The empty pattern
/// matches every row.
pub fn binary_search(text: &[char], sa: &[TextPosition], pattern: &[char]) -> Option<Match> {
    let mut lo = 0;
    let mut hi = sa.len();

    for (offset, &c) in pattern.iter().enumerate() {
        (lo, hi) = extend_right(text, sa, lo, hi, offset, c)?;
    }

    (lo < hi).then_some(Match {
        begin: lo,
        end: hi,
        length: pattern.len(),
    })
}

/// Find the suffix-array rows whose suffixes start with `pattern` by
/// FM-index backward search.
///
/// Stops as soon as a character is absent from the text or the range
/// closes. Yields the same rows as [`binary_search`].
pub fn backwards_search(index: &BwtIndex, pattern: &[char]) -> Option<Match> {
    let mut lo = 0;
    let mut hi = index.len();

    for &c in pattern.iter().rev() {
        (lo, hi) = index.extend_left(c, lo, hi)?;
    }

    (lo < hi).then_some(Match {
        begin: lo,
        end: hi,
        length: pattern.len(),
    })
}
