//! Types shared by the index and the searches.
//!
//! Suffix-array ranges, exact and approximate matches, and the edit
//! operations recorded along an approximate match.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in the text or in the suffix array
pub type TextPosition = usize;

/// Sentinel character appended once to the end of the text.
/// EOT (U+0003) sorts below every printable character; content must not
/// contain characters at or below it.
pub const SENTINEL: char = '\u{3}';

/// Number of BWT positions between rank samples
pub const BLOCK_SIZE: usize = 1024;

/// Half-open interval `[begin, end)` with `begin < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeRecord")]
pub struct Range {
    begin: TextPosition,
    end: TextPosition,
}

#[derive(Deserialize)]
struct RangeRecord {
    begin: TextPosition,
    end: TextPosition,
}

impl TryFrom<RangeRecord> for Range {
    type Error = Error;

    fn try_from(record: RangeRecord) -> Result<Self> {
        Self::new(record.begin, record.end)
    }
}

impl Range {
    /// Create a range, rejecting empty or inverted bounds.
    pub fn new(begin: TextPosition, end: TextPosition) -> Result<Self> {
        if begin >= end {
            return Err(Error::InvalidRange { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// First position, inclusive
    #[inline]
    pub fn begin(&self) -> TextPosition {
        self.begin
    }

    /// Last position, exclusive
    #[inline]
    pub fn end(&self) -> TextPosition {
        self.end
    }

    /// Number of positions covered
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn contains(&self, point: TextPosition) -> bool {
        self.begin <= point && point < self.end
    }

    #[inline]
    pub fn overlaps(&self, other: &Range) -> bool {
        self.begin < other.end && other.begin < self.end
    }
}

/// A range of suffix-array rows whose suffixes all start with the matched
/// string, plus the matched string's length in text characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    /// First suffix-array row (inclusive)
    pub begin: usize,
    /// Last suffix-array row (exclusive)
    pub end: usize,
    /// Length of the matched text
    pub length: usize,
}

impl Match {
    /// Number of occurrences in the text
    #[inline]
    pub fn occurrences(&self) -> usize {
        self.end - self.begin
    }

    /// Text range covered by the occurrence starting at `position`.
    ///
    /// `None` for zero-length matches, which cover no text.
    pub fn text_range(&self, position: TextPosition) -> Option<Range> {
        Range::new(position, position + self.length).ok()
    }
}

/// One step of an approximate match, in pattern-processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditOp {
    /// Pattern character equals text character
    Match,
    /// Pattern character replaced by a different text character
    Replace,
    /// Text character with no pattern counterpart
    Insert,
    /// Pattern character with no text counterpart
    Delete,
}

impl EditOp {
    /// Edits charged against the budget
    #[inline]
    pub fn cost(self) -> usize {
        match self {
            EditOp::Match => 0,
            EditOp::Replace | EditOp::Insert | EditOp::Delete => 1,
        }
    }

    /// Whether the step consumes a pattern character
    #[inline]
    pub fn consumes_pattern(self) -> bool {
        !matches!(self, EditOp::Insert)
    }

    /// Whether the step consumes a text character
    #[inline]
    pub fn consumes_text(self) -> bool {
        !matches!(self, EditOp::Delete)
    }

    pub fn as_char(self) -> char {
        match self {
            EditOp::Match => 'M',
            EditOp::Replace => 'R',
            EditOp::Insert => 'I',
            EditOp::Delete => 'D',
        }
    }
}

/// An approximate match: the exact match fields plus the edit script that
/// turns the pattern into the matched text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InexactMatch {
    #[serde(flatten)]
    pub matched: Match,
    pub spec: Vec<EditOp>,
}

impl InexactMatch {
    /// Total edits in the script
    pub fn edits(&self) -> usize {
        self.spec.iter().map(|op| op.cost()).sum()
    }

    /// Compact script, e.g. `MIM` for one insertion between two matches
    pub fn spec_string(&self) -> String {
        self.spec.iter().map(|op| op.as_char()).collect()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows [{}, {}) length {}", self.begin, self.end, self.length)
    }
}

impl fmt::Display for InexactMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} spec {}", self.matched, self.spec_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_empty_and_inverted() {
        assert!(Range::new(0, 1).is_ok());
        assert_eq!(
            Range::new(3, 3),
            Err(Error::InvalidRange { begin: 3, end: 3 })
        );
        assert!(Range::new(4, 2).is_err());
    }

    #[test]
    fn test_range_overlap() {
        let a = Range::new(0, 5).unwrap();
        let b = Range::new(4, 9).unwrap();
        let c = Range::new(5, 9).unwrap();

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // End is exclusive
        assert!(!a.overlaps(&c));
        assert!(a.contains(4));
        assert!(!a.contains(5));
    }

    #[test]
    fn test_range_deserialize_validates() {
        let ok: Range = serde_json::from_str(r#"{"begin": 1, "end": 2}"#).unwrap();
        assert_eq!(ok.len(), 1);

        let bad = serde_json::from_str::<Range>(r#"{"begin": 2, "end": 2}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_zero_length_match_has_no_text_range() {
        let m = Match {
            begin: 0,
            end: 3,
            length: 0,
        };
        assert!(m.text_range(2).is_none());

        let m = Match { length: 4, ..m };
        assert_eq!(m.text_range(2), Some(Range::new(2, 6).unwrap()));
        assert_eq!(m.occurrences(), 3);
    }

    #[test]
    fn test_spec_string_and_edit_count() {
        let m = InexactMatch {
            matched: Match {
                begin: 4,
                end: 5,
                length: 3,
            },
            spec: vec![EditOp::Match, EditOp::Insert, EditOp::Match],
        };
        assert_eq!(m.spec_string(), "MIM");
        assert_eq!(m.edits(), 1);
    }
}
