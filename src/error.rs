//! Error types for index construction and query validation.
//!
//! A query that finds nothing is not an error; these variants only cover
//! inputs that would corrupt every structure derived from them.

use thiserror::Error;

/// Result type alias for fmx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by precondition checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A range with `begin >= end`.
    #[error("invalid range [{begin}, {end}): begin must be less than end")]
    InvalidRange {
        /// Requested start (inclusive).
        begin: usize,
        /// Requested end (exclusive).
        end: usize,
    },

    /// The text does not end with the sentinel character.
    #[error(
        "text must end with the sentinel character U+{:04X}",
        u32::from(crate::index::SENTINEL)
    )]
    MissingSentinel,

    /// The content contains a character that sorts at or below the sentinel.
    #[error(
        "character U+{code:04X} at position {position} is reserved (must sort above the sentinel)"
    )]
    ReservedCharacter {
        /// Code point of the offending character.
        code: u32,
        /// Its position in the content, in characters.
        position: usize,
    },

    /// Suffix array length differs from the text length.
    #[error("suffix array has {actual} entries, expected {expected}")]
    SuffixArrayLength {
        /// Text length.
        expected: usize,
        /// Suffix array length.
        actual: usize,
    },

    /// Suffix array is not a permutation of the text positions.
    #[error("suffix array is not a permutation: entry {position} is out of range or repeated")]
    MalformedSuffixArray {
        /// Index into the suffix array of the first bad entry.
        position: usize,
    },

    /// Approximate query asked for more edits than configured.
    #[error("edit budget {requested} exceeds the configured maximum of {max}")]
    BudgetTooLarge {
        /// Budget in the query.
        requested: usize,
        /// Configured limit.
        max: usize,
    },
}
