//! Suffix array construction
//!
//! The suffix array is the base structure every search works over: text
//! positions sorted by the suffix starting at each one. All occurrences of
//! a substring occupy one contiguous range of it.
//!
//! - `builder`: Prepares the text and sorts its suffixes

pub mod builder;

pub use builder::{BuiltSuffixArray, SuffixArrayBuilder, sort_suffixes};
