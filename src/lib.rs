//! # FMX - Suffix-Array Substring Search
//!
//! FMX indexes a text once and answers substring queries over it, exactly or
//! within an edit budget, and maps every occurrence to the metadata ranges
//! (chapters, documents, annotations) that overlap it.
//!
//! Text is indexed by Unicode scalar value: positions, match lengths and
//! metadata offsets all count characters.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Suffix array construction, BWT/rank index, the
//!   [`TextIndex`](index::TextIndex) facade
//! - [`search`] - Binary and backward search, exact and approximate
//! - [`metadata`] - Interval tree over metadata ranges
//! - [`query`] - Query files, execution and metadata resolution
//! - [`bench`] - Query timing harness
//! - [`output`] - Terminal formatting
//! - [`config`] - JSON configuration with defaults
//!
//! ## Quick Start
//!
//! ```
//! use fmx::config::IndexConfig;
//! use fmx::index::TextIndex;
//! use fmx::metadata::{IntervalTree, Metadata};
//! use fmx::query::{QueryExecutor, QuerySpec, SearchMode};
//!
//! let index = TextIndex::build("the cat sat on the mat", &IndexConfig::default()).unwrap();
//! let tree = IntervalTree::new(vec![Metadata::new(4, 7, "cat").unwrap()]);
//!
//! let executor = QueryExecutor::new(&index, &tree);
//! let results = executor
//!     .execute(&QuerySpec::approximate("cot", SearchMode::Backwards, 1))
//!     .unwrap();
//!
//! assert!(results.iter().any(|r| r.metadata.iter().any(|m| m.value == "cat")));
//! ```
//!
//! ## Performance
//!
//! Backward search costs O(pattern length) rank lookups, each one sampled
//! block read plus a scan of under [`BLOCK_SIZE`](index::BLOCK_SIZE) symbols.
//! Binary search costs O(pattern length * log text length) comparisons.
//! Approximate searches grow exponentially with the edit budget, which the
//! search config caps.

pub mod bench;
pub mod config;
pub mod error;
pub mod index;
pub mod metadata;
pub mod output;
pub mod query;
pub mod search;
pub mod utils;

pub use error::{Error, Result};
