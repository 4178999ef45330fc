//! Metadata attached to text ranges, and the interval tree that maps text
//! positions back to it.

pub mod interval_tree;
pub mod types;

pub use interval_tree::IntervalTree;
pub use types::{Endpoint, Metadata};
