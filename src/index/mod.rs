pub mod bwt;
pub mod suffix_array;
pub mod text_index;
pub mod types;

pub use bwt::BwtIndex;
pub use text_index::{TextIndex, TextIndexStats};
pub use types::*;
