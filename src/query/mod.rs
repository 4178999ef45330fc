pub mod executor;
pub mod loader;

pub use executor::{QueryExecutor, QueryResult, TextHits};
pub use loader::{QuerySpec, SearchMode, load_metadata, load_queries, load_text};
