//! Configuration for index construction, searching and benchmarking.
//!
//! Every section has defaults, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "search": { "max_edit_budget": 2 }, "bench": { "query_repeats": 50 } }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub search: SearchConfig,
    pub bench: BenchConfig,
}

/// Configuration for text preparation and suffix sorting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Lowercase ASCII in the text and in every pattern (default: false)
    pub case_insensitive: bool,
    /// Text length above which suffixes are sorted in parallel
    /// (default: 100_000)
    pub parallel_sort_threshold: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            parallel_sort_threshold: 100_000,
        }
    }
}

/// Limits applied to queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Largest edit budget an approximate query may ask for (default: 3).
    /// The search tree grows exponentially with the budget.
    pub max_edit_budget: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_edit_budget: 3 }
    }
}

/// Timing harness settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Untimed runs before measuring (default: 1)
    pub warmup_repeats: usize,
    /// Timed runs per query (default: 10)
    pub query_repeats: usize,
    /// Print every matched string with its metadata (default: false)
    pub show_matches: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            warmup_repeats: 1,
            query_repeats: 10,
            show_matches: false,
        }
    }
}

impl Config {
    /// Load a JSON config file; missing sections and fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }
}
