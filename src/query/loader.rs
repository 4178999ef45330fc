//! Query specifications and the JSON loaders for queries, metadata and text.
//!
//! Query files are JSON arrays:
//!
//! ```json
//! [
//!   { "pattern": "banana", "mode": "backwards" },
//!   { "pattern": "bn", "mode": "binary", "approximate": true, "editBudget": 1 }
//! ]
//! ```
//!
//! The older field names `query`, `type`, `isInexact` and `threshold` are
//! accepted too. Metadata files are arrays of `{ "begin", "end", "value" }`.

use crate::metadata::Metadata;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Which exact search (and which approximate generalization) to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Forward binary search over the suffix array
    Binary,
    /// FM-index backward search
    Backwards,
}

/// One query to run against the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    #[serde(alias = "query")]
    pub pattern: String,
    #[serde(alias = "type")]
    pub mode: SearchMode,
    /// Search within `edit_budget` edits instead of exactly
    #[serde(default, alias = "isInexact")]
    pub approximate: bool,
    #[serde(default, alias = "threshold")]
    pub edit_budget: usize,
}

impl QuerySpec {
    pub fn exact(pattern: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            pattern: pattern.into(),
            mode,
            approximate: false,
            edit_budget: 0,
        }
    }

    pub fn approximate(pattern: impl Into<String>, mode: SearchMode, edit_budget: usize) -> Self {
        Self {
            pattern: pattern.into(),
            mode,
            approximate: true,
            edit_budget,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Binary => f.write_str("binary"),
            SearchMode::Backwards => f.write_str("backwards"),
        }
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}", self.pattern, self.mode)?;
        if self.approximate {
            write!(f, ", up to {} edits", self.edit_budget)?;
        }
        f.write_str(")")
    }
}

/// Read a query list
pub fn load_queries(path: &Path) -> Result<Vec<QuerySpec>> {
    read_json(path).with_context(|| format!("Failed to load queries from {}", path.display()))
}

/// Read a metadata list; every entry must have `begin < end`
pub fn load_metadata<T: DeserializeOwned>(path: &Path) -> Result<Vec<Metadata<T>>> {
    read_json(path).with_context(|| format!("Failed to load metadata from {}", path.display()))
}

/// Read the text to index. It must be valid UTF-8; positions in it count
/// characters.
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read text from {}", path.display()))?;
    String::from_utf8(bytes)
        .with_context(|| format!("Text in {} is not valid UTF-8", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
