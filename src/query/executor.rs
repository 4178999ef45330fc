//! Runs queries against a text index and resolves every occurrence to the
//! metadata overlapping it.

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::index::TextIndex;
use crate::index::types::{InexactMatch, Match, TextPosition};
use crate::metadata::{IntervalTree, Metadata};
use crate::query::loader::{QuerySpec, SearchMode};
use rayon::prelude::*;

/// Suffix-array matches of one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextHits {
    /// Result of an exact search
    Exact(Option<Match>),
    /// Result of an approximate search
    Approximate(Vec<InexactMatch>),
}

impl TextHits {
    /// Every match, approximate ones without their edit scripts
    pub fn iter(&self) -> impl Iterator<Item = &Match> + '_ {
        let (exact, approximate) = match self {
            TextHits::Exact(m) => (m.as_ref(), &[][..]),
            TextHits::Approximate(ms) => (None, ms.as_slice()),
        };
        exact
            .into_iter()
            .chain(approximate.iter().map(|m| &m.matched))
    }

    /// Number of matches (suffix-array ranges)
    pub fn len(&self) -> usize {
        match self {
            TextHits::Exact(m) => usize::from(m.is_some()),
            TextHits::Approximate(ms) => ms.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total suffix-array rows covered by all matches
    pub fn occurrences(&self) -> usize {
        self.iter().map(Match::occurrences).sum()
    }
}

/// One match with the metadata of all its occurrences
#[derive(Debug, Clone)]
pub struct QueryResult<'t, T> {
    pub matched: Match,
    /// Entries overlapping each occurrence, occurrence by occurrence.
    /// An entry overlapping several occurrences appears once per occurrence.
    pub metadata: Vec<&'t Metadata<T>>,
}

/// Query executor
pub struct QueryExecutor<'a, T> {
    index: &'a TextIndex,
    tree: &'a IntervalTree<T>,
    config: SearchConfig,
}

impl<'a, T> QueryExecutor<'a, T> {
    pub fn new(index: &'a TextIndex, tree: &'a IntervalTree<T>) -> Self {
        Self::with_config(index, tree, SearchConfig::default())
    }

    pub fn with_config(
        index: &'a TextIndex,
        tree: &'a IntervalTree<T>,
        config: SearchConfig,
    ) -> Self {
        Self {
            index,
            tree,
            config,
        }
    }

    pub fn index(&self) -> &'a TextIndex {
        self.index
    }

    /// Run the text search the query asks for.
    ///
    /// Fails only if an approximate query exceeds the configured budget.
    pub fn search_text(&self, query: &QuerySpec) -> Result<TextHits> {
        let pattern = query.pattern.as_str();

        if !query.approximate {
            let found = match query.mode {
                SearchMode::Binary => self.index.binary_search(pattern),
                SearchMode::Backwards => self.index.backwards_search(pattern),
            };
            return Ok(TextHits::Exact(found));
        }

        if query.edit_budget > self.config.max_edit_budget {
            return Err(Error::BudgetTooLarge {
                requested: query.edit_budget,
                max: self.config.max_edit_budget,
            });
        }

        let budget = query.edit_budget;
        let found = match query.mode {
            SearchMode::Binary => self.index.inexact_binary_search(budget, pattern),
            SearchMode::Backwards => self.index.inexact_backwards_search(budget, pattern),
        };
        Ok(TextHits::Approximate(found))
    }

    /// Metadata overlapping the occurrence of `m` at text `position`.
    ///
    /// The tree is queried with `[position, position + m.length)`;
    /// zero-length matches cover no text and resolve to nothing.
    pub fn metadata_at(&self, m: &Match, position: TextPosition) -> Vec<&'a Metadata<T>> {
        match m.text_range(position) {
            Some(range) => self.tree.find_overlapping(range),
            None => Vec::new(),
        }
    }

    fn resolve_one(&self, m: &Match) -> QueryResult<'a, T> {
        let metadata = self
            .index
            .positions(m)
            .iter()
            .flat_map(|&position| self.metadata_at(m, position))
            .collect();

        QueryResult {
            matched: *m,
            metadata,
        }
    }
}

impl<'a, T: Sync> QueryExecutor<'a, T> {
    /// Resolve every occurrence of every match to its metadata.
    /// Matches are resolved in parallel; output order follows `hits`.
    pub fn resolve_metadata(&self, hits: &TextHits) -> Vec<QueryResult<'a, T>> {
        let matches: Vec<&Match> = hits.iter().collect();
        matches.par_iter().map(|m| self.resolve_one(m)).collect()
    }

    /// Search and resolve in one call
    pub fn execute(&self, query: &QuerySpec) -> Result<Vec<QueryResult<'a, T>>> {
        let hits = self.search_text(query)?;
        Ok(self.resolve_metadata(&hits))
    }
}
