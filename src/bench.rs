//! Query timing harness.
//!
//! Each query is run `warmup_repeats` times untimed, then its text search is
//! timed over `query_repeats` runs, then metadata resolution of the last
//! text result is timed over `query_repeats` runs.

use crate::config::BenchConfig;
use crate::error::Result;
use crate::index::types::TextPosition;
use crate::query::{QueryExecutor, QuerySpec, TextHits};
use std::fmt::Display;
use std::hint::black_box;
use std::time::{Duration, Instant};
use tracing::debug;

/// One matched occurrence, rendered for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSample {
    pub position: TextPosition,
    /// Matched characters
    pub text: String,
    /// Values of the metadata overlapping this occurrence
    pub metadata: Vec<String>,
}

/// Timings and counts for one query
#[derive(Debug, Clone)]
pub struct QueryReport {
    pub query: QuerySpec,
    pub repeats: usize,
    pub text_total: Duration,
    pub metadata_total: Duration,
    /// Suffix-array ranges found
    pub matches: usize,
    /// Suffix-array rows across all ranges
    pub occurrences: usize,
    /// Metadata entries attached across all occurrences
    pub metadata_hits: usize,
    /// Filled only when `show_matches` is set
    pub samples: Vec<MatchSample>,
}

impl QueryReport {
    pub fn text_ms_per_query(&self) -> f64 {
        millis(self.text_total) / self.repeats as f64
    }

    /// Metadata time per run and per match; a query without matches
    /// divides by the run count only
    pub fn metadata_ms_per_match(&self) -> f64 {
        millis(self.metadata_total) / (self.repeats * self.matches.max(1)) as f64
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Runs queries through an executor with the configured repeat counts
pub struct BenchRunner<'a, T> {
    executor: QueryExecutor<'a, T>,
    config: BenchConfig,
}

impl<'a, T: Sync + Display> BenchRunner<'a, T> {
    pub fn new(executor: QueryExecutor<'a, T>, config: BenchConfig) -> Self {
        Self { executor, config }
    }

    /// Time one query. A `query_repeats` of zero is run once.
    pub fn run(&self, query: &QuerySpec) -> Result<QueryReport> {
        let repeats = self.config.query_repeats.max(1);
        debug!(%query, warmup = self.config.warmup_repeats, repeats, "timing query");

        for _ in 0..self.config.warmup_repeats {
            let hits = self.executor.search_text(query)?;
            black_box(self.executor.resolve_metadata(&hits));
        }

        let start = Instant::now();
        let mut hits = self.executor.search_text(query)?;
        for _ in 1..repeats {
            hits = black_box(self.executor.search_text(query)?);
        }
        let text_total = start.elapsed();

        let start = Instant::now();
        let mut results = self.executor.resolve_metadata(&hits);
        for _ in 1..repeats {
            results = black_box(self.executor.resolve_metadata(&hits));
        }
        let metadata_total = start.elapsed();

        let samples = if self.config.show_matches {
            self.samples(&hits)
        } else {
            Vec::new()
        };

        Ok(QueryReport {
            query: query.clone(),
            repeats,
            text_total,
            metadata_total,
            matches: hits.len(),
            occurrences: hits.occurrences(),
            metadata_hits: results.iter().map(|r| r.metadata.len()).sum(),
            samples,
        })
    }

    fn samples(&self, hits: &TextHits) -> Vec<MatchSample> {
        let index = self.executor.index();
        let mut samples = Vec::with_capacity(hits.occurrences());

        for m in hits.iter() {
            for &position in index.positions(m) {
                samples.push(MatchSample {
                    position,
                    text: index.matched_text(position, m.length),
                    metadata: self
                        .executor
                        .metadata_at(m, position)
                        .iter()
                        .map(|entry| entry.value.to_string())
                        .collect(),
                });
            }
        }

        samples
    }
}
