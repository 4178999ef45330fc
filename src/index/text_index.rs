//! Owned text, suffix array and BWT index with the searches as methods.
//!
//! The text is indexed by character: every position, length and metadata
//! offset counts Unicode scalar values, not UTF-8 bytes.

use super::bwt::BwtIndex;
use super::suffix_array::{BuiltSuffixArray, SuffixArrayBuilder};
use super::types::{BLOCK_SIZE, InexactMatch, Match, SENTINEL, TextPosition};
use crate::config::IndexConfig;
use crate::error::Result;
use crate::search;

/// A fully built, read-only index over one text
///
/// Safe to query from many threads at once: nothing is mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct TextIndex {
    /// Text ending with the sentinel
    text: Vec<char>,
    suffix_array: Vec<TextPosition>,
    bwt: BwtIndex,
    /// Whether the text was lowercased (patterns are folded to match)
    case_insensitive: bool,
}

impl TextIndex {
    /// Index content: prepare the text, sort suffixes, build the BWT.
    pub fn build(content: &str, config: &IndexConfig) -> Result<Self> {
        let builder = SuffixArrayBuilder::new(config.clone());
        let built = builder.build(content)?;
        Self::from_built(built, config.case_insensitive)
    }

    /// Finish an index from a built suffix array. `case_insensitive` must
    /// match the config the text was prepared with.
    pub fn from_built(built: BuiltSuffixArray, case_insensitive: bool) -> Result<Self> {
        let bwt = BwtIndex::new(&built.text, &built.suffix_array)?;

        Ok(Self {
            text: built.text,
            suffix_array: built.suffix_array,
            bwt,
            case_insensitive,
        })
    }

    /// Index a text that already ends with the sentinel, using a suffix
    /// array from elsewhere.
    pub fn from_parts(text: Vec<char>, suffix_array: Vec<TextPosition>) -> Result<Self> {
        let bwt = BwtIndex::new(&text, &suffix_array)?;

        Ok(Self {
            text,
            suffix_array,
            bwt,
            case_insensitive: false,
        })
    }

    pub fn binary_search(&self, pattern: &str) -> Option<Match> {
        let pattern = self.normalize(pattern);
        search::binary_search(&self.text, &self.suffix_array, &pattern)
    }

    pub fn backwards_search(&self, pattern: &str) -> Option<Match> {
        let pattern = self.normalize(pattern);
        search::backwards_search(&self.bwt, &pattern)
    }

    pub fn inexact_binary_search(&self, budget: usize, pattern: &str) -> Vec<InexactMatch> {
        let pattern = self.normalize(pattern);
        search::inexact_binary_search(
            &self.text,
            &self.suffix_array,
            &self.bwt,
            budget,
            &pattern,
        )
    }

    pub fn inexact_backwards_search(&self, budget: usize, pattern: &str) -> Vec<InexactMatch> {
        let pattern = self.normalize(pattern);
        search::inexact_backwards_search(&self.bwt, budget, &pattern)
    }

    /// Text positions of every occurrence in `m`, in suffix order
    pub fn positions(&self, m: &Match) -> &[TextPosition] {
        &self.suffix_array[m.begin..m.end]
    }

    /// The `length` characters at `position`, cut short at the sentinel
    pub fn matched_text(&self, position: TextPosition, length: usize) -> String {
        let content_len = self.content_len();
        let start = position.min(content_len);
        let end = position.saturating_add(length).min(content_len);
        self.text[start..end].iter().collect()
    }

    /// Text including the trailing sentinel
    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// Text without the trailing sentinel
    pub fn content(&self) -> &[char] {
        &self.text[..self.content_len()]
    }

    pub fn suffix_array(&self) -> &[TextPosition] {
        &self.suffix_array
    }

    pub fn bwt(&self) -> &BwtIndex {
        &self.bwt
    }

    /// Get statistics about this index
    pub fn stats(&self) -> TextIndexStats {
        TextIndexStats {
            text_len: self.text.len(),
            alphabet_len: self.bwt.alphabet().len(),
            block_count: self.bwt.block_count(),
            block_size: BLOCK_SIZE,
            case_insensitive: self.case_insensitive,
        }
    }

    fn content_len(&self) -> usize {
        self.text.len() - usize::from(self.text.last() == Some(&SENTINEL))
    }

    /// Decode a pattern, folded the same way as the text
    fn normalize(&self, pattern: &str) -> Vec<char> {
        if self.case_insensitive {
            pattern.chars().map(|c| c.to_ascii_lowercase()).collect()
        } else {
            pattern.chars().collect()
        }
    }
}

/// Statistics about a text index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextIndexStats {
    /// Text length in characters, including the sentinel
    pub text_len: usize,
    /// Distinct characters, sentinel included
    pub alphabet_len: usize,
    /// Sampled rank rows
    pub block_count: usize,
    pub block_size: usize,
    /// Whether text and patterns are ASCII-lowercased
    pub case_insensitive: bool,
}
