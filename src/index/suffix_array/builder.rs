//! Suffix array builder
//!
//! Builds a suffix array over a single text by:
//! 1. Preparing the text (optional case folding, sentinel appended)
//! 2. Sorting all suffix positions, in parallel for large texts
//!
//! Any correct suffix array works with the rest of the crate; this one is
//! O(n log n) comparisons and cache friendly rather than linear time.

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::index::types::{SENTINEL, TextPosition};
use rayon::prelude::*;
use tracing::debug;

/// Builder for constructing a suffix array from decoded content
pub struct SuffixArrayBuilder {
    config: IndexConfig,
}

impl SuffixArrayBuilder {
    /// Create a new suffix array builder with the given configuration
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    /// Create a builder with default configuration
    pub fn with_defaults() -> Self {
        Self::new(IndexConfig::default())
    }

    /// Prepare `content` and sort its suffixes.
    ///
    /// Fails if the content contains a character at or below the sentinel,
    /// since such a character would break the suffix order the index relies
    /// on.
    pub fn build(&self, content: &str) -> Result<BuiltSuffixArray> {
        let text = self.prepare_text(content)?;
        let suffix_array = sort_suffixes(&text, self.config.parallel_sort_threshold);

        debug!(
            text_len = text.len(),
            parallel = text.len() > self.config.parallel_sort_threshold,
            "suffix array built"
        );

        Ok(BuiltSuffixArray { text, suffix_array })
    }

    /// Decode the content into characters (ASCII-lowercased if configured)
    /// and append the sentinel.
    ///
    /// Folding maps one character to one character, so positions in the
    /// prepared text are the content's character offsets.
    pub fn prepare_text(&self, content: &str) -> Result<Vec<char>> {
        let mut text = Vec::with_capacity(content.len() + 1);

        for (position, c) in content.chars().enumerate() {
            if c <= SENTINEL {
                return Err(Error::ReservedCharacter {
                    code: u32::from(c),
                    position,
                });
            }
            text.push(if self.config.case_insensitive {
                c.to_ascii_lowercase()
            } else {
                c
            });
        }
        text.push(SENTINEL);

        Ok(text)
    }
}

/// Result of building a suffix array
pub struct BuiltSuffixArray {
    /// Prepared text, ending with the sentinel
    pub text: Vec<char>,
    /// Sorted suffix array (positions into text)
    pub suffix_array: Vec<TextPosition>,
}

/// Sort every suffix position of `text`.
///
/// 1. Creates array of all suffix positions [0, 1, 2, ..., n-1]
/// 2. Sorts positions by comparing the suffixes they point to, by code point
/// 3. Uses rayon above `parallel_threshold` characters
///
/// The comparison is unbounded: the sentinel is unique and last, so no
/// suffix is a prefix of another and the order is total.
pub fn sort_suffixes(text: &[char], parallel_threshold: usize) -> Vec<TextPosition> {
    let mut sa: Vec<TextPosition> = (0..text.len()).collect();

    if text.len() > parallel_threshold {
        sa.par_sort_unstable_by(|&a, &b| text[a..].cmp(&text[b..]));
    } else {
        sa.sort_unstable_by(|&a, &b| text[a..].cmp(&text[b..]));
    }

    sa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_build_simple() {
        let built = SuffixArrayBuilder::with_defaults().build("banana").unwrap();

        assert_eq!(built.text, chars("banana\u{3}"));
        assert_eq!(built.suffix_array.len(), 7);
    }

    #[test]
    fn test_suffix_array_correctness() {
        let sa = sort_suffixes(&chars("banana\u{3}"), usize::MAX);

        // 6: \x03
        // 5: a\x03
        // 3: ana\x03
        // 1: anana\x03
        // 0: banana\x03
        // 4: na\x03
        // 2: nana\x03
        assert_eq!(sa, vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_parallel_sort_matches_sequential() {
        let text: Vec<char> = "mississippi"
            .chars()
            .cycle()
            .take(5000)
            .chain(std::iter::once(SENTINEL))
            .collect();

        assert_eq!(sort_suffixes(&text, 0), sort_suffixes(&text, usize::MAX));
    }

    #[test]
    fn test_long_repeats_sort_fully() {
        // Suffixes sharing prefixes far longer than any fixed comparison cap
        let mut text = vec!['a'; 3000];
        text.push(SENTINEL);
        let sa = sort_suffixes(&text, usize::MAX);

        // Shorter runs of 'a' sort first
        let expected: Vec<usize> = (0..=3000).rev().collect();
        assert_eq!(sa, expected);
    }

    #[test]
    fn test_case_insensitive() {
        let builder = SuffixArrayBuilder::new(IndexConfig {
            case_insensitive: true,
            ..Default::default()
        });
        let built = builder.build("HELLO Ärger").unwrap();

        // ASCII only, one character in, one character out
        assert_eq!(built.text, chars("hello Ärger\u{3}"));
    }

    #[test]
    fn test_reserved_characters_rejected() {
        let builder = SuffixArrayBuilder::with_defaults();

        assert_eq!(
            builder.build("ab\u{0}cd").err(),
            Some(Error::ReservedCharacter {
                code: 0,
                position: 2
            })
        );
        // Position counts characters, not UTF-8 bytes
        assert_eq!(
            builder.build("né\u{3}").err(),
            Some(Error::ReservedCharacter {
                code: 3,
                position: 2
            })
        );
        // Tabs and newlines sort above the sentinel
        assert!(builder.build("a\tb\nc").is_ok());
    }

    #[test]
    fn test_text_is_indexed_by_character() {
        let built = SuffixArrayBuilder::with_defaults().build("añb").unwrap();

        assert_eq!(built.text, vec!['a', 'ñ', 'b', SENTINEL]);
        // Code point order: sentinel, 'a', 'b', 'ñ'
        assert_eq!(built.suffix_array, vec![3, 0, 2, 1]);
    }

    #[test]
    fn test_empty_content() {
        let built = SuffixArrayBuilder::with_defaults().build("").unwrap();
        assert_eq!(built.text, vec![SENTINEL]);
        assert_eq!(built.suffix_array, vec![0]);
    }
}
