//! Burrows-Wheeler transform with block-sampled rank.
//!
//! The auxiliary structure behind backward search: the text's alphabet, the
//! less-than counts (`C` table), the BWT itself, and per-block cumulative
//! occurrence counts so that `rank` never scans more than `BLOCK_SIZE`
//! positions.
//!
//! ## Layout
//!
//! Characters are mapped to dense symbols, their rank in the sorted
//! alphabet, so every table is sized by the characters actually present
//! rather than by the code point range.
//!
//! - `counts[s]` - number of text characters strictly less than symbol `s`
//! - `bwt` - the transform as symbols, one byte each while the alphabet
//!   fits in a `u8` (the tail of a rank query is then a `memchr` count),
//!   four bytes each otherwise
//! - `blocks` - one row of `|alphabet|` counters every `BLOCK_SIZE` BWT
//!   positions; row `k` counts occurrences in `bwt[0 .. k * BLOCK_SIZE)`

use super::types::{BLOCK_SIZE, SENTINEL, TextPosition};
use crate::error::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use std::ops::Range;
use tracing::debug;

/// Alphabet, counts, BWT and rank samples for one text
#[derive(Debug, Clone)]
pub struct BwtIndex {
    /// Distinct characters of the text, ascending
    alphabet: Vec<char>,
    /// Character to position in `alphabet`
    symbols: FxHashMap<char, usize>,
    /// Less-than counts indexed by symbol
    counts: Vec<usize>,
    /// `bwt[i]` precedes the suffix at `sa[i]`
    bwt: SymbolString,
    /// Flattened rank rows, `alphabet.len()` counters each
    blocks: Vec<usize>,
}

impl BwtIndex {
    /// Build the index for `text` and its suffix array.
    ///
    /// The text must end with [`SENTINEL`] and the suffix array must be a
    /// permutation of the text positions. Sortedness is not re-checked.
    pub fn new(text: &[char], sa: &[TextPosition]) -> Result<Self> {
        validate(text, sa)?;

        let mut alphabet: Vec<char> = text
            .iter()
            .copied()
            .collect::<FxHashSet<char>>()
            .into_iter()
            .collect();
        alphabet.sort_unstable();

        let symbols: FxHashMap<char, usize> = alphabet
            .iter()
            .enumerate()
            .map(|(symbol, &c)| (c, symbol))
            .collect();

        let counts = lesser_than_counts(text, sa, &alphabet);
        let bwt = burrows_wheeler_transform(text, sa, &symbols, alphabet.len());
        let blocks = sample_ranks(&bwt, alphabet.len());

        debug!(
            text_len = text.len(),
            alphabet_len = alphabet.len(),
            narrow = matches!(bwt, SymbolString::Narrow(_)),
            block_count = bwt.len() / BLOCK_SIZE + 1,
            "bwt index built"
        );

        Ok(Self {
            alphabet,
            symbols,
            counts,
            bwt,
            blocks,
        })
    }

    /// Number of occurrences of `c` in `bwt[0, n)`.
    ///
    /// Characters absent from the text have rank 0 everywhere. `n` may equal
    /// the BWT length, giving the total count of `c`.
    #[inline]
    pub fn rank(&self, c: char, n: usize) -> usize {
        match self.symbol(c) {
            Some(symbol) => self.rank_symbol(symbol, n),
            None => 0,
        }
    }

    /// Number of text characters strictly less than `c`.
    ///
    /// `None` when `c` does not occur in the text, which callers treat as
    /// "no match".
    #[inline]
    pub fn less_than(&self, c: char) -> Option<usize> {
        self.symbol(c).map(|symbol| self.counts[symbol])
    }

    /// One backward-search step: narrow rows `[lo, hi)` to those whose
    /// suffix, prefixed with `c`, still occurs. Returns the new rows, or
    /// `None` if none remain.
    #[inline]
    pub fn extend_left(&self, c: char, lo: usize, hi: usize) -> Option<(usize, usize)> {
        let symbol = self.symbol(c)?;
        let less = self.counts[symbol];
        let new_lo = less + self.rank_symbol(symbol, lo);
        let new_hi = less + self.rank_symbol(symbol, hi);

        (new_lo < new_hi).then_some((new_lo, new_hi))
    }

    /// Distinct characters of the text, ascending (sentinel first)
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Less-than counts, parallel to [`alphabet`](Self::alphabet)
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Character of the transformed text at `row`
    #[inline]
    pub fn bwt_char(&self, row: usize) -> char {
        self.alphabet[self.bwt.get(row)]
    }

    /// The transformed text, decoded back to characters
    pub fn bwt(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.bwt.len()).map(|row| self.bwt_char(row))
    }

    /// Length of the BWT (equals the text length)
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bwt.len() == 0
    }

    /// Number of sampled rank rows
    pub fn block_count(&self) -> usize {
        self.blocks.len() / self.alphabet.len().max(1)
    }

    #[inline]
    fn symbol(&self, c: char) -> Option<usize> {
        self.symbols.get(&c).copied()
    }

    #[inline]
    fn rank_symbol(&self, symbol: usize, n: usize) -> usize {
        debug_assert!(n <= self.bwt.len());

        let block = n / BLOCK_SIZE;
        let sampled = self.blocks[block * self.alphabet.len() + symbol];
        sampled + self.bwt.count(symbol, block * BLOCK_SIZE..n)
    }
}

/// BWT stored as dense symbols, as narrow as the alphabet allows
#[derive(Debug, Clone)]
enum SymbolString {
    /// At most 256 distinct characters
    Narrow(Vec<u8>),
    Wide(Vec<u32>),
}

impl SymbolString {
    fn len(&self) -> usize {
        match self {
            SymbolString::Narrow(s) => s.len(),
            SymbolString::Wide(s) => s.len(),
        }
    }

    #[inline]
    fn get(&self, i: usize) -> usize {
        match self {
            SymbolString::Narrow(s) => usize::from(s[i]),
            SymbolString::Wide(s) => s[i] as usize,
        }
    }

    /// Occurrences of `symbol` within `range`
    #[inline]
    fn count(&self, symbol: usize, range: Range<usize>) -> usize {
        match self {
            // Narrow strings only hold symbols below 256
            SymbolString::Narrow(s) => memchr::memchr_iter(symbol as u8, &s[range]).count(),
            SymbolString::Wide(s) => s[range].iter().filter(|&&x| x as usize == symbol).count(),
        }
    }
}

fn validate(text: &[char], sa: &[TextPosition]) -> Result<()> {
    if text.last() != Some(&SENTINEL) {
        return Err(Error::MissingSentinel);
    }

    if sa.len() != text.len() {
        return Err(Error::SuffixArrayLength {
            expected: text.len(),
            actual: sa.len(),
        });
    }

    let mut seen = vec![false; sa.len()];
    for (position, &entry) in sa.iter().enumerate() {
        match seen.get_mut(entry) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(Error::MalformedSuffixArray { position }),
        }
    }

    Ok(())
}

/// For each alphabet character, the number of suffix-array rows whose
/// first character is less than it. One pass over the suffix array with a
/// cursor that only moves forward.
fn lesser_than_counts(text: &[char], sa: &[TextPosition], alphabet: &[char]) -> Vec<usize> {
    let mut cursor = 0;

    alphabet
        .iter()
        .map(|&c| {
            while cursor < sa.len() && text[sa[cursor]] < c {
                cursor += 1;
            }
            cursor
        })
        .collect()
}

/// The character before each suffix, as symbols. Row 0 of the text wraps
/// to the trailing sentinel.
fn burrows_wheeler_transform(
    text: &[char],
    sa: &[TextPosition],
    symbols: &FxHashMap<char, usize>,
    width: usize,
) -> SymbolString {
    let last = text.len() - 1;
    let preceding = sa
        .iter()
        .map(|&p| symbols[&text[if p == 0 { last } else { p - 1 }]]);

    if width <= usize::from(u8::MAX) + 1 {
        SymbolString::Narrow(preceding.map(|s| s as u8).collect())
    } else {
        SymbolString::Wide(preceding.map(|s| s as u32).collect())
    }
}

/// Single pass over the BWT, snapshotting the running counts at every
/// block boundary. When the BWT length is block aligned the final row sits
/// exactly at the end of the array and receives the totals after the pass.
fn sample_ranks(bwt: &SymbolString, width: usize) -> Vec<usize> {
    let block_count = bwt.len() / BLOCK_SIZE + 1;
    let mut blocks = vec![0; block_count * width];
    let mut running = vec![0; width];

    for i in 0..bwt.len() {
        if i % BLOCK_SIZE == 0 {
            let row = i / BLOCK_SIZE * width;
            blocks[row..row + width].copy_from_slice(&running);
        }
        running[bwt.get(i)] += 1;
    }

    if bwt.len() % BLOCK_SIZE == 0 {
        let row = (block_count - 1) * width;
        blocks[row..row + width].copy_from_slice(&running);
    }

    blocks
}
