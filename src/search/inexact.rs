//! Approximate substring search within an edit budget.
//!
//! Both exact searches generalize to a branch-and-bound walk over edit
//! operations. From every partial match the walk tries, for each character
//! of the alphabet that extends the current suffix-array range:
//!
//! - consuming the next pattern character (`Match` if equal, else `Replace`)
//! - not consuming it (`Insert`, a text character with no pattern
//!   counterpart)
//!
//! and, once per state, `Delete` (a pattern character with no text
//! counterpart, range unchanged). A branch is cut as soon as its edit count
//! exceeds the budget; a match is reported when the whole pattern has been
//! consumed.
//!
//! The whole alphabet is tried at every level because replacements and
//! insertions lead into disjoint sub-ranges. That makes the branching factor
//! about `|alphabet| * 2 + 1`, exponential in the budget, so budgets must
//! stay small.
//!
//! The walk uses an explicit stack. Children are pushed in reverse so they
//! pop in alphabet order with `Delete` last; depth never exceeds
//! `pattern.len() + budget` because every step consumes a pattern character
//! or spends an edit.

use super::extend_right;
use crate::index::BwtIndex;
use crate::index::types::{EditOp, InexactMatch, Match, SENTINEL, TextPosition};

/// Every match of `pattern` within `budget` edits, found by FM-index
/// backward search (pattern processed right to left).
///
/// Ranges are never extended with the sentinel: in the FM-index that step
/// wraps around the end of the text.
pub fn inexact_backwards_search(
    index: &BwtIndex,
    budget: usize,
    pattern: &[char],
) -> Vec<InexactMatch> {
    let backward = Backward { index };
    explore(&backward, index.len(), budget, pattern)
}

/// Every match of `pattern` within `budget` edits, found by binary search
/// over the suffix array (pattern processed left to right).
///
/// Positions past the end of the text read as the sentinel.
pub fn inexact_binary_search(
    text: &[char],
    sa: &[TextPosition],
    index: &BwtIndex,
    budget: usize,
    pattern: &[char],
) -> Vec<InexactMatch> {
    let forward = Forward {
        text,
        sa,
        alphabet: index.alphabet(),
    };
    explore(&forward, sa.len(), budget, pattern)
}

/// How a search direction grows a partial match by one text character
trait Direction {
    /// Characters to try at every step
    fn alphabet(&self) -> &[char];

    /// Pattern character consumed after `consumed` characters
    fn pattern_char(&self, pattern: &[char], consumed: usize) -> char;

    /// Rows of `[lo, hi)` that remain after adding `c` to a partial match of
    /// `length` text characters
    fn extend(&self, c: char, lo: usize, hi: usize, length: usize) -> Option<(usize, usize)>;
}

struct Backward<'a> {
    index: &'a BwtIndex,
}

impl Direction for Backward<'_> {
    fn alphabet(&self) -> &[char] {
        self.index.alphabet()
    }

    #[inline]
    fn pattern_char(&self, pattern: &[char], consumed: usize) -> char {
        pattern[pattern.len() - 1 - consumed]
    }

    #[inline]
    fn extend(&self, c: char, lo: usize, hi: usize, _length: usize) -> Option<(usize, usize)> {
        if c == SENTINEL {
            return None;
        }
        self.index.extend_left(c, lo, hi)
    }
}

struct Forward<'a> {
    text: &'a [char],
    sa: &'a [TextPosition],
    alphabet: &'a [char],
}

impl Direction for Forward<'_> {
    fn alphabet(&self) -> &[char] {
        self.alphabet
    }

    #[inline]
    fn pattern_char(&self, pattern: &[char], consumed: usize) -> char {
        pattern[consumed]
    }

    #[inline]
    fn extend(&self, c: char, lo: usize, hi: usize, length: usize) -> Option<(usize, usize)> {
        extend_right(self.text, self.sa, lo, hi, length, c)
    }
}

/// A partial match on the work list
#[derive(Debug, Clone)]
struct Frontier {
    /// Pattern characters consumed so far
    consumed: usize,
    /// Edits spent so far
    diff: usize,
    /// Text characters matched so far
    length: usize,
    lo: usize,
    hi: usize,
    spec: Vec<EditOp>,
}

impl Frontier {
    fn root(rows: usize) -> Self {
        Self {
            consumed: 0,
            diff: 0,
            length: 0,
            lo: 0,
            hi: rows,
            spec: Vec::new(),
        }
    }

    fn step(&self, op: EditOp, lo: usize, hi: usize) -> Self {
        let mut spec = Vec::with_capacity(self.spec.len() + 1);
        spec.extend_from_slice(&self.spec);
        spec.push(op);

        Self {
            consumed: self.consumed + usize::from(op.consumes_pattern()),
            diff: self.diff + op.cost(),
            length: self.length + usize::from(op.consumes_text()),
            lo,
            hi,
            spec,
        }
    }

    fn into_match(self) -> InexactMatch {
        InexactMatch {
            matched: Match {
                begin: self.lo,
                end: self.hi,
                length: self.length,
            },
            spec: self.spec,
        }
    }
}

fn explore<D: Direction>(
    direction: &D,
    rows: usize,
    budget: usize,
    pattern: &[char],
) -> Vec<InexactMatch> {
    let mut results = Vec::new();
    if rows == 0 {
        return results;
    }

    let mut stack = vec![Frontier::root(rows)];
    let mut children = Vec::new();

    while let Some(state) = stack.pop() {
        if state.consumed == pattern.len() {
            results.push(state.into_match());
            continue;
        }

        let wanted = direction.pattern_char(pattern, state.consumed);

        for &c in direction.alphabet() {
            let Some((lo, hi)) = direction.extend(c, state.lo, state.hi, state.length) else {
                continue;
            };
            let op = if c == wanted {
                EditOp::Match
            } else {
                EditOp::Replace
            };
            children.push(state.step(op, lo, hi));
            children.push(state.step(EditOp::Insert, lo, hi));
        }
        children.push(state.step(EditOp::Delete, state.lo, state.hi));

        stack.extend(children.drain(..).rev().filter(|child| child.diff <= budget));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::exact::{backwards_search, binary_search};
    use crate::search::fixtures::fixture;
    use std::collections::HashSet;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    /// Matched strings, read from the first occurrence of each match
    fn matched_strings(text: &[char], sa: &[usize], matches: &[InexactMatch]) -> HashSet<String> {
        matches
            .iter()
            .map(|m| {
                let start = sa[m.matched.begin];
                text[start..start + m.matched.length].iter().collect()
            })
            .collect()
    }

    #[test]
    fn test_inexact_backwards_zero_budget_is_exact() {
        let f = fixture("banana");
        let banana = chars("banana");

        let found = inexact_backwards_search(&f.index, 0, &banana);
        assert_eq!(found.len(), 1);
        assert_eq!(Some(found[0].matched), backwards_search(&f.index, &banana));
        assert_eq!(found[0].spec, vec![EditOp::Match; 6]);

        for pattern in ["bn", "foo", "frobnozzle", "bananana"] {
            assert!(inexact_backwards_search(&f.index, 0, &chars(pattern)).is_empty());
        }
    }

    #[test]
    fn test_inexact_binary_zero_budget_is_exact() {
        let f = fixture("banana");
        let banana = chars("banana");

        let found = inexact_binary_search(&f.text, &f.sa, &f.index, 0, &banana);
        assert_eq!(found.len(), 1);
        assert_eq!(
            Some(found[0].matched),
            binary_search(&f.text, &f.sa, &banana)
        );

        for pattern in ["bn", "foo", "frobnozzle", "bananana"] {
            let pattern = chars(pattern);
            assert!(inexact_binary_search(&f.text, &f.sa, &f.index, 0, &pattern).is_empty());
        }
    }

    #[test]
    fn test_inexact_backwards_one_edit() {
        let f = fixture("banana");

        // 'bn' with one edit: "ban", "an", "ba", "b", "n"
        let found = inexact_backwards_search(&f.index, 1, &chars("bn"));
        assert_eq!(found.len(), 5);

        let expected: HashSet<String> = ["ban", "an", "ba", "b", "n"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(matched_strings(&f.text, &f.sa, &found), expected);
        assert!(found.iter().all(|m| m.edits() == 1));
    }

    #[test]
    fn test_inexact_binary_one_edit() {
        let f = fixture("banana");

        let found = inexact_binary_search(&f.text, &f.sa, &f.index, 1, &chars("bn"));
        assert_eq!(found.len(), 5);

        let expected: HashSet<String> = ["ban", "an", "ba", "b", "n"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(matched_strings(&f.text, &f.sa, &found), expected);
    }

    #[test]
    fn test_edit_scripts() {
        let f = fixture("banana");
        let found = inexact_backwards_search(&f.index, 1, &chars("bn"));

        let scripts: HashSet<String> = found.iter().map(|m| m.spec_string()).collect();
        // Backward scripts read from the last pattern character
        for script in ["MIM", "MR", "RM", "MD", "DM"] {
            assert!(scripts.contains(script), "missing {script} in {scripts:?}");
        }

        let ban = found.iter().find(|m| m.matched.length == 3).unwrap();
        assert_eq!(ban.spec_string(), "MIM");
        assert_eq!(ban.matched.begin, 4);
        assert_eq!(ban.matched.end, 5);
    }

    #[test]
    fn test_replace_covers_whole_multibyte_character() {
        let f = fixture("café");
        let pattern = chars("cafe");

        for (found, script) in [
            (inexact_binary_search(&f.text, &f.sa, &f.index, 1, &pattern), "MMMR"),
            (inexact_backwards_search(&f.index, 1, &pattern), "RMMM"),
        ] {
            let word = found.iter().find(|m| m.spec_string() == script).unwrap();
            assert_eq!(word.matched.length, 4);
            assert_eq!(word.matched.occurrences(), 1);
            assert_eq!(f.sa[word.matched.begin], 0);
            let text: String = f.text[..word.matched.length].iter().collect();
            assert_eq!(text, "café");
            assert!(found.iter().all(|m| m.matched.length <= 4));
        }
    }

    #[test]
    fn test_only_forward_search_replaces_with_the_sentinel() {
        let f = fixture("banana");
        let pattern = chars("bananas");

        let forward = inexact_binary_search(&f.text, &f.sa, &f.index, 1, &pattern);
        let backward = inexact_backwards_search(&f.index, 1, &pattern);

        // Forward reads past the end as the sentinel and may replace 's' with it
        let padded = forward.iter().find(|m| m.spec_string() == "MMMMMMR").unwrap();
        assert_eq!(
            padded.matched,
            Match {
                begin: 4,
                end: 5,
                length: 7
            }
        );
        assert_eq!(f.text[f.sa[padded.matched.begin] + 6], SENTINEL);

        // Both directions find "banana" with the 's' deleted
        assert!(forward.iter().any(|m| m.spec_string() == "MMMMMMD"));
        assert!(backward.iter().any(|m| m.spec_string() == "DMMMMMM"));

        // Backward search never steps onto the sentinel, so the sets differ
        assert!(backward.iter().all(|m| m.matched.length <= 6));
        let forward: HashSet<Match> = forward.iter().map(|m| m.matched).collect();
        let backward: HashSet<Match> = backward.iter().map(|m| m.matched).collect();
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_longer_pattern_needs_more_edits() {
        let f = fixture("banana");
        let pattern = chars("bananana");

        assert!(inexact_backwards_search(&f.index, 1, &pattern).is_empty());
        assert!(!inexact_backwards_search(&f.index, 2, &pattern).is_empty());

        assert!(inexact_binary_search(&f.text, &f.sa, &f.index, 1, &pattern).is_empty());
        assert!(!inexact_binary_search(&f.text, &f.sa, &f.index, 2, &pattern).is_empty());
    }

    #[test]
    fn test_budget_monotonicity() {
        let f = fixture("mississippi river banks");

        for pattern in ["sip", "river", "bank"] {
            let pattern = chars(pattern);
            let mut previous: HashSet<InexactMatch> = HashSet::new();
            for budget in 0..=2 {
                let current: HashSet<InexactMatch> =
                    inexact_backwards_search(&f.index, budget, &pattern)
                        .into_iter()
                        .collect();
                assert!(previous.is_subset(&current), "budget {budget}");
                previous = current;
            }
        }
    }

    #[test]
    fn test_every_reported_edit_fits_budget() {
        let f = fixture("abracadabra");
        let pattern = chars("cadbra");

        for budget in 0..=2 {
            for m in inexact_binary_search(&f.text, &f.sa, &f.index, budget, &pattern) {
                assert!(m.edits() <= budget);
                let consumed = m.spec.iter().filter(|op| op.consumes_pattern()).count();
                let grown = m.spec.iter().filter(|op| op.consumes_text()).count();
                assert_eq!(consumed, 6);
                assert_eq!(grown, m.matched.length);
            }
        }
    }

    #[test]
    fn test_backwards_never_matches_sentinel() {
        let f = fixture("banana");

        for m in inexact_backwards_search(&f.index, 2, &chars("ban")) {
            for &position in &f.sa[m.matched.begin..m.matched.end] {
                assert!(position + m.matched.length < f.text.len());
            }
        }
    }
}
