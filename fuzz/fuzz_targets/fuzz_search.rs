#![no_main]

use arbitrary::Arbitrary;
use fmx::config::IndexConfig;
use fmx::index::{SENTINEL, TextIndex};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    content: String,
    pattern: String,
    budget: u8,
}

fuzz_target!(|input: Input| {
    // Content with reserved characters is rejected, not indexed
    let Ok(index) = TextIndex::build(&input.content, &IndexConfig::default()) else {
        return;
    };

    // A sentinel inside the pattern wraps around in backward search
    if !input.pattern.contains(SENTINEL) {
        let binary = index.binary_search(&input.pattern);
        let backwards = index.backwards_search(&input.pattern);
        assert_eq!(binary, backwards);
    }

    // Keep the search tree small
    if input.pattern.chars().count() <= 8 {
        let budget = usize::from(input.budget % 2);
        for m in index.inexact_binary_search(budget, &input.pattern) {
            assert!(m.edits() <= budget);
        }
        for m in index.inexact_backwards_search(budget, &input.pattern) {
            assert!(m.edits() <= budget);
        }
    }
});
