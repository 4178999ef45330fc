#![no_main]

use arbitrary::Arbitrary;
use fmx::index::Range;
use fmx::metadata::{IntervalTree, Metadata};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    spans: Vec<(u16, u8)>,
    query: (u16, u8),
}

fuzz_target!(|input: Input| {
    let entries: Vec<Metadata<usize>> = input
        .spans
        .iter()
        .enumerate()
        .filter_map(|(id, &(begin, len))| {
            let begin = usize::from(begin);
            Metadata::new(begin, begin + usize::from(len), id).ok()
        })
        .collect();
    let tree = IntervalTree::new(entries.clone());

    let begin = usize::from(input.query.0);
    let Ok(query) = Range::new(begin, begin + usize::from(input.query.1)) else {
        return;
    };

    let mut found: Vec<usize> = tree.find_overlapping(query).iter().map(|m| m.value).collect();
    found.sort_unstable();
    let expected: Vec<usize> = entries
        .iter()
        .filter(|m| m.range().overlaps(&query))
        .map(|m| m.value)
        .collect();
    assert_eq!(found, expected);
});
