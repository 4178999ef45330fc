//! Centered interval tree over metadata ranges.
//!
//! Each node picks a center point and keeps every range containing it,
//! twice: ascending by begin and descending by end. Ranges entirely left
//! of the center go to the left subtree, ranges entirely right of it to the
//! right subtree. A point query walks one root-to-leaf path and, at each
//! node, reads a prefix of one of the two sorted lists.
//!
//! Alongside the tree sits a flat, sorted list of range endpoints (begin
//! and `end - 1`, both inclusive). A range query binary searches it for
//! every entry with an endpoint inside the query, then adds a point query
//! at the query's begin for entries that span the whole query.
//!
//! Nodes live in an arena and refer to children and entries by index, so
//! de-duplication is by entry identity, never by value.

use super::types::{Endpoint, Metadata};
use crate::index::types::{Range, TextPosition};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use tracing::debug;

/// Index of a node in the arena
type NodeId = usize;

/// Index of an entry in the tree's entry list
type EntryId = usize;

#[derive(Debug, Clone)]
struct Node {
    center: TextPosition,
    left: Option<NodeId>,
    right: Option<NodeId>,
    /// Entries containing `center`, ascending by begin
    by_begin: Vec<EntryId>,
    /// The same entries, descending by end
    by_end: Vec<EntryId>,
}

/// Static interval tree answering point-containment and range-overlap
/// queries over a fixed set of metadata entries.
#[derive(Debug, Clone)]
pub struct IntervalTree<T> {
    entries: Vec<Metadata<T>>,
    nodes: Vec<Node>,
    root: Option<NodeId>,
    /// Two per entry, ascending by point
    endpoints: Vec<Endpoint>,
}

impl<T> IntervalTree<T> {
    /// Build the tree. An empty entry list yields a tree with no nodes.
    pub fn new(entries: Vec<Metadata<T>>) -> Self {
        let mut nodes = Vec::new();
        let ids: Vec<EntryId> = (0..entries.len()).collect();
        let root = build_node(&entries, ids, &mut nodes);
        let endpoints = build_endpoints(&entries);

        debug!(
            entries = entries.len(),
            nodes = nodes.len(),
            endpoints = endpoints.len(),
            "interval tree built"
        );

        Self {
            entries,
            nodes,
            root,
            endpoints,
        }
    }

    /// Entries containing `point`.
    pub fn find_point(&self, point: TextPosition) -> Vec<&Metadata<T>> {
        let mut ids = Vec::new();
        self.collect_point(point, &mut ids);
        ids.into_iter().map(|id| &self.entries[id]).collect()
    }

    /// Entries overlapping `range`, each reported once.
    pub fn find_overlapping(&self, range: Range) -> Vec<&Metadata<T>> {
        let mut seen = FxHashSet::default();
        let mut ids = Vec::new();

        // Entries with an endpoint inside the range
        let first = self
            .endpoints
            .partition_point(|endpoint| endpoint.point < range.begin());
        for endpoint in &self.endpoints[first..] {
            if endpoint.point >= range.end() {
                break;
            }
            if seen.insert(endpoint.entry) {
                ids.push(endpoint.entry);
            }
        }

        // Entries spanning the whole range contain its first point
        let mut spanning = Vec::new();
        self.collect_point(range.begin(), &mut spanning);
        for id in spanning {
            if seen.insert(id) {
                ids.push(id);
            }
        }

        ids.into_iter().map(|id| &self.entries[id]).collect()
    }

    /// All entries, in construction order
    pub fn entries(&self) -> &[Metadata<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tree nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, in nodes
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[Node], id: Option<NodeId>) -> usize {
            match id {
                None => 0,
                Some(id) => {
                    let node = &nodes[id];
                    1 + depth_of(nodes, node.left).max(depth_of(nodes, node.right))
                }
            }
        }
        depth_of(&self.nodes, self.root)
    }

    fn collect_point(&self, point: TextPosition, out: &mut Vec<EntryId>) {
        let mut cursor = self.root;

        while let Some(id) = cursor {
            let node = &self.nodes[id];

            match point.cmp(&node.center) {
                // Every entry here contains the center; no child can
                Ordering::Equal => {
                    out.extend_from_slice(&node.by_begin);
                    break;
                }
                Ordering::Less => {
                    out.extend(
                        node.by_begin
                            .iter()
                            .take_while(|&&e| self.entries[e].begin() <= point),
                    );
                    cursor = node.left;
                }
                Ordering::Greater => {
                    out.extend(
                        node.by_end
                            .iter()
                            .take_while(|&&e| self.entries[e].end() > point),
                    );
                    cursor = node.right;
                }
            }
        }
    }
}

/// Recursively split `ids` around a center and append the node to the
/// arena after its children. Depth is bounded by the bit width of the
/// coordinates since each level halves the covered span.
fn build_node<T>(
    entries: &[Metadata<T>],
    ids: Vec<EntryId>,
    nodes: &mut Vec<Node>,
) -> Option<NodeId> {
    let min_begin = ids.iter().map(|&e| entries[e].begin()).min()?;
    let max_end = ids.iter().map(|&e| entries[e].end()).max()?;
    let center = min_begin + (max_end - min_begin) / 2;

    let mut to_left = Vec::new();
    let mut to_right = Vec::new();
    let mut overlap = Vec::new();

    for id in ids {
        let entry = &entries[id];
        if entry.begin() > center {
            to_right.push(id);
        } else if entry.end() <= center {
            // End is exclusive, so an entry ending at the center misses it
            to_left.push(id);
        } else {
            overlap.push(id);
        }
    }

    let left = build_node(entries, to_left, nodes);
    let right = build_node(entries, to_right, nodes);

    let mut by_begin = overlap.clone();
    by_begin.sort_by_key(|&e| entries[e].begin());
    let mut by_end = overlap;
    by_end.sort_by_key(|&e| std::cmp::Reverse(entries[e].end()));

    nodes.push(Node {
        center,
        left,
        right,
        by_begin,
        by_end,
    });
    Some(nodes.len() - 1)
}

fn build_endpoints<T>(entries: &[Metadata<T>]) -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = entries
        .iter()
        .enumerate()
        .flat_map(|(entry, meta)| {
            [
                Endpoint {
                    point: meta.begin(),
                    entry,
                },
                Endpoint {
                    point: meta.end() - 1,
                    entry,
                },
            ]
        })
        .collect();

    endpoints.sort_by_key(|endpoint| endpoint.point);
    endpoints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(ranges: impl IntoIterator<Item = (usize, usize)>) -> IntervalTree<usize> {
        let entries = ranges
            .into_iter()
            .enumerate()
            .map(|(i, (begin, end))| Metadata::new(begin, end, i).unwrap())
            .collect();
        IntervalTree::new(entries)
    }

    fn range(begin: usize, end: usize) -> Range {
        Range::new(begin, end).unwrap()
    }

    /// 10 disjoint unit ranges [2i, 2i+1)
    fn simple1() -> IntervalTree<usize> {
        tree_of((0..10).map(|i| (i * 2, i * 2 + 1)))
    }

    /// 10 disjoint ranges of length 2, [3i, 3i+2)
    fn simple2() -> IntervalTree<usize> {
        tree_of((0..10).map(|i| (i * 3, i * 3 + 2)))
    }

    /// 10 ranges, each overlapping its neighbours, [2i, 2i+3)
    fn overlap() -> IntervalTree<usize> {
        tree_of((0..10).map(|i| (i * 2, i * 2 + 3)))
    }

    /// 10 ranges all starting at 0, [0, i+1)
    fn bottom_heavy() -> IntervalTree<usize> {
        tree_of((0..10).map(|i| (0, i + 1)))
    }

    #[test]
    fn test_construction() {
        let empty: IntervalTree<()> = IntervalTree::new(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.node_count(), 0);
        assert!(empty.find_point(0).is_empty());
        assert!(empty.find_overlapping(range(0, 10)).is_empty());

        let single = tree_of([(0, 1)]);
        assert_eq!(single.node_count(), 1);
        assert_eq!(single.find_point(0).len(), 1);
    }

    #[test]
    fn test_node_invariants() {
        for tree in [simple1(), simple2(), overlap(), bottom_heavy()] {
            for node in &tree.nodes {
                for &e in &node.by_begin {
                    assert!(tree.entries[e].range().contains(node.center));
                }
                assert!(node.by_begin.windows(2).all(|w| {
                    tree.entries[w[0]].begin() <= tree.entries[w[1]].begin()
                }));
                assert!(node.by_end.windows(2).all(|w| {
                    tree.entries[w[0]].end() >= tree.entries[w[1]].end()
                }));
                assert_eq!(node.by_begin.len(), node.by_end.len());
            }

            let stored: usize = tree.nodes.iter().map(|n| n.by_begin.len()).sum();
            assert_eq!(stored, tree.len());
            assert_eq!(tree.endpoints.len(), 2 * tree.len());
        }
    }

    #[test]
    fn test_find_point() {
        // Outside every range
        assert!(simple1().find_point(100).is_empty());
        // Inside one
        assert_eq!(simple1().find_point(0).len(), 1);
        // Inside many
        assert_eq!(bottom_heavy().find_point(0).len(), 10);
    }

    #[test]
    fn test_find_overlapping() {
        assert!(simple1().find_overlapping(range(20, 21)).is_empty());
        assert_eq!(simple1().find_overlapping(range(0, 1)).len(), 1);
        assert_eq!(bottom_heavy().find_overlapping(range(0, 1)).len(), 10);
    }

    #[test]
    fn test_simple1() {
        let tree = simple1();

        assert!(tree.find_overlapping(range(20, usize::MAX)).is_empty());

        for i in 0..20 {
            let found = tree.find_point(i);
            if i % 2 == 0 {
                assert_eq!(found.len(), 1, "{i} should have one element");
                assert_eq!(found[0].value, i / 2);
            } else {
                assert!(found.is_empty(), "{i} should be empty");
            }
        }

        assert_eq!(tree.find_overlapping(range(0, 20)).len(), 10);
    }

    #[test]
    fn test_simple2() {
        let tree = simple2();

        assert!(tree.find_overlapping(range(30, usize::MAX)).is_empty());

        for i in 0..30 {
            let found = tree.find_point(i);
            if i % 3 == 2 {
                assert!(found.is_empty(), "{i} should be empty");
            } else {
                assert_eq!(found.len(), 1, "{i} should have one element");
                assert_eq!(found[0].value, i / 3);
            }
        }

        assert_eq!(tree.find_overlapping(range(0, 30)).len(), 10);
    }

    #[test]
    fn test_overlap() {
        let tree = overlap();

        assert!(tree.find_overlapping(range(21, usize::MAX)).is_empty());

        for i in 0..21 {
            let found = tree.find_point(i);
            let expected = match i {
                0 | 20 => 1,
                _ if i % 2 == 0 => 2,
                _ => 1,
            };
            assert_eq!(found.len(), expected, "point {i}");
        }
    }

    #[test]
    fn test_bottom_heavy() {
        let tree = bottom_heavy();

        assert!(tree.find_overlapping(range(10, usize::MAX)).is_empty());

        for i in 0..10 {
            assert_eq!(tree.find_point(i).len(), 10 - i);
            assert_eq!(tree.find_overlapping(range(0, i + 1)).len(), 10);
            assert_eq!(tree.find_overlapping(range(i, usize::MAX)).len(), 10 - i);
        }
    }

    #[test]
    fn test_spanning_entry_found_without_endpoints_inside() {
        let tree = tree_of([(0, 100), (40, 41)]);

        let found: Vec<usize> = tree
            .find_overlapping(range(10, 20))
            .iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn test_equal_values_stay_distinct() {
        let entries = vec![
            Metadata::new(0, 5, "same").unwrap(),
            Metadata::new(0, 5, "same").unwrap(),
        ];
        let tree = IntervalTree::new(entries);

        assert_eq!(tree.find_overlapping(range(1, 3)).len(), 2);
        assert_eq!(tree.find_point(4).len(), 2);
    }

    #[test]
    fn test_depth_is_logarithmic_in_span() {
        let tree = tree_of((0..1000).map(|i| (i, i + 1)));
        assert!(tree.depth() <= 12, "depth {}", tree.depth());
    }
}
