//! Property tests for the chunk partitioner.
//!
//! Invariants: nothing dropped or duplicated, every chunk respects the size
//! bound (only a group's last chunk may be short), and the precomputed total
//! always matches the sum over groups.

use std::collections::HashMap;

use proptest::prelude::*;

use logfan::grouped_chunks;

fn multiset(values: impl IntoIterator<Item = u32>) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

proptest! {
    /// The union of all chunk contents equals the input multiset.
    #[test]
    fn partition_covers_the_input(
        items in prop::collection::vec((0u8..6, 0u32..1000), 0..200),
        chunk_size in 1usize..12,
    ) {
        let chunked = grouped_chunks(items.clone(), |t| t.1, |t| t.0, chunk_size).unwrap();

        let flattened = chunked
            .groups
            .iter()
            .flat_map(|g| g.chunks.iter().flatten().copied());
        prop_assert_eq!(
            multiset(flattened),
            multiset(items.iter().map(|t| t.1))
        );
    }

    /// Every chunk fits the bound; only the last chunk per group is short.
    #[test]
    fn chunks_respect_the_size_bound(
        items in prop::collection::vec((0u8..6, 0u32..1000), 0..200),
        chunk_size in 1usize..12,
    ) {
        let chunked = grouped_chunks(items, |t| t.1, |t| t.0, chunk_size).unwrap();

        for group in &chunked.groups {
            prop_assert!(!group.is_empty());
            for (index, chunk) in group.chunks.iter().enumerate() {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.len() <= chunk_size);
                if index + 1 < group.chunks.len() {
                    prop_assert_eq!(chunk.len(), chunk_size);
                }
            }
        }
    }

    /// The precomputed total equals the sum of chunk counts across groups.
    #[test]
    fn total_matches_the_sum_over_groups(
        items in prop::collection::vec((0u8..6, 0u32..1000), 0..200),
        chunk_size in 1usize..12,
    ) {
        let chunked = grouped_chunks(items, |t| t.1, |t| t.0, chunk_size).unwrap();
        let summed: usize = chunked.groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(chunked.total_chunks, summed);
        prop_assert_eq!(chunked.len(), summed);
    }

    /// Group keys come out in ascending order, with no repeats.
    #[test]
    fn groups_are_key_ordered_and_distinct(
        items in prop::collection::vec((0u8..6, 0u32..1000), 0..200),
    ) {
        let chunked = grouped_chunks(items, |t| t.1, |t| t.0, 8).unwrap();
        let keys: Vec<&str> = chunked.groups.iter().map(|g| g.key.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(keys, sorted);
    }
}
