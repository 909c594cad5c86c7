//! Chunk partitioning for query-size-limited backends.
//!
//! Log Analytics caps how many resource ids can be folded into a single KQL
//! query, and every resource must be queried in the workspace that owns it.
//! [`grouped_chunks`] therefore groups a flat id list by owning workspace and
//! slices each group into bounded chunks that the orchestrator can drive one
//! query at a time.

use itertools::Itertools;

use crate::error::{Error, Result};

/// Default per-query identifier bound.
pub const DEFAULT_CHUNK_SIZE: usize = 8;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// All chunks belonging to one group key (typically a workspace id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkGroup<V> {
    /// The shared group key, rendered as text.
    pub key: String,
    /// Bounded-size chunks in insertion order. Never empty.
    pub chunks: Vec<Vec<V>>,
}

impl<V> ChunkGroup<V> {
    /// Number of chunks in this group.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// The full partitioning result: ordered groups plus the precomputed chunk
/// total used for progress reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedChunkList<V> {
    /// Sum of chunk counts across all groups.
    pub total_chunks: usize,
    /// Groups in ascending key order.
    pub groups: Vec<ChunkGroup<V>>,
}

impl<V> GroupedChunkList<V> {
    /// Total chunk count across all groups.
    pub fn len(&self) -> usize {
        self.total_chunks
    }

    pub fn is_empty(&self) -> bool {
        self.total_chunks == 0
    }
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Group `items` by `group_key_of` and slice each group's `value_of`-mapped
/// values into chunks of at most `chunk_size`.
///
/// Groups are emitted in ascending key order; within a group, chunk order is
/// insertion order and only the last chunk may be shorter than `chunk_size`.
/// Values are not deduplicated. A `chunk_size` of zero is rejected with
/// [`Error::InvalidArgument`].
pub fn grouped_chunks<T, V, K>(
    items: impl IntoIterator<Item = T>,
    value_of: impl Fn(&T) -> V,
    group_key_of: impl Fn(&T) -> K,
    chunk_size: usize,
) -> Result<GroupedChunkList<V>>
where
    K: Ord + std::fmt::Display,
{
    if chunk_size == 0 {
        return Err(Error::InvalidArgument(
            "chunk_size must be at least 1".into(),
        ));
    }

    let mut items: Vec<T> = items.into_iter().collect();
    items.sort_by_key(|item| group_key_of(item));

    let mut groups = Vec::new();
    let mut total_chunks = 0;
    let grouped = items.into_iter().chunk_by(|item| group_key_of(item));
    for (key, members) in &grouped {
        let values = members.map(|item| value_of(&item));
        let chunked = values.chunks(chunk_size);
        let chunks: Vec<Vec<V>> = chunked.into_iter().map(Iterator::collect).collect();
        total_chunks += chunks.len();
        groups.push(ChunkGroup {
            key: key.to_string(),
            chunks,
        });
    }

    Ok(GroupedChunkList {
        total_chunks,
        groups,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
