//! Fixed-size pagination and one-shot chunk iteration.
//!
//! Both forms work on a materialized `list` snapshot and never observe
//! later store mutations. The paginator recomputes its snapshot per call;
//! the session partitions one snapshot eagerly at construction and hands
//! out independent cursors over the shared, immutable chunk set.

use std::sync::Arc;

/// One page of a paginated view, plus pagination metadata.
#[derive(Debug, Clone)]
pub struct Chunk<D> {
    /// The page's documents, clipped to the available length.
    pub records: Vec<Arc<D>>,
    /// Length of the whole filtered/sorted view.
    pub total: usize,
    /// Requested page size.
    pub size: usize,
    /// Requested page index.
    pub index: usize,
    /// Whether pages exist past this one.
    pub has_more: bool,
}

/// One chunk of a [`ChunkSession`].
#[derive(Debug, Clone)]
pub struct SessionChunk<D> {
    /// The chunk's documents; only the final chunk may be short.
    pub records: Vec<Arc<D>>,
    /// Length of the whole input snapshot.
    pub total: usize,
    /// One-based offset of this chunk's last document in the snapshot,
    /// i.e. how many documents have been covered once this chunk is
    /// consumed.
    pub current: usize,
}

/// Slice one page out of an already filtered/sorted view.
///
/// Callers validate `size > 0` before reaching this point.
pub(crate) fn paginate<D>(data: Vec<Arc<D>>, size: usize, index: usize) -> Chunk<D> {
    let total = data.len();
    let start = size.saturating_mul(index);
    let end = start.saturating_add(size);
    let records = if start < total {
        data[start..end.min(total)].to_vec()
    } else {
        Vec::new()
    };
    Chunk {
        records,
        total,
        size,
        index,
        has_more: end < total,
    }
}

/// An eagerly partitioned snapshot, iterable in fixed-size chunks.
///
/// The chunk set is computed once at construction; mutating the cache
/// afterwards never changes an in-flight session. Each [`iter`] call
/// produces an independent forward-only cursor over the shared chunks.
///
/// [`iter`]: ChunkSession::iter
#[derive(Debug, Clone)]
pub struct ChunkSession<D> {
    chunks: Vec<SessionChunk<D>>,
}

impl<D> ChunkSession<D> {
    /// Partition `data` into consecutive chunks of at most `size`
    /// documents. Callers validate `size > 0`.
    pub(crate) fn new(data: Vec<Arc<D>>, size: usize) -> Self {
        let total = data.len();
        let chunks = data
            .chunks(size)
            .enumerate()
            .map(|(index, slice)| SessionChunk {
                records: slice.to_vec(),
                total,
                current: index * size + slice.len(),
            })
            .collect();
        Self { chunks }
    }

    /// Number of chunks in this session.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the session holds no chunks (empty snapshot).
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// A fresh cursor starting from the first chunk.
    pub fn iter(&self) -> ChunkIter<'_, D> {
        ChunkIter {
            inner: self.chunks.iter(),
        }
    }
}

impl<'a, D> IntoIterator for &'a ChunkSession<D> {
    type Item = &'a SessionChunk<D>;
    type IntoIter = ChunkIter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward-only, non-restartable cursor over a session's chunks.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a, D> {
    inner: std::slice::Iter<'a, SessionChunk<D>>,
}

impl<'a, D> Iterator for ChunkIter<'a, D> {
    type Item = &'a SessionChunk<D>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, D> ExactSizeIterator for ChunkIter<'a, D> {}

// =============================================================================
// TESTS
// =============================================================================
