//! Property-Based Tests for Chunk Pagination and Chunk Sessions
//!
//! Properties under test:
//! - Chunk arithmetic: clipped length, `has_more`, and `total` laws
//! - Session partition laws: ceil(n/k) chunks, lengths summing to n,
//!   final cumulative offset equal to n
//! - Snapshot isolation: an in-flight session never observes mutations

use doccache::{DocumentCache, Identified, ListQuery, ObjectId, ObjectIdNormalizer};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct TestDoc {
    id: ObjectId,
    rank: u32,
}

impl Identified for TestDoc {
    fn object_id(&self) -> ObjectId {
        self.id
    }
}

fn doc(rank: u32) -> TestDoc {
    // spread the rank across the id bytes so ids stay distinct
    let mut bytes = [0u8; 12];
    bytes[8..12].copy_from_slice(&rank.to_be_bytes());
    TestDoc {
        id: ObjectId::from_bytes(bytes),
        rank,
    }
}

fn filled_cache(n: u32) -> DocumentCache<TestDoc, ObjectIdNormalizer> {
    let mut cache = DocumentCache::new("TestDoc", ObjectIdNormalizer::new()).expect("valid name");
    cache.import((0..n).map(doc)).expect("import");
    cache
}

fn by_rank() -> ListQuery<'static, TestDoc> {
    ListQuery::<TestDoc>::new().sort_by(|a, b| a.rank.cmp(&b.rank))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: for a view of length n, page size k and index i,
    /// the chunk holds min(k, max(0, n - k*i)) records, `has_more` is
    /// k*(i+1) < n, and `total` is n.
    #[test]
    fn prop_chunk_arithmetic(n in 0u32..60, k in 1usize..8, i in 0usize..12) {
        let cache = filled_cache(n);
        let n = n as usize;
        let chunk = cache.get_chunk(k, i, by_rank()).expect("valid size");

        let expected_len = k.min(n.saturating_sub(k * i));
        prop_assert_eq!(chunk.records.len(), expected_len);
        prop_assert_eq!(chunk.has_more, k * (i + 1) < n);
        prop_assert_eq!(chunk.total, n);
        prop_assert_eq!(chunk.size, k);
        prop_assert_eq!(chunk.index, i);
    }

    /// Property: consecutive pages of a sorted view concatenate back to
    /// the whole view, in order and without overlap.
    #[test]
    fn prop_pages_tile_the_view(n in 0u32..60, k in 1usize..8) {
        let cache = filled_cache(n);
        let mut collected = Vec::new();
        let mut index = 0;
        loop {
            let chunk = cache.get_chunk(k, index, by_rank()).expect("valid size");
            collected.extend(chunk.records.iter().map(|d| d.rank));
            if !chunk.has_more {
                break;
            }
            index += 1;
        }
        let expected: Vec<u32> = (0..n).collect();
        prop_assert_eq!(collected, expected);
    }

    /// Property: a session over n records with chunk size k yields
    /// ceil(n/k) chunks whose lengths sum to n, each reporting total n,
    /// with the final chunk's cumulative offset equal to n.
    #[test]
    fn prop_session_partition_laws(n in 0u32..60, k in 1usize..8) {
        let cache = filled_cache(n);
        let n = n as usize;
        let session = cache.chunk_session(k, by_rank()).expect("valid size");

        prop_assert_eq!(session.len(), n.div_ceil(k));
        prop_assert_eq!(session.iter().map(|c| c.records.len()).sum::<usize>(), n);
        prop_assert!(session.iter().all(|c| c.total == n));
        if let Some(last) = session.iter().last() {
            prop_assert_eq!(last.current, n);
        }
        // cumulative offsets advance by the chunk length
        let mut covered = 0;
        for chunk in &session {
            covered += chunk.records.len();
            prop_assert_eq!(chunk.current, covered);
        }
    }

    /// Property: mutating the cache after creating a session does not
    /// change the session's chunks.
    #[test]
    fn prop_session_snapshot_isolation(n in 1u32..40, k in 1usize..8) {
        let mut cache = filled_cache(n);
        let n = n as usize;
        let session = cache.chunk_session(k, by_rank()).expect("valid size");

        cache.clear();
        cache.put(doc(9999)).expect("put");

        prop_assert_eq!(session.iter().map(|c| c.records.len()).sum::<usize>(), n);
        let ranks: Vec<u32> = session
            .iter()
            .flat_map(|c| c.records.iter().map(|d| d.rank))
            .collect();
        let expected: Vec<u32> = (0..n as u32).collect();
        prop_assert_eq!(ranks, expected);
    }
}
