//! The seed-hit buffer and its query-range partitioner:
//! `HitSource` is the trait the rest of the pipeline consumes;
//! `PartitionedHitBuffer` is the in-memory stand-in for the on-disk
//! buffer (file I/O is left to the caller) that overlaps batch N+1's
//! "load" with batch N's processing using a bounded
//! single-producer/single-consumer channel.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use seedx_types::{QueryId, SeedHit};

#[derive(Debug, Clone)]
pub struct HitBatch {
    pub hits: Vec<SeedHit>,
    pub query_begin: QueryId,
    pub query_end: QueryId,
}

/// Asynchronous batch source: `load` kicks off prefetching, `retrieve`
/// blocks for the result. Successive `retrieve` calls return disjoint,
/// strictly increasing query ranges.
pub trait HitSource: Send {
    fn load(&mut self, max_bytes: usize);
    fn retrieve(&mut self) -> Option<HitBatch>;
}

/// Split `hits[start..]` into one batch respecting `max_bytes`, never
/// splitting a query's hits across two batches.
#[must_use]
pub fn next_batch(hits: &[SeedHit], start: usize, max_bytes: usize, contexts: u32) -> Option<HitBatch> {
    if start >= hits.len() {
        return None;
    }
    let hit_size = std::mem::size_of::<SeedHit>();
    let query_begin = hits[start].query_index(contexts);
    let mut last_query = query_begin;
    let mut bytes = 0usize;
    let mut end = start;
    while end < hits.len() {
        let q = hits[end].query_index(contexts);
        if bytes >= max_bytes && q != last_query {
            break;
        }
        bytes += hit_size;
        last_query = q;
        end += 1;
    }
    Some(HitBatch {
        hits: hits[start..end].to_vec(),
        query_begin,
        query_end: last_query + 1,
    })
}

/// In-memory hit buffer, sorted ascending by query index, with a
/// one-batch-ahead background prefetcher.
pub struct PartitionedHitBuffer {
    hits: Arc<[SeedHit]>,
    contexts: u32,
    cursor: usize,
    prefetch: Option<Receiver<Option<HitBatch>>>,
    prefetch_handle: Option<JoinHandle<()>>,
}

impl PartitionedHitBuffer {
    #[must_use]
    pub fn new(hits: Vec<SeedHit>, contexts: u32) -> Self {
        Self {
            hits: Arc::from(hits),
            contexts,
            cursor: 0,
            prefetch: None,
            prefetch_handle: None,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.hits.len()
    }
}

impl HitSource for PartitionedHitBuffer {
    fn load(&mut self, max_bytes: usize) {
        if self.prefetch.is_some() {
            return;
        }
        let hits = self.hits.clone();
        let contexts = self.contexts;
        let cursor = self.cursor;
        let (tx, rx) = crossbeam_channel::bounded(1);
        let handle = std::thread::spawn(move || {
            let batch = next_batch(&hits, cursor, max_bytes, contexts);
            let _ = tx.send(batch);
        });
        self.prefetch = Some(rx);
        self.prefetch_handle = Some(handle);
    }

    fn retrieve(&mut self) -> Option<HitBatch> {
        let rx = self.prefetch.take()?;
        let batch = rx.recv().ok().flatten();
        if let Some(handle) = self.prefetch_handle.take() {
            let _ = handle.join();
        }
        if let Some(ref b) = batch {
            self.cursor += b.hits.len();
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(query_ctx: u32, subject_offset: u64) -> SeedHit {
        SeedHit {
            query_ctx,
            subject_offset,
            seed_query_offset: 0,
            score: 10,
        }
    }

    #[test]
    fn batches_cover_disjoint_increasing_query_ranges() {
        let hits = vec![hit(0, 0), hit(0, 1), hit(6, 2), hit(6, 3), hit(12, 4)];
        let mut buf = PartitionedHitBuffer::new(hits, 6);
        buf.load(1);
        let first = buf.retrieve().unwrap();
        assert_eq!((first.query_begin, first.query_end), (0, 1));
        buf.load(1);
        let second = buf.retrieve().unwrap();
        assert_eq!((second.query_begin, second.query_end), (1, 2));
        buf.load(1);
        let third = buf.retrieve().unwrap();
        assert_eq!((third.query_begin, third.query_end), (2, 3));
        buf.load(1024);
        assert!(buf.retrieve().is_none());
    }

    #[test]
    fn never_splits_a_single_querys_hits() {
        let hits = vec![hit(0, 0), hit(0, 1), hit(0, 2)];
        let mut buf = PartitionedHitBuffer::new(hits, 6);
        buf.load(1);
        let batch = buf.retrieve().unwrap();
        assert_eq!(batch.hits.len(), 3);
        assert!(buf.is_exhausted());
    }

    #[test]
    fn large_budget_returns_everything_in_one_batch() {
        let hits = vec![hit(0, 0), hit(1, 1), hit(2, 2)];
        let mut buf = PartitionedHitBuffer::new(hits, 6);
        buf.load(1 << 20);
        let batch = buf.retrieve().unwrap();
        assert_eq!(batch.hits.len(), 3);
        assert_eq!(batch.query_end, 3);
    }
}
