//! Shared query-range cursor: claims one query's
//! contiguous hit range at a time and decides whether that query
//! should run in target-parallel mode.

use std::sync::Arc;

use parking_lot::Mutex;
use seedx_types::{Config, QueryId, SeedHit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimedRange {
    pub query_id: QueryId,
    pub start: usize,
    pub end: usize,
    /// Switch stage 4.4/4.6 into their parallel mode for this query
    /// alone.
    pub target_parallel: bool,
}

impl ClaimedRange {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

pub struct AlignFetcher {
    hits: Arc<[SeedHit]>,
    contexts: u32,
    cursor: Mutex<usize>,
    query_parallel_limit: u64,
    frame_shift_disabled: bool,
    allows_target_parallel_with_frameshift: bool,
}

impl AlignFetcher {
    #[must_use]
    pub fn new(hits: Arc<[SeedHit]>, contexts: u32, config: &Config) -> Self {
        Self {
            hits,
            contexts,
            cursor: Mutex::new(0),
            query_parallel_limit: config.query_parallel_limit,
            frame_shift_disabled: config.frame_shift == 0,
            allows_target_parallel_with_frameshift: config.toppercent < 100.0 && config.query_range_culling,
        }
    }

    /// Atomically claim the next query's hit range, or `None` once the
    /// partition is exhausted.
    pub fn next(&self) -> Option<ClaimedRange> {
        let mut cursor = self.cursor.lock();
        let start = *cursor;
        if start >= self.hits.len() {
            return None;
        }
        let query_id = self.hits[start].query_index(self.contexts);
        let mut end = start;
        while end < self.hits.len() && self.hits[end].query_index(self.contexts) == query_id {
            end += 1;
        }
        *cursor = end;

        let len = (end - start) as u64;
        let target_parallel = len > self.query_parallel_limit
            && (self.frame_shift_disabled || self.allows_target_parallel_with_frameshift);

        Some(ClaimedRange {
            query_id,
            start,
            end,
            target_parallel,
        })
    }

    #[must_use]
    pub fn hits(&self) -> &[SeedHit] {
        &self.hits
    }
}
