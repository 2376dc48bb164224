//! Per-target-block composition-adjusted matrix pool.
//!
//! Two workers racing to build the same target's adjusted matrix both
//! finish the build, but only one result is kept; the loser's work is
//! discarded, not blocked on — the same double-checked-insert shape as
//! a page cache that lets concurrent misses race to fetch rather than
//! serializing on a single fetch lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::RwLock;
use seedx_types::BlockId;

/// Cache of composition-adjusted 16-bit matrices, keyed by target block id.
pub struct MatrixPool {
    cache: RwLock<HashMap<BlockId, Arc<[i16]>>>,
    built_count: AtomicU64,
    discarded_count: AtomicU64,
}

impl Default for MatrixPool {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixPool {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            built_count: AtomicU64::new(0),
            discarded_count: AtomicU64::new(0),
        }
    }

    /// Return the cached matrix for `block_id`, or build one with
    /// `build` and install it. If another thread installed a matrix for
    /// the same block concurrently, the losing build is discarded and
    /// the winner's matrix is returned — both builds still ran to
    /// completion, this only arbitrates which result survives.
    pub fn get_or_build<F>(&self, block_id: BlockId, build: F) -> Arc<[i16]>
    where
        F: FnOnce() -> Vec<i16>,
    {
        if let Some(existing) = self.cache.read().get(&block_id) {
            return existing.clone();
        }

        let built: Arc<[i16]> = build().into();
        self.built_count.fetch_add(1, Ordering::Relaxed);

        let mut guard = self.cache.write();
        match guard.entry(block_id) {
            Entry::Occupied(entry) => {
                self.discarded_count.fetch_add(1, Ordering::Relaxed);
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                entry.insert(built.clone());
                built
            }
        }
    }

    #[must_use]
    pub fn built_count(&self) -> u64 {
        self.built_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn discarded_count(&self) -> u64 {
        self.discarded_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}
