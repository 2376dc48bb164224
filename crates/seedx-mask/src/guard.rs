//! Race-free "masked at most once per target" tracking.
//!
//! Ground: the same double-checked claim pattern as
//! `seedx_matrix::matrix_pool::MatrixPool`, specialized to a boolean
//! claim instead of a cached value — step 1 requires the
//! check-then-mask sequence to be race-free.

use hashbrown::HashSet;
use parking_lot::RwLock;
use seedx_types::BlockId;

use crate::algo::Masker;

#[derive(Default)]
pub struct MaskGuard {
    masked: RwLock<HashSet<BlockId>>,
}

impl MaskGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to claim masking rights for `block_id`. Returns `true`
    /// exactly once per block id, across any number of racing callers.
    pub fn try_claim(&self, block_id: BlockId) -> bool {
        if self.masked.read().contains(&block_id) {
            return false;
        }
        let mut guard = self.masked.write();
        guard.insert(block_id)
    }

    #[must_use]
    pub fn is_masked(&self, block_id: BlockId) -> bool {
        self.masked.read().contains(&block_id)
    }

    #[must_use]
    pub fn masked_count(&self) -> usize {
        self.masked.read().len()
    }
}

/// Apply lazy masking: mask `seq` with `masker` iff this call wins the
/// race to claim `block_id`. Returns whether masking was performed here.
pub fn apply_lazy_mask(guard: &MaskGuard, masker: &dyn Masker, block_id: BlockId, seq: &mut [u8]) -> bool {
    if guard.try_claim(block_id) {
        masker.mask(seq);
        true
    } else {
        false
    }
}
