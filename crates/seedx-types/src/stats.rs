//! Process-wide pipeline statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters shared across workers. Each worker accumulates into a
/// private [`WorkerStats`] and merges it into this struct once, at
/// worker exit, rather than contending on every increment.
#[derive(Debug, Default)]
pub struct Statistics {
    pub target_hits0: AtomicU64,
    pub target_hits1: AtomicU64,
    pub target_hits2: AtomicU64,
    pub target_hits3: AtomicU64,
    pub target_hits4: AtomicU64,
    pub target_hits5: AtomicU64,
    pub matrix_adjust_count: AtomicU64,
    pub matrix_build_discarded: AtomicU64,
    pub dp_overflow_count: AtomicU64,
    pub masked_lazy: AtomicU64,
    pub gapped_filter_rejected: AtomicU64,
    pub time_extend_nanos: AtomicU64,
    pub time_filter_nanos: AtomicU64,
    pub time_sw_nanos: AtomicU64,
}

impl Statistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&self, worker: &WorkerStats) {
        self.target_hits0.fetch_add(worker.target_hits0, Ordering::Relaxed);
        self.target_hits1.fetch_add(worker.target_hits1, Ordering::Relaxed);
        self.target_hits2.fetch_add(worker.target_hits2, Ordering::Relaxed);
        self.target_hits3.fetch_add(worker.target_hits3, Ordering::Relaxed);
        self.target_hits4.fetch_add(worker.target_hits4, Ordering::Relaxed);
        self.target_hits5.fetch_add(worker.target_hits5, Ordering::Relaxed);
        self.matrix_adjust_count
            .fetch_add(worker.matrix_adjust_count, Ordering::Relaxed);
        self.matrix_build_discarded
            .fetch_add(worker.matrix_build_discarded, Ordering::Relaxed);
        self.dp_overflow_count.fetch_add(worker.dp_overflow_count, Ordering::Relaxed);
        self.masked_lazy.fetch_add(worker.masked_lazy, Ordering::Relaxed);
        self.gapped_filter_rejected
            .fetch_add(worker.gapped_filter_rejected, Ordering::Relaxed);
        self.time_extend_nanos
            .fetch_add(worker.time_extend_nanos, Ordering::Relaxed);
        self.time_filter_nanos
            .fetch_add(worker.time_filter_nanos, Ordering::Relaxed);
        self.time_sw_nanos.fetch_add(worker.time_sw_nanos, Ordering::Relaxed);
    }

    #[must_use]
    pub fn dp_overflow_count(&self) -> u64 {
        self.dp_overflow_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn matrix_adjust_count(&self) -> u64 {
        self.matrix_adjust_count.load(Ordering::Relaxed)
    }
}

/// Per-worker accumulator, merged into [`Statistics`] once at worker
/// exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerStats {
    pub target_hits0: u64,
    pub target_hits1: u64,
    pub target_hits2: u64,
    pub target_hits3: u64,
    pub target_hits4: u64,
    pub target_hits5: u64,
    pub matrix_adjust_count: u64,
    pub matrix_build_discarded: u64,
    pub dp_overflow_count: u64,
    pub masked_lazy: u64,
    pub gapped_filter_rejected: u64,
    pub time_extend_nanos: u64,
    pub time_filter_nanos: u64,
    pub time_sw_nanos: u64,
}
