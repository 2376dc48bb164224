//! Scenario fixtures for the six end-to-end walkthroughs and a handful
//! of cross-crate invariants the unit tests inside individual stage
//! crates don't reach: the combination of loader, ranker, extension,
//! filter, aligner, and dispatcher driven through [`seedx_core::run_search`].
//!
//! A crate depending on nearly the whole workspace, holding fixture
//! builders in `src/` and scenario tests in `tests/`, scaled to this
//! pipeline's six documented scenarios rather than a full engine's soak
//! matrix.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seedx_hitbuf::{HitBatch, HitSource};
use seedx_types::SeedHit;

const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// Deterministic pseudo-random protein sequence, seeded so scenario
/// tests are reproducible without depending on wall-clock entropy.
#[must_use]
pub fn synthetic_protein(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| AMINO_ACIDS[rng.gen_range(0..AMINO_ACIDS.len())]).collect()
}

/// A [`HitSource`] that replays a fixed sequence of batches, one per
/// `retrieve()` call, with no background prefetching: enough to drive
/// [`seedx_core::run_search`] deterministically in a test without the
/// timing nondeterminism of [`seedx_hitbuf::PartitionedHitBuffer`]'s
/// background thread.
pub struct FixedHitSource {
    batches: VecDeque<HitBatch>,
}

impl FixedHitSource {
    #[must_use]
    pub fn new(batches: Vec<HitBatch>) -> Self {
        Self {
            batches: batches.into(),
        }
    }

    /// Single batch spanning `[query_begin, query_end)`.
    #[must_use]
    pub fn single(hits: Vec<SeedHit>, query_begin: u32, query_end: u32) -> Self {
        Self::new(vec![HitBatch {
            hits,
            query_begin,
            query_end,
        }])
    }
}

impl HitSource for FixedHitSource {
    fn load(&mut self, _max_bytes: usize) {}

    fn retrieve(&mut self) -> Option<HitBatch> {
        self.batches.pop_front()
    }
}

/// Build one [`SeedHit`] per exact k-mer shared between `query` and
/// `target`, scored by the diagonal's raw BLOSUM62 self-score; the same
/// approach `seedx-cli`'s fixture seeder uses, reused here so scenario
/// tests don't need the indexer either.
#[must_use]
pub fn exact_kmer_seed_hits(query: &[u8], target: &[u8], target_global_offset: u64, seed_len: usize) -> Vec<SeedHit> {
    if seed_len == 0 || query.len() < seed_len || target.len() < seed_len {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for (q_offset, q_window) in query.windows(seed_len).enumerate() {
        for (t_offset, t_window) in target.windows(seed_len).enumerate() {
            if q_window != t_window {
                continue;
            }
            let score: i32 = q_window.iter().map(|&r| seedx_matrix::blosum62::raw_score(r, r)).sum();
            hits.push(SeedHit {
                query_ctx: 0,
                subject_offset: target_global_offset + t_offset as u64,
                seed_query_offset: q_offset as i32,
                score: score.max(0) as u16,
            });
        }
    }
    hits
}
