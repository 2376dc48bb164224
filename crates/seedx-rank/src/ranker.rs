//! Chunk iteration and early-exit decision for the adaptive ranker.

use seedx_matrix::KarlinAltschul;
use seedx_types::{Config, QueryMemory, TargetScore};

/// Sort targets descending by score (ties broken ascending by id);
/// `TargetScore`'s `Ord` is defined so a plain ascending sort already
/// yields this order.
pub fn sort_targets_by_score_desc(targets: &mut [TargetScore]) {
    targets.sort_unstable();
}

/// Splits a score-sorted target slice into `chunk_size`-sized windows.
pub struct ChunkIter<'a> {
    targets: &'a [TargetScore],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkIter<'a> {
    #[must_use]
    pub fn new(targets: &'a [TargetScore], chunk_size: usize) -> Self {
        Self {
            targets,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = &'a [TargetScore];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.targets.len() {
            return None;
        }
        let end = (self.pos + self.chunk_size).min(self.targets.len());
        let chunk = &self.targets[self.pos..end];
        self.pos = end;
        Some(chunk)
    }
}

/// Outcome of running extension, filtering, and alignment over one
/// chunk, reported back to the ranker so it can decide whether to
/// continue.
#[derive(Debug, Clone, Copy)]
pub struct ChunkResult {
    pub new_hits_added: bool,
    pub min_score_in_chunk: u16,
}

/// Tracks the running "tail score" across chunks and decides when to
/// stop expanding.
pub struct EarlyExit {
    tail_score: u16,
}

impl EarlyExit {
    #[must_use]
    pub fn new(initial_tail_score: u16) -> Self {
        Self {
            tail_score: initial_tail_score,
        }
    }

    /// Returns `true` when ranking should stop without processing a
    /// further chunk.
    pub fn observe_chunk(
        &mut self,
        next_chunk_top_score: Option<u16>,
        outcome: ChunkResult,
        config: &Config,
        karlin: &KarlinAltschul,
    ) -> bool {
        if outcome.new_hits_added {
            self.tail_score = outcome.min_score_in_chunk;
            return false;
        }
        let Some(next_top) = next_chunk_top_score else {
            return true;
        };
        let ratio = f64::from(next_top) / f64::from(self.tail_score.max(1));
        let ratio_stop = ratio <= config.ranking_score_drop_factor;
        let bitscore_stop = karlin.bitscore(i32::from(next_top)) < config.ranking_cutoff_bitscore;
        ratio_stop || bitscore_stop
    }
}

/// Wraps [`QueryMemory::should_short_circuit`] behind the
/// `config.query_memory` feature gate.
#[must_use]
pub fn should_short_circuit_query(
    memory: &QueryMemory,
    next_chunk_len: usize,
    next_chunk_top_score: u16,
    config: &Config,
) -> bool {
    config.query_memory && memory.should_short_circuit(next_chunk_len as u32, next_chunk_top_score)
}
