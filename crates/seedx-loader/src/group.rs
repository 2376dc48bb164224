//! Hit loading and target grouping.

use seedx_types::{BlockId, LocalHit, SeedHit, TargetScore};

use crate::prefix::{use_binary_search, SweepCursor, TargetLengths};

/// Output of [`load_hits`]: three parallel arrays plus flat `LocalHit`
/// storage sliced per target via `target_ranges`.
#[derive(Debug, Clone, Default)]
pub struct LoadedHits {
    pub target_block_ids: Vec<BlockId>,
    pub local_hits: Vec<LocalHit>,
    /// `(start, end)` into `local_hits` for each entry of `target_block_ids`.
    pub target_ranges: Vec<(u32, u32)>,
    pub target_scores: Vec<TargetScore>,
}

impl LoadedHits {
    #[must_use]
    pub fn hits_for(&self, target_index: usize) -> &[LocalHit] {
        let (start, end) = self.target_ranges[target_index];
        &self.local_hits[start as usize..end as usize]
    }

    #[must_use]
    pub fn num_targets(&self) -> usize {
        self.target_block_ids.len()
    }
}

/// Sort `hits` by subject offset, translate each to target-local
/// coordinates, and group into per-target arrays. Ties in subject
/// offset may break in any order.
#[must_use]
pub fn load_hits(mut hits: Vec<SeedHit>, lengths: &TargetLengths, contexts: u32) -> LoadedHits {
    hits.sort_unstable_by_key(|h| h.subject_offset);

    let use_binary = use_binary_search(lengths.total_subjects(), hits.len());
    let mut sweep = SweepCursor::new();

    let mut out = LoadedHits::default();
    let mut current_block: Option<BlockId> = None;
    let mut current_start = 0u32;
    let mut current_max_score = 0u16;

    let mut finalize = |out: &mut LoadedHits, block: BlockId, start: u32, max_score: u16| {
        let target_index = out.target_block_ids.len() as u32;
        out.target_block_ids.push(block);
        out.target_ranges.push((start, out.local_hits.len() as u32));
        out.target_scores.push(TargetScore {
            target: target_index,
            score: max_score,
        });
    };

    for hit in &hits {
        let (block_id, in_target_offset) = if use_binary {
            lengths.locate_binary_search(hit.subject_offset)
        } else {
            sweep.locate(lengths, hit.subject_offset)
        };

        if current_block != Some(block_id) {
            if let Some(prev_block) = current_block {
                finalize(&mut out, prev_block, current_start, current_max_score);
            }
            current_block = Some(block_id);
            current_start = out.local_hits.len() as u32;
            current_max_score = 0;
        }

        let local = LocalHit {
            i: hit.seed_query_offset,
            j: in_target_offset as i32,
            score: hit.score,
            frame: hit.frame(contexts),
        };
        current_max_score = current_max_score.max(local.score);
        out.local_hits.push(local);
    }
    if let Some(prev_block) = current_block {
        finalize(&mut out, prev_block, current_start, current_max_score);
    }

    out
}
