//! Cheap gapped filter: eliminates targets whose
//! gapped-alignment potential is unlikely to meet the e-value
//! threshold, before the expensive banded Smith-Waterman pass.

use seedx_matrix::ScoringMatrix;
use seedx_types::{BlockId, Config, WorkTarget};

/// Two-stage e-value thresholds: `gapped_filter_evalue1` for the
/// looser first round, `gapped_filter_evalue` for the final one.
#[derive(Debug, Clone, Copy)]
pub enum FilterRound {
    First,
    Final,
}

impl FilterRound {
    #[must_use]
    pub fn threshold(self, config: &Config) -> f64 {
        match self {
            Self::First => config.gapped_filter_evalue1,
            Self::Final => config.gapped_filter_evalue,
        }
    }
}

/// Whether the gapped filter should run at all for this query.
#[must_use]
pub fn gapped_filter_enabled(config: &Config, query_len: i64, translated: bool) -> bool {
    config.gapped_filter_enabled() && (!translated || query_len >= 85)
}

/// Cheap diagonal-scan estimate of a target's gapped-alignment
/// potential: the best chained ungapped score across frames, already
/// computed by the extension stage's greedy chaining.
#[must_use]
pub fn estimate_gapped_potential(target: &WorkTarget) -> i32 {
    target
        .hsp_traits
        .iter()
        .flat_map(|frame_hsps| frame_hsps.iter())
        .map(|h| h.score)
        .max()
        .unwrap_or(0)
}

/// Whether `target` survives the filter at `evalue_threshold`.
/// Monotone in the threshold: raising the threshold only admits more
/// targets, never removes one that previously passed.
#[must_use]
pub fn passes_gapped_filter(
    target: &WorkTarget,
    query_len: i64,
    scoring: &ScoringMatrix,
    evalue_threshold: f64,
) -> bool {
    let score = estimate_gapped_potential(target);
    if score <= 0 {
        return false;
    }
    let target_len = target.subject.len() as i64;
    let evalue = scoring.evalue(score, query_len, target_len);
    evalue <= evalue_threshold
}

/// Drop targets (and their parallel `target_block_ids` entries) that
/// fail the filter, preserving the relative order of survivors.
pub fn filter_targets(
    target_block_ids: &mut Vec<BlockId>,
    work_targets: &mut Vec<WorkTarget>,
    query_len: i64,
    scoring: &ScoringMatrix,
    evalue_threshold: f64,
) {
    debug_assert_eq!(target_block_ids.len(), work_targets.len());
    let keep: Vec<bool> = work_targets
        .iter()
        .map(|t| passes_gapped_filter(t, query_len, scoring, evalue_threshold))
        .collect();
    let mut i = 0;
    target_block_ids.retain(|_| {
        let k = keep[i];
        i += 1;
        k
    });
    let mut j = 0;
    work_targets.retain(|_| {
        let k = keep[j];
        j += 1;
        k
    });
}
