//! Per-target ungapped extension + chaining orchestration and its query-parallel/serial dispatch.

use std::sync::Arc;

use hashbrown::HashMap;
use seedx_mask::{apply_lazy_mask, MaskGuard, Masker};
use seedx_matrix::{
    make_adjusted_matrix, test_to_apply_readjustment, Composition, CompositionVerdict, MatrixPool, ScoringMatrix,
};
use seedx_types::{AdjustedMatrixHandle, Config, Diagonal, ExtensionMode, Frame, LocalHit, WorkTarget, WorkerStats};

use crate::chaining::greedy_chain;
use crate::xdrop::xdrop_extend;

/// Everything a single target's extension needs that does not vary
/// per-call: query sequences by frame, the scoring matrix, masking
/// machinery, and the shared composition-matrix pool.
pub struct ExtendEnv<'a> {
    pub query_seqs: &'a [&'a [u8]],
    pub query_composition: &'a [Composition],
    pub scoring: &'a ScoringMatrix,
    pub config: &'a Config,
    pub mask_guard: &'a MaskGuard,
    pub masker: &'a (dyn Masker + Sync),
    pub matrix_pool: &'a MatrixPool,
}

/// Run steps 1-5 against one target, mutating its
/// `WorkTarget` in place and folding observability into `worker_stats`.
pub fn extend_target(target: &mut WorkTarget, hits: &[LocalHit], env: &ExtendEnv<'_>, worker_stats: &mut WorkerStats) {
    // Step 1: lazy masking, at most once per target.
    let mut subject = target.subject.to_vec();
    if matches!(env.config.masking, seedx_types::MaskingAlgo::None) {
        // masking disabled entirely; no claim attempted.
    } else if apply_lazy_mask(env.mask_guard, env.masker, target.block_id, &mut subject) {
        worker_stats.masked_lazy += 1;
        target.subject = Arc::from(subject);
    }

    // Step 2: composition-based scoring matrix.
    if env.config.comp_based_stats.uses_avg_matrix_adjust() {
        let target_comp = Composition::of_sequence(&target.subject);
        let background = env.scoring.background_freqs();
        let verdict = env
            .query_composition
            .iter()
            .map(|qc| test_to_apply_readjustment(qc, &target_comp, &background))
            .find(|v| *v == CompositionVerdict::UseAdjustedMatrix);
        if verdict.is_some() {
            let lambda = env.scoring.karlin().lambda;
            let query_comp = &env.query_composition[0];
            let matrix = env.matrix_pool.get_or_build(target.block_id, || {
                make_adjusted_matrix(query_comp, &target_comp, lambda, &background)
            });
            worker_stats.matrix_adjust_count += 1;
            target.matrix = Some(AdjustedMatrixHandle {
                block_id: target.block_id,
                dimension: 24,
                matrix,
            });
        }
    }

    let score_fn = |a: u8, b: u8| env.scoring.score(a, b);

    // Step 3: FULL mode shortcuts straight to the per-frame max score.
    if env.config.resolved_extension_mode() == ExtensionMode::Full {
        for hit in hits {
            let frame = hit.frame as usize;
            target.ungapped_score[frame] = target.ungapped_score[frame].max(hit.score);
        }
        return;
    }

    // Step 4: banded ungapped extension, diagonal coverage pruning.
    let mut sorted = hits.to_vec();
    sorted.sort_by(seedx_types::cmp_frame_diag_subject);

    let mut diag_cover: HashMap<(Frame, Diagonal), i32> = HashMap::new();
    let mut segments_by_frame: Vec<Vec<seedx_types::DiagonalSegment>> =
        (0..seedx_types::MAX_CONTEXTS).map(|_| Vec::new()).collect();

    for hit in &sorted {
        let key = (hit.frame, hit.diag());
        if let Some(&covered_end) = diag_cover.get(&key) {
            if covered_end >= hit.j {
                continue;
            }
        }
        let Some(query) = env.query_seqs.get(hit.frame as usize) else {
            continue;
        };
        if let Some(seg) = xdrop_extend(query, &target.subject, hit, 15, score_fn) {
            if seg.score > 0 {
                let frame = hit.frame as usize;
                target.ungapped_score[frame] = target.ungapped_score[frame].max(seg.score as u16);
                diag_cover.insert(key, seg.subject_end);
                segments_by_frame[frame].push(seg);
            }
        }
    }

    // Step 5: per-frame greedy chaining.
    for (frame, segments) in segments_by_frame.into_iter().enumerate() {
        if segments.is_empty() {
            continue;
        }
        target.diagonal_segments[frame] = segments.clone();
        target.hsp_traits[frame] = greedy_chain(segments, 20, 1);
    }
}

/// Extension outcome for one target, used to decide target-parallel
/// scheduling and to accumulate per-worker statistics without sharing
/// mutable state.
pub struct TargetJob<'a> {
    pub target: &'a mut WorkTarget,
    pub hits: &'a [LocalHit],
}

/// Process every target either serially or via a dynamic work queue
/// across `num_workers` threads.
pub fn extend_targets<'a>(
    mut jobs: Vec<TargetJob<'a>>,
    env: &ExtendEnv<'_>,
    parallel: bool,
    num_workers: usize,
) -> WorkerStats {
    if !parallel || num_workers <= 1 || jobs.len() <= 1 {
        let mut stats = WorkerStats::default();
        for job in &mut jobs {
            extend_target(job.target, job.hits, env, &mut stats);
        }
        return stats;
    }

    // Dynamic work queue: a shared crossbeam-deque injector hands out
    // whole, owned jobs, so a worker never holds a lock while it runs
    // `extend_target` — only the merged-stats mutex is touched, and
    // only once, at end-of-work.
    use crossbeam_deque::{Injector, Steal};
    use parking_lot::Mutex;

    let injector: Injector<TargetJob<'a>> = Injector::new();
    for job in jobs {
        injector.push(job);
    }

    let merged = Mutex::new(WorkerStats::default());

    std::thread::scope(|scope| {
        for _ in 0..num_workers {
            scope.spawn(|| {
                let mut local_stats = WorkerStats::default();
                loop {
                    match injector.steal() {
                        Steal::Success(job) => {
                            extend_target(job.target, job.hits, env, &mut local_stats);
                        }
                        Steal::Empty => break,
                        Steal::Retry => continue,
                    }
                }
                let mut m = merged.lock();
                m.target_hits0 += local_stats.target_hits0;
                m.target_hits1 += local_stats.target_hits1;
                m.target_hits2 += local_stats.target_hits2;
                m.target_hits3 += local_stats.target_hits3;
                m.target_hits4 += local_stats.target_hits4;
                m.target_hits5 += local_stats.target_hits5;
                m.matrix_adjust_count += local_stats.matrix_adjust_count;
                m.matrix_build_discarded += local_stats.matrix_build_discarded;
                m.dp_overflow_count += local_stats.dp_overflow_count;
                m.masked_lazy += local_stats.masked_lazy;
                m.gapped_filter_rejected += local_stats.gapped_filter_rejected;
                m.time_extend_nanos += local_stats.time_extend_nanos;
                m.time_filter_nanos += local_stats.time_filter_nanos;
                m.time_sw_nanos += local_stats.time_sw_nanos;
            });
        }
    });

    merged.into_inner()
}
