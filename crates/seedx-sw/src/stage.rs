//! Ties the banded aligner and within-target culling into the
//! per-target operation the dispatcher invokes once gapped filtering
//! has picked the surviving targets.

use seedx_matrix::{blosum62, ScoringMatrix};
use seedx_types::{CigarOp, Config, Hsp, HspTraits, HspValues, Target, WorkTarget, WorkerStats, MAX_CONTEXTS};

use crate::banded::{band_width_from_traits, banded_sw, banded_sw_frameshift};
use crate::culling::{build_target, cull_hsps_within_target, range_cull_frameshift};

/// Standard BLOSUM62 affine-gap costs (`KarlinAltschul::BLOSUM62_GAP_11_1`
/// is calibrated against these).
const GAP_OPEN: i32 = 11;
const GAP_EXTEND: i32 = 1;

/// Penalty charged for switching reading frame mid-alignment in
/// frameshift mode, expressed in the same units as substitution scores.
const FRAME_SHIFT_PENALTY: i32 = 15;

pub struct AlignEnv<'a> {
    pub query_frames: &'a [&'a [u8]],
    pub scoring: &'a ScoringMatrix,
    pub config: &'a Config,
    pub query_len: i32,
    pub hsp_values: HspValues,
}

fn hsp_to_traits(h: &Hsp) -> HspTraits {
    HspTraits {
        query_begin: h.query_start,
        query_end: h.query_end,
        subject_begin: h.subject_start,
        subject_end: h.subject_end,
        score: h.score,
        frame: h.frame,
    }
}

fn summarize_transcript(transcript: Option<&[CigarOp]>) -> (u32, u32, u32) {
    let Some(ops) = transcript else {
        return (0, 0, 0);
    };
    let mut identities = 0u32;
    let mut mismatches = 0u32;
    let mut gap_openings = 0u32;
    for op in ops {
        match op {
            CigarOp::Match(n) => identities += n,
            CigarOp::Mismatch(n) => mismatches += n,
            CigarOp::Insertion(_) | CigarOp::Deletion(_) => gap_openings += 1,
        }
    }
    (identities, mismatches, gap_openings)
}

/// Run the banded aligner over every chained anchor of `target`, then
/// within-target culling. Returns `None` if nothing survives.
#[must_use]
pub fn align_target(target: &WorkTarget, env: &AlignEnv<'_>, worker_stats: &mut WorkerStats) -> Option<Target> {
    let target_len = target.subject.len() as i32;
    let subject: &[u8] = &target.subject;
    let needs_trace = env
        .hsp_values
        .intersects(HspValues::IDENT | HspValues::MISMATCHES | HspValues::GAPS | HspValues::TRANSCRIPT);
    let keep_transcript = env.hsp_values.contains(HspValues::TRANSCRIPT);

    let adjusted = target.matrix.as_ref().map(|h| h.matrix.clone());
    let score_fn = |a: u8, b: u8| -> i32 {
        if let Some(matrix) = &adjusted {
            let dim = blosum62::ALPHABET.len();
            let ia = blosum62::residue_index(a);
            let ib = blosum62::residue_index(b);
            i32::from(matrix[ia * dim + ib])
        } else {
            env.scoring.score(a, b)
        }
    };

    let mut hsps: Vec<Hsp> = Vec::new();

    for frame in 0..MAX_CONTEXTS {
        let anchors = &target.hsp_traits[frame];
        if anchors.is_empty() {
            continue;
        }
        let query = env.query_frames[frame];
        let band = band_width_from_traits(anchors);

        for anchor in anchors {
            let outcome = if env.config.frame_shift != 0 {
                banded_sw_frameshift(
                    env.query_frames,
                    subject,
                    anchor,
                    band,
                    &score_fn,
                    GAP_OPEN,
                    GAP_EXTEND,
                    FRAME_SHIFT_PENALTY,
                    needs_trace,
                )
            } else {
                banded_sw(query, subject, anchor, band, &score_fn, GAP_OPEN, GAP_EXTEND, needs_trace)
            };

            let Some(outcome) = outcome else { continue };
            if outcome.overflowed {
                worker_stats.dp_overflow_count += 1;
            }

            let evalue = env.scoring.evalue(outcome.score, i64::from(env.query_len), i64::from(target_len));
            let (identities, mismatches, gap_openings) = summarize_transcript(outcome.transcript.as_deref());

            hsps.push(Hsp {
                score: outcome.score,
                evalue,
                frame: frame as seedx_types::Frame,
                query_start: outcome.query_begin,
                query_end: outcome.query_end,
                subject_start: outcome.subject_begin,
                subject_end: outcome.subject_end,
                identities,
                length: (outcome.query_end - outcome.query_begin).max(0) as u32,
                mismatches,
                gap_openings,
                transcript: if keep_transcript { outcome.transcript } else { None },
            });
        }
    }

    cull_hsps_within_target(&mut hsps, env.config, &env.scoring.karlin(), env.query_len, target_len);

    if env.config.frame_shift != 0 && env.config.query_range_culling && hsps.len() > 1 {
        let traits: Vec<HspTraits> = hsps.iter().map(hsp_to_traits).collect();
        let kept = range_cull_frameshift(traits, env.config.inner_culling_overlap);
        hsps.retain(|h| {
            kept.iter()
                .any(|t| t.query_begin == h.query_start && t.query_end == h.query_end && t.score == h.score)
        });
    }

    build_target(target.block_id, hsps)
}
