//! Banded Smith-Waterman / Gotoh affine-gap local alignment. The "band" is the anchor's bounding rectangle widened by
//! `band`, not a true parallelogram — a deliberate simplification
//! recorded in DESIGN.md. 8-bit DP overflow is simulated by capping
//! intermediate scores and re-running unconstrained on overflow,
//! standing in for the real 8-bit-cell-to-16-bit-cell retry; no SIMD
//! lanes are used (`unsafe_code` is forbidden workspace-wide).

use seedx_types::{CigarOp, HspTraits};

#[derive(Debug, Clone)]
pub struct SwOutcome {
    pub score: i32,
    pub query_begin: i32,
    pub query_end: i32,
    pub subject_begin: i32,
    pub subject_end: i32,
    pub transcript: Option<Vec<CigarOp>>,
    pub overflowed: bool,
}

const NEG_INF: i32 = i32::MIN / 4;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Dir {
    Stop,
    Diag,
    Up,
    Left,
}

struct DpResult {
    score: i32,
    start_i: usize,
    start_j: usize,
    end_i: usize,
    end_j: usize,
    transcript: Option<Vec<CigarOp>>,
}

fn push_op(ops: &mut Vec<CigarOp>, op: CigarOp) {
    if let Some(last) = ops.last_mut() {
        match (last, op) {
            (CigarOp::Match(n), CigarOp::Match(_)) => {
                *n += 1;
                return;
            }
            (CigarOp::Mismatch(n), CigarOp::Mismatch(_)) => {
                *n += 1;
                return;
            }
            (CigarOp::Insertion(n), CigarOp::Insertion(_)) => {
                *n += 1;
                return;
            }
            (CigarOp::Deletion(n), CigarOp::Deletion(_)) => {
                *n += 1;
                return;
            }
            _ => {}
        }
    }
    ops.push(op);
}

/// Gotoh affine-gap local alignment over the full `query` x `subject`
/// window passed in. `cell_max` bounds the magnitude of any stored `H`
/// score; exceeding it is treated as the 8-bit DP's overflow signal.
fn run_gotoh(
    query: &[u8],
    subject: &[u8],
    score_fn: &impl Fn(u8, u8) -> i32,
    gap_open: i32,
    gap_extend: i32,
    compute_transcript: bool,
    cell_max: i32,
) -> Result<DpResult, ()> {
    let m = query.len();
    let n = subject.len();
    let mut h = vec![vec![0i32; n + 1]; m + 1];
    let mut e = vec![vec![NEG_INF; n + 1]; m + 1];
    let mut f = vec![vec![NEG_INF; n + 1]; m + 1];
    let mut trace = vec![vec![Dir::Stop; n + 1]; m + 1];

    let mut best_score = 0i32;
    let mut best_i = 0usize;
    let mut best_j = 0usize;

    for i in 1..=m {
        for j in 1..=n {
            let e_ij = (h[i][j - 1] - gap_open).max(e[i][j - 1] - gap_extend);
            let f_ij = (h[i - 1][j] - gap_open).max(f[i - 1][j] - gap_extend);
            let diag_score = h[i - 1][j - 1] + score_fn(query[i - 1], subject[j - 1]);
            let cell = 0i32.max(diag_score).max(e_ij).max(f_ij);

            if cell.abs() > cell_max {
                return Err(());
            }

            e[i][j] = e_ij;
            f[i][j] = f_ij;
            h[i][j] = cell;
            trace[i][j] = if cell == 0 {
                Dir::Stop
            } else if cell == diag_score {
                Dir::Diag
            } else if cell == f_ij {
                Dir::Up
            } else {
                Dir::Left
            };

            if cell > best_score {
                best_score = cell;
                best_i = i;
                best_j = j;
            }
        }
    }

    if best_score <= 0 {
        return Ok(DpResult {
            score: 0,
            start_i: 0,
            start_j: 0,
            end_i: 0,
            end_j: 0,
            transcript: compute_transcript.then(Vec::new),
        });
    }

    let (mut i, mut j) = (best_i, best_j);
    let mut ops = Vec::new();
    while i > 0 && j > 0 && trace[i][j] != Dir::Stop {
        match trace[i][j] {
            Dir::Diag => {
                if compute_transcript {
                    let op = if query[i - 1] == subject[j - 1] {
                        CigarOp::Match(1)
                    } else {
                        CigarOp::Mismatch(1)
                    };
                    push_op(&mut ops, op);
                }
                i -= 1;
                j -= 1;
            }
            Dir::Up => {
                if compute_transcript {
                    push_op(&mut ops, CigarOp::Deletion(1));
                }
                i -= 1;
            }
            Dir::Left => {
                if compute_transcript {
                    push_op(&mut ops, CigarOp::Insertion(1));
                }
                j -= 1;
            }
            Dir::Stop => unreachable!(),
        }
    }
    ops.reverse();

    Ok(DpResult {
        score: best_score,
        start_i: i,
        start_j: j,
        end_i: best_i,
        end_j: best_j,
        transcript: compute_transcript.then_some(ops),
    })
}

/// Derive a band width from the spread of diagonal indices across a
/// target's chained anchors.
#[must_use]
pub fn band_width_from_traits(traits: &[HspTraits]) -> i32 {
    if traits.is_empty() {
        return 32;
    }
    let (mut lo, mut hi) = (i32::MAX, i32::MIN);
    for t in traits {
        let d = t.diag();
        lo = lo.min(d);
        hi = hi.max(d);
    }
    (hi - lo).max(1) + 32
}

/// Run banded Smith-Waterman anchored on `anchor`, trying the 8-bit
/// cell budget first and retrying unconstrained on overflow.
#[must_use]
pub fn banded_sw(
    query: &[u8],
    subject: &[u8],
    anchor: &HspTraits,
    band: i32,
    score_fn: impl Fn(u8, u8) -> i32,
    gap_open: i32,
    gap_extend: i32,
    compute_transcript: bool,
) -> Option<SwOutcome> {
    let q_lo = (anchor.query_begin - band).max(0);
    let q_hi = (anchor.query_end + band).min(query.len() as i32);
    let s_lo = (anchor.subject_begin - band).max(0);
    let s_hi = (anchor.subject_end + band).min(subject.len() as i32);
    if q_hi <= q_lo || s_hi <= s_lo {
        return None;
    }

    let window_query = &query[q_lo as usize..q_hi as usize];
    let window_subject = &subject[s_lo as usize..s_hi as usize];

    let (result, overflowed) = match run_gotoh(
        window_query,
        window_subject,
        &score_fn,
        gap_open,
        gap_extend,
        compute_transcript,
        i32::from(i8::MAX),
    ) {
        Ok(r) => (r, false),
        Err(()) => {
            let wide = run_gotoh(
                window_query,
                window_subject,
                &score_fn,
                gap_open,
                gap_extend,
                compute_transcript,
                i32::MAX,
            )
            .ok()?;
            (wide, true)
        }
    };

    if result.score <= 0 {
        return None;
    }

    Some(SwOutcome {
        score: result.score,
        query_begin: q_lo + result.start_i as i32,
        query_end: q_lo + result.end_i as i32,
        subject_begin: s_lo + result.start_j as i32,
        subject_end: s_lo + result.end_j as i32,
        transcript: result.transcript,
        overflowed,
    })
}

/// Frameshift mode: try the anchor's own
/// frame plus its neighbors, penalizing a frame switch, and keep
/// whichever yields the best score net of the penalty.
#[must_use]
pub fn banded_sw_frameshift(
    query_frames: &[&[u8]],
    subject: &[u8],
    anchor: &HspTraits,
    band: i32,
    score_fn: impl Fn(u8, u8) -> i32 + Copy,
    gap_open: i32,
    gap_extend: i32,
    frame_shift_penalty: i32,
    compute_transcript: bool,
) -> Option<SwOutcome> {
    let base_frame = i32::from(anchor.frame);
    let mut best: Option<(SwOutcome, i32)> = None;
    for delta in [0i32, -1, 1] {
        let frame = base_frame + delta;
        if frame < 0 || frame as usize >= query_frames.len() {
            continue;
        }
        let query = query_frames[frame as usize];
        if let Some(outcome) =
            banded_sw(query, subject, anchor, band, score_fn, gap_open, gap_extend, compute_transcript)
        {
            let penalty = if delta == 0 { 0 } else { frame_shift_penalty };
            let effective = outcome.score - penalty;
            if best.as_ref().is_none_or(|(_, s)| effective > *s) {
                best = Some((outcome, effective));
            }
        }
    }
    best.map(|(mut outcome, effective)| {
        outcome.score = effective;
        outcome
    })
}
