//! X-drop ungapped extension from a seed anchor.

use seedx_types::{DiagonalSegment, LocalHit};

/// Walk from `(start_q, start_s)` in direction `dir` (+1 or -1),
/// accumulating substitution scores and tracking the best running
/// score. Stops at a sequence boundary or once the score has dropped
/// more than `x_drop` below the running maximum. Returns the number of
/// steps covered by the best-scoring prefix and that prefix's score.
fn extend_one_direction(
    query: &[u8],
    subject: &[u8],
    start_q: i32,
    start_s: i32,
    dir: i32,
    x_drop: i32,
    score_fn: &impl Fn(u8, u8) -> i32,
) -> (i32, i32) {
    let mut score = 0i32;
    let mut best_score = 0i32;
    let mut best_steps = 0i32;
    let mut steps = 0i32;
    let mut q = start_q;
    let mut s = start_s;
    loop {
        if q < 0 || s < 0 || q as usize >= query.len() || s as usize >= subject.len() {
            break;
        }
        score += score_fn(query[q as usize], subject[s as usize]);
        steps += 1;
        if score > best_score {
            best_score = score;
            best_steps = steps;
        }
        if best_score - score > x_drop {
            break;
        }
        q += dir;
        s += dir;
    }
    (best_steps, best_score)
}

/// Extend a seed anchor in both directions under x-drop, producing a
/// [`DiagonalSegment`] if the combined score is positive.
#[must_use]
pub fn xdrop_extend(
    query: &[u8],
    subject: &[u8],
    seed: &LocalHit,
    x_drop: i32,
    score_fn: impl Fn(u8, u8) -> i32,
) -> Option<DiagonalSegment> {
    let (right_steps, right_score) = extend_one_direction(query, subject, seed.i, seed.j, 1, x_drop, &score_fn);
    let (left_steps, left_score) =
        extend_one_direction(query, subject, seed.i - 1, seed.j - 1, -1, x_drop, &score_fn);
    let total_score = left_score + right_score;
    if total_score <= 0 {
        return None;
    }
    Some(DiagonalSegment {
        query_begin: seed.i - left_steps,
        query_end: seed.i + right_steps,
        subject_begin: seed.j - left_steps,
        subject_end: seed.j + right_steps,
        score: total_score,
        frame: seed.frame,
    })
}
