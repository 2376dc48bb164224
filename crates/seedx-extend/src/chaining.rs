//! Greedy chaining of diagonal segments into HSP traits.

use seedx_types::{DiagonalSegment, HspTraits};

/// Chain `segments` (one frame's worth) into a list of `HspTraits`,
/// greedily extending each segment from whichever non-overlapping
/// predecessor maximizes its chain score under the gap-cost model.
/// Output is re-sorted by diagonal.
#[must_use]
pub fn greedy_chain(mut segments: Vec<DiagonalSegment>, chaining_maxgap: i32, space_penalty: i32) -> Vec<HspTraits> {
    if segments.is_empty() {
        return Vec::new();
    }
    segments.sort_by_key(|s| s.query_begin);

    struct Chained {
        seg: DiagonalSegment,
        chain_score: i32,
        chain_query_begin: i32,
        chain_subject_begin: i32,
    }

    let mut chained: Vec<Chained> = Vec::with_capacity(segments.len());
    for seg in segments {
        let mut best_score = seg.score;
        let mut best_qbegin = seg.query_begin;
        let mut best_sbegin = seg.subject_begin;

        for prev in chained.iter().rev() {
            if prev.seg.query_end > seg.query_begin {
                continue;
            }
            let q_gap = seg.query_begin - prev.seg.query_end;
            let s_gap = seg.subject_begin - prev.seg.subject_end;
            let gap = q_gap.max(s_gap).max(0);
            if gap > chaining_maxgap {
                continue;
            }
            let candidate = prev.chain_score - gap * space_penalty + seg.score;
            if candidate > best_score {
                best_score = candidate;
                best_qbegin = prev.chain_query_begin;
                best_sbegin = prev.chain_subject_begin;
            }
        }

        chained.push(Chained {
            seg,
            chain_score: best_score,
            chain_query_begin: best_qbegin,
            chain_subject_begin: best_sbegin,
        });
    }

    let mut out: Vec<HspTraits> = chained
        .into_iter()
        .map(|c| HspTraits {
            query_begin: c.chain_query_begin,
            query_end: c.seg.query_end,
            subject_begin: c.chain_subject_begin,
            subject_end: c.seg.subject_end,
            score: c.chain_score,
            frame: c.seg.frame,
        })
        .collect();
    out.sort_by_key(HspTraits::diag);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(qb: i32, qe: i32, sb: i32, se: i32, score: i32) -> DiagonalSegment {
        DiagonalSegment {
            query_begin: qb,
            query_end: qe,
            subject_begin: sb,
            subject_end: se,
            score,
            frame: 0,
        }
    }

    #[test]
    fn chains_two_adjacent_segments_on_compatible_diagonals() {
        let segments = vec![seg(0, 10, 0, 10, 20), seg(12, 22, 12, 22, 25)];
        let chained = greedy_chain(segments, 5, 1);
        assert_eq!(chained.len(), 2);
        let second = chained.iter().find(|h| h.query_end == 22).unwrap();
        assert!(second.score > 25, "chain should accumulate score from predecessor");
    }

    #[test]
    fn gap_beyond_maxgap_prevents_chaining() {
        let segments = vec![seg(0, 10, 0, 10, 20), seg(50, 60, 50, 60, 25)];
        let chained = greedy_chain(segments, 5, 1);
        let second = chained.iter().find(|h| h.query_end == 60).unwrap();
        assert_eq!(second.score, 25);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(greedy_chain(Vec::new(), 10, 1).is_empty());
    }

    #[test]
    fn output_is_sorted_by_diagonal() {
        let segments = vec![seg(20, 30, 15, 25, 10), seg(0, 10, 5, 15, 10)];
        let chained = greedy_chain(segments, 5, 1);
        for pair in chained.windows(2) {
            assert!(pair[0].diag() <= pair[1].diag());
        }
    }
}
