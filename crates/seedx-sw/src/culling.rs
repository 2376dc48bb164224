//! HSP and match culling and the final sort.

use seedx_matrix::KarlinAltschul;
use seedx_types::{Config, Hsp, HspTraits, Match, Target};

/// Step 1: drop HSPs that fail any of the reporting thresholds, then
/// sort survivors (score desc, tie-break by `Hsp::tie_break_key`) and
/// cap the per-target list at `config.max_hsps`.
pub fn cull_hsps_within_target(
    hsps: &mut Vec<Hsp>,
    config: &Config,
    karlin: &KarlinAltschul,
    query_len: i32,
    target_len: i32,
) {
    hsps.retain(|h| {
        h.evalue <= config.max_evalue
            && karlin.bitscore(h.score) >= config.min_bit_score
            && h.identity_pct() >= config.min_id
            && h.query_cover_pct(query_len) >= config.query_cover
            && h.subject_cover_pct(target_len) >= config.subject_cover
    });
    hsps.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.tie_break_key().cmp(&b.tie_break_key())));
    if hsps.len() > config.max_hsps as usize {
        hsps.truncate(config.max_hsps as usize);
    }
}

/// Step 4 (frameshift mode only): among a target's surviving HSP
/// anchors, drop any anchor whose query range overlaps a
/// higher-scoring one by more than `config.inner_culling_overlap`
/// percent. Input order is assumed score-descending.
pub fn range_cull_frameshift(traits: Vec<HspTraits>, inner_culling_overlap: f64) -> Vec<HspTraits> {
    let mut kept: Vec<HspTraits> = Vec::with_capacity(traits.len());
    'candidates: for candidate in traits {
        for winner in &kept {
            if candidate.query_overlap_pct(winner) > inner_culling_overlap {
                continue 'candidates;
            }
        }
        kept.push(candidate);
    }
    kept
}

/// Build a [`Target`] from a per-target HSP list, or `None` if nothing
/// survived.
#[must_use]
pub fn build_target(block_id: seedx_types::BlockId, hsps: Vec<Hsp>) -> Option<Target> {
    if hsps.iter().any(|h| h.score > 0) {
        Some(Target { block_id, hsps })
    } else {
        None
    }
}

/// Attach identity%/coverage% (measured against the best HSP) to turn a
/// [`Target`] into a reportable [`Match`].
#[must_use]
pub fn build_match(target: Target, query_len: i32) -> Option<Match> {
    let best = target.hsps.iter().max_by_key(|h| h.score)?.clone();
    Some(Match {
        block_id: target.block_id,
        identity_pct: best.identity_pct(),
        coverage_pct: best.query_cover_pct(query_len),
        hsps: target.hsps,
    })
}

/// Steps 2-3 plus the final sort: across-target `max_alignments`
/// capping, or top-percent retention relative to the query's best
/// score, whichever `config.toppercent` selects.
#[must_use]
pub fn cull_matches_across_query(mut matches: Vec<Match>, config: &Config) -> Vec<Match> {
    if matches.is_empty() {
        return matches;
    }
    let top_percent_active = config.toppercent < 100.0;
    if top_percent_active {
        let global_best = matches.iter().map(Match::best_score).max().unwrap_or(0);
        let threshold = f64::from(global_best) * (1.0 - config.toppercent / 100.0);
        matches.retain(|m| f64::from(m.best_score()) >= threshold);
        matches.sort_by(Match::cmp_evalue);
    } else {
        matches.sort_by(Match::cmp_score);
        if matches.len() > config.max_alignments as usize {
            matches.truncate(config.max_alignments as usize);
        }
    }
    matches
}
