//! Chunk sizing for the adaptive ranker.

use seedx_types::Config;

fn round_up_to_multiple(value: u64, multiple: u64) -> u64 {
    value.div_ceil(multiple) * multiple
}

/// The `min(128, clamp(round_up(max_alignments, 32), 128, 400))` formula
/// is reproduced literally: since `clamp(..., 128, 400)` never returns
/// less than 128, the `min` with 128 always yields 128 — both branches
/// collapse to the same base, so the non-top-percent and top-percent
/// cases agree.
#[must_use]
pub fn ranking_chunk_size(total_targets: usize, db_letters: f64, config: &Config) -> usize {
    if config.no_ranking {
        return total_targets;
    }
    if let Some(ext) = config.ext_chunk_size {
        return ext as usize;
    }

    let default_letters = config.ranking_default_letters();
    let block_multiplier = (db_letters / default_letters).round().max(1.0);

    let top_percent_active = config.toppercent < 100.0;
    let base = if top_percent_active {
        128.0
    } else {
        let rounded_up = round_up_to_multiple(config.max_alignments, 32) as f64;
        rounded_up.clamp(128.0, 400.0).min(128.0)
    };

    (base * block_multiplier).round() as usize
}
