//! Unified scoring-matrix facade combining raw substitution scores with
//! their Karlin-Altschul statistics, so callers outside this crate never
//! have to reach into `blosum62` or `karlin` directly.

use crate::blosum62;
use crate::karlin::KarlinAltschul;

#[derive(Debug, Clone, Copy)]
pub struct ScoringMatrix {
    karlin: KarlinAltschul,
}

impl ScoringMatrix {
    #[must_use]
    pub fn gapped_default() -> Self {
        Self {
            karlin: KarlinAltschul::BLOSUM62_GAP_11_1,
        }
    }

    #[must_use]
    pub fn ungapped() -> Self {
        Self {
            karlin: KarlinAltschul::BLOSUM62_UNGAPPED,
        }
    }

    #[must_use]
    pub fn karlin(&self) -> KarlinAltschul {
        self.karlin
    }

    #[must_use]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        blosum62::raw_score(a, b)
    }

    #[must_use]
    pub fn bitscore(&self, raw_score: i32) -> f64 {
        self.karlin.bitscore(raw_score)
    }

    #[must_use]
    pub fn evalue(&self, raw_score: i32, query_len: i64, target_len: i64) -> f64 {
        self.karlin.evalue(raw_score, query_len, target_len)
    }

    #[must_use]
    pub fn background_freqs(&self) -> [f64; 20] {
        blosum62::background_freqs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gapped_and_ungapped_use_distinct_lambda() {
        let gapped = ScoringMatrix::gapped_default();
        let ungapped = ScoringMatrix::ungapped();
        assert!((gapped.karlin().lambda - ungapped.karlin().lambda).abs() > 1e-6);
    }

    #[test]
    fn score_matches_raw_blosum62() {
        let m = ScoringMatrix::gapped_default();
        assert_eq!(m.score(b'A', b'A'), blosum62::raw_score(b'A', b'A'));
    }
}
