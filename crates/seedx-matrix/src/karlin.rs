//! Karlin-Altschul statistics for BLOSUM62 at the default gap costs
//! (gap-open 11, gap-extend 1). Values are the standard published
//! constants for this matrix/gap-cost combination.

/// Karlin-Altschul parameters for one (matrix, gap-open, gap-extend)
/// combination.
#[derive(Debug, Clone, Copy)]
pub struct KarlinAltschul {
    pub lambda: f64,
    pub k: f64,
    #[allow(dead_code)]
    pub h: f64,
}

impl KarlinAltschul {
    /// BLOSUM62, gap-open 11, gap-extend 1.
    pub const BLOSUM62_GAP_11_1: Self = Self {
        lambda: 0.267,
        k: 0.0410,
        h: 0.140,
    };

    /// Ungapped BLOSUM62 statistics, used by the x-drop extension stage
    /// before any gap has been introduced.
    pub const BLOSUM62_UNGAPPED: Self = Self {
        lambda: 0.3176,
        k: 0.134,
        h: 0.4012,
    };

    #[must_use]
    pub fn bitscore(&self, raw_score: i32) -> f64 {
        (self.lambda * f64::from(raw_score) - self.k.ln()) / std::f64::consts::LN_2
    }

    #[must_use]
    pub fn evalue(&self, raw_score: i32, query_len: i64, target_len: i64) -> f64 {
        2f64.powf(-self.bitscore(raw_score)) * query_len as f64 * target_len as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitscore_increases_monotonically_with_score() {
        let ka = KarlinAltschul::BLOSUM62_GAP_11_1;
        assert!(ka.bitscore(100) > ka.bitscore(50));
    }

    #[test]
    fn evalue_decreases_as_score_increases() {
        let ka = KarlinAltschul::BLOSUM62_GAP_11_1;
        assert!(ka.evalue(100, 300, 1_000_000) < ka.evalue(50, 300, 1_000_000));
    }
}
