//! Final alignment results: HSPs, aligned targets, and reported matches.

use crate::ids::{BlockId, Frame};

bitflags::bitflags! {
    /// Which fields of an [`Hsp`] a caller actually needs computed:
    /// coordinates, length, identity, mismatches, gaps, transcript.
    /// Cheaper rounds request fewer fields so the DP can skip traceback
    /// bookkeeping entirely.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
    pub struct HspValues: u16 {
        const IDENT         = 0b0000_0001;
        const LENGTH        = 0b0000_0010;
        const QUERY_COORDS  = 0b0000_0100;
        const TARGET_COORDS = 0b0000_1000;
        const MISMATCHES    = 0b0001_0000;
        const GAPS          = 0b0010_0000;
        const TRANSCRIPT    = 0b0100_0000;
    }
}

impl HspValues {
    /// Minimal field set needed before culling decisions are made: just
    /// enough to compute score/e-value and apply the coverage/identity
    /// thresholds, deferring transcript reconstruction to the final
    /// alignment pass over survivors.
    #[must_use]
    pub const fn first_round_hspv() -> Self {
        Self::QUERY_COORDS.union(Self::TARGET_COORDS).union(Self::IDENT).union(Self::LENGTH)
    }
}

/// A single edit-script operation produced by traceback, when
/// [`HspValues::TRANSCRIPT`] is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CigarOp {
    Match(u32),
    Mismatch(u32),
    Insertion(u32),
    Deletion(u32),
}

/// A maximal local alignment between a query and a target (HSP).
#[derive(Debug, Clone, PartialEq)]
pub struct Hsp {
    pub score: i32,
    pub evalue: f64,
    pub frame: Frame,
    pub query_start: i32,
    pub query_end: i32,
    pub subject_start: i32,
    pub subject_end: i32,
    pub identities: u32,
    pub length: u32,
    pub mismatches: u32,
    pub gap_openings: u32,
    pub transcript: Option<Vec<CigarOp>>,
}

impl Hsp {
    /// `identity% = identities * 100 / length`.
    #[must_use]
    pub fn identity_pct(&self) -> f64 {
        if self.length == 0 {
            0.0
        } else {
            f64::from(self.identities) * 100.0 / f64::from(self.length)
        }
    }

    /// `query_cover% = (qend - qstart + 1) * 100 / source_query_len`.
    #[must_use]
    pub fn query_cover_pct(&self, source_query_len: i32) -> f64 {
        if source_query_len <= 0 {
            0.0
        } else {
            f64::from(self.query_end - self.query_start + 1) * 100.0 / f64::from(source_query_len)
        }
    }

    /// Subject-coverage analogue of [`Self::query_cover_pct`].
    #[must_use]
    pub fn subject_cover_pct(&self, subject_len: i32) -> f64 {
        if subject_len <= 0 {
            0.0
        } else {
            f64::from(self.subject_end - self.subject_start + 1) * 100.0 / f64::from(subject_len)
        }
    }

    /// Tie-break key for equal-score HSPs: lower query-start, then lower
    /// target-start.
    #[must_use]
    pub fn tie_break_key(&self) -> (i32, i32) {
        (self.query_start, self.subject_start)
    }
}

/// One aligned target: at least one HSP with `score > 0` across its
/// per-frame HSP lists.
#[derive(Debug, Clone)]
pub struct Target {
    pub block_id: BlockId,
    pub hsps: Vec<Hsp>,
}

impl Target {
    #[must_use]
    pub fn best_score(&self) -> i32 {
        self.hsps.iter().map(|h| h.score).max().unwrap_or(0)
    }
}

/// A reported match: sorted HSP list plus filter metrics computed
/// against the best HSP.
#[derive(Debug, Clone)]
pub struct Match {
    pub block_id: BlockId,
    pub hsps: Vec<Hsp>,
    pub identity_pct: f64,
    pub coverage_pct: f64,
}

impl Match {
    #[must_use]
    pub fn best_score(&self) -> i32 {
        self.hsps.first().map_or(0, |h| h.score)
    }

    #[must_use]
    pub fn best_evalue(&self) -> f64 {
        self.hsps.first().map_or(f64::INFINITY, |h| h.evalue)
    }

    /// Sort key used when top-percent mode is inactive: score desc, then
    /// e-value asc.
    pub fn cmp_score(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.best_score()
            .cmp(&a.best_score())
            .then_with(|| a.best_evalue().partial_cmp(&b.best_evalue()).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Sort key used when top-percent mode is active: e-value asc.
    pub fn cmp_evalue(a: &Self, b: &Self) -> std::cmp::Ordering {
        a.best_evalue()
            .partial_cmp(&b.best_evalue())
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsp(score: i32, evalue: f64) -> Hsp {
        Hsp {
            score,
            evalue,
            frame: 0,
            query_start: 0,
            query_end: 9,
            subject_start: 0,
            subject_end: 9,
            identities: 10,
            length: 10,
            mismatches: 0,
            gap_openings: 0,
            transcript: None,
        }
    }

    #[test]
    fn identity_and_coverage_percentages() {
        let h = hsp(50, 1e-10);
        assert!((h.identity_pct() - 100.0).abs() < 1e-9);
        assert!((h.query_cover_pct(10) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn match_sorts_by_score_desc_then_evalue_asc() {
        let mut matches = vec![
            Match { block_id: 0, hsps: vec![hsp(10, 1e-5)], identity_pct: 100.0, coverage_pct: 100.0 },
            Match { block_id: 1, hsps: vec![hsp(50, 1e-20)], identity_pct: 100.0, coverage_pct: 100.0 },
            Match { block_id: 2, hsps: vec![hsp(50, 1e-30)], identity_pct: 100.0, coverage_pct: 100.0 },
        ];
        matches.sort_by(Match::cmp_score);
        assert_eq!(matches[0].block_id, 2);
        assert_eq!(matches[1].block_id, 1);
        assert_eq!(matches[2].block_id, 0);
    }

    #[test]
    fn hsp_values_bitflags_compose() {
        let v = HspValues::IDENT | HspValues::LENGTH;
        assert!(v.contains(HspValues::IDENT));
        assert!(!v.contains(HspValues::TRANSCRIPT));
    }
}
