//! Configuration knobs and their defaults.

use serde::{Deserialize, Serialize};

/// Selects the default [`ExtensionMode`] and ranking `default_letters`
/// constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sensitivity {
    Fast,
    Default,
    MidSensitive,
    Sensitive,
    MoreSensitive,
    VerySensitive,
    UltraSensitive,
}

impl Sensitivity {
    /// Default extension mode per sensitivity tier.
    #[must_use]
    pub const fn default_extension_mode(self) -> ExtensionMode {
        match self {
            Self::Fast | Self::Default | Self::MidSensitive | Self::Sensitive => {
                ExtensionMode::BandedFast
            }
            Self::MoreSensitive | Self::VerySensitive | Self::UltraSensitive => {
                ExtensionMode::BandedSlow
            }
        }
    }

    /// Whether this sensitivity tier uses the 800M-letter ranking
    /// default instead of 2B.
    #[must_use]
    pub const fn is_high_sensitivity(self) -> bool {
        matches!(self, Self::VerySensitive | Self::UltraSensitive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionMode {
    BandedFast,
    BandedSlow,
    Full,
    Global,
}

/// Composition-based statistics mode. Modes 3/4 are reserved for a
/// future auto-selection heuristic; seedx treats them as mode 2 and
/// emits a `tracing::warn!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompBasedStats {
    None,
    Hauser,
    HauserAndAvgMatrixAdjust,
}

impl CompBasedStats {
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Self::None,
            1 => Self::Hauser,
            2..=4 => {
                if level > 2 {
                    tracing::warn!(level, "comp_based_stats level 3/4 is reserved; using mode 2");
                }
                Self::HauserAndAvgMatrixAdjust
            }
            other => {
                tracing::warn!(level = other, "unknown comp_based_stats level; using mode 2");
                Self::HauserAndAvgMatrixAdjust
            }
        }
    }

    #[must_use]
    pub const fn uses_hauser(self) -> bool {
        matches!(self, Self::Hauser | Self::HauserAndAvgMatrixAdjust)
    }

    #[must_use]
    pub const fn uses_avg_matrix_adjust(self) -> bool {
        matches!(self, Self::HauserAndAvgMatrixAdjust)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskingAlgo {
    None,
    Seg,
    Tantan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadBalancing {
    QueryParallel,
    TargetParallel,
}

/// Every externally-facing configuration knob, with its default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sensitivity: Sensitivity,
    /// `None` means "use `sensitivity.default_extension_mode()`".
    pub extension_mode: Option<ExtensionMode>,
    pub comp_based_stats: CompBasedStats,
    pub frame_shift: u32,

    pub max_evalue: f64,
    pub min_bit_score: f64,
    pub min_id: f64,
    pub query_cover: f64,
    pub subject_cover: f64,
    pub max_alignments: u64,
    pub toppercent: f64,
    pub max_hsps: u32,
    pub inner_culling_overlap: f64,

    pub ranking_score_drop_factor: f64,
    pub ranking_cutoff_bitscore: f64,
    pub ext_chunk_size: Option<u64>,
    pub no_ranking: bool,
    pub query_memory: bool,
    pub query_range_culling: bool,

    pub gapped_filter_evalue: f64,
    pub gapped_filter_evalue1: f64,

    pub masking: MaskingAlgo,
    pub tantan_min_mask_prob: f64,

    pub threads: usize,
    pub threads_align: usize,
    pub load_balancing: LoadBalancing,
    pub query_parallel_limit: u64,

    pub report_unaligned: bool,

    /// Number of index chunks the seed-hit buffer is partitioned into;
    /// shrinks the per-batch byte budget as chunking increases.
    pub index_chunks: f64,
    /// Upper bound on batch size regardless of chunking, in bytes.
    pub trace_pt_fetch_size: u64,
    /// Hard resident-memory ceiling for the extension stage, raising the
    /// batch floor when set.
    pub memory_limit_bytes: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::Default,
            extension_mode: None,
            comp_based_stats: CompBasedStats::HauserAndAvgMatrixAdjust,
            frame_shift: 0,

            max_evalue: 10.0,
            min_bit_score: 0.0,
            min_id: 0.0,
            query_cover: 0.0,
            subject_cover: 0.0,
            max_alignments: 25,
            toppercent: 100.0,
            max_hsps: 1,
            inner_culling_overlap: 50.0,

            ranking_score_drop_factor: 0.95,
            ranking_cutoff_bitscore: 25.0,
            ext_chunk_size: None,
            no_ranking: false,
            query_memory: false,
            query_range_culling: false,

            gapped_filter_evalue: -1.0,
            gapped_filter_evalue1: 2000.0,

            masking: MaskingAlgo::Tantan,
            tantan_min_mask_prob: 0.9,

            threads: 1,
            threads_align: 0,
            load_balancing: LoadBalancing::QueryParallel,
            query_parallel_limit: 3_000_000,

            report_unaligned: false,

            index_chunks: 1.0,
            trace_pt_fetch_size: 10_000_000_000,
            memory_limit_bytes: None,
        }
    }
}

impl Config {
    #[must_use]
    pub fn resolved_extension_mode(&self) -> ExtensionMode {
        self.extension_mode
            .unwrap_or_else(|| self.sensitivity.default_extension_mode())
    }

    /// `default_letters` constant used by the adaptive ranker: 800M for
    /// very/ultra sensitive, 2B otherwise.
    #[must_use]
    pub fn ranking_default_letters(&self) -> f64 {
        if self.sensitivity.is_high_sensitivity() {
            800.0e6
        } else {
            2.0e9
        }
    }

    /// Whether the gapped filter should run at all.
    #[must_use]
    pub fn gapped_filter_enabled(&self) -> bool {
        self.gapped_filter_evalue > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_recovered_defaults() {
        let cfg = Config::default();
        assert!((cfg.ranking_score_drop_factor - 0.95).abs() < 1e-12);
        assert!((cfg.ranking_cutoff_bitscore - 25.0).abs() < 1e-12);
        assert_eq!(cfg.query_parallel_limit, 3_000_000);
        assert_eq!(cfg.max_hsps, 1);
        assert!((cfg.inner_culling_overlap - 50.0).abs() < 1e-12);
    }

    #[test]
    fn sensitivity_selects_extension_mode() {
        assert_eq!(
            Sensitivity::Fast.default_extension_mode(),
            ExtensionMode::BandedFast
        );
        assert_eq!(
            Sensitivity::UltraSensitive.default_extension_mode(),
            ExtensionMode::BandedSlow
        );
    }

    #[test]
    fn comp_based_stats_reserved_levels_fall_back_to_mode_2() {
        assert_eq!(CompBasedStats::from_level(3), CompBasedStats::HauserAndAvgMatrixAdjust);
        assert_eq!(CompBasedStats::from_level(4), CompBasedStats::HauserAndAvgMatrixAdjust);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = Config::default();
        let text = toml::to_string(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("deserialize");
        assert_eq!(back.max_alignments, cfg.max_alignments);
    }
}
