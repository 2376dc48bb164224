//! Command-line argument surface plus the mapping from parsed flags onto a
//! [`seedx_types::Config`].

use std::path::PathBuf;

use clap::Parser;
use seedx_types::{CompBasedStats, Config, LoadBalancing, MaskingAlgo, Sensitivity};

#[derive(Debug, Parser)]
#[command(name = "seedx", about = "Seed-hit-to-alignment extension pipeline")]
pub struct Cli {
    /// FASTA file of query sequences.
    #[arg(long)]
    pub query: PathBuf,

    /// FASTA file of reference (target) sequences.
    #[arg(long)]
    pub db: PathBuf,

    /// TOML configuration file overriding the built-in defaults before
    /// any other flag is applied.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exact-match seed length used by the built-in fixture seeder
    /// standing in for a real indexer.
    #[arg(long, default_value_t = 8)]
    pub seed_len: usize,

    #[arg(long, value_enum, default_value = "default")]
    pub sensitivity: SensitivityArg,

    #[arg(long, default_value_t = 2)]
    pub comp_based_stats: u8,

    #[arg(long, default_value_t = 0)]
    pub frame_shift: u32,

    #[arg(long, default_value_t = 10.0)]
    pub max_evalue: f64,

    #[arg(long, default_value_t = 25)]
    pub max_target_seqs: u64,

    #[arg(long, default_value_t = 100.0)]
    pub top: f64,

    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    #[arg(long)]
    pub report_unaligned: bool,

    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SensitivityArg {
    Fast,
    Default,
    MidSensitive,
    Sensitive,
    MoreSensitive,
    VerySensitive,
    UltraSensitive,
}

impl From<SensitivityArg> for Sensitivity {
    fn from(value: SensitivityArg) -> Self {
        match value {
            SensitivityArg::Fast => Self::Fast,
            SensitivityArg::Default => Self::Default,
            SensitivityArg::MidSensitive => Self::MidSensitive,
            SensitivityArg::Sensitive => Self::Sensitive,
            SensitivityArg::MoreSensitive => Self::MoreSensitive,
            SensitivityArg::VerySensitive => Self::VerySensitive,
            SensitivityArg::UltraSensitive => Self::UltraSensitive,
        }
    }
}

impl Cli {
    /// Build a [`Config`], starting from `--config`'s file (or the
    /// built-in defaults) and then applying every flag the user set
    /// explicitly on top.
    pub fn resolve_config(&self) -> seedx_error::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                toml::from_str(&text).map_err(|e| seedx_error::Error::config(e.to_string()))?
            }
            None => Config::default(),
        };

        config.sensitivity = self.sensitivity.into();
        config.comp_based_stats = CompBasedStats::from_level(self.comp_based_stats);
        config.frame_shift = self.frame_shift;
        config.max_evalue = self.max_evalue;
        config.max_alignments = self.max_target_seqs;
        config.toppercent = self.top;
        config.threads = self.threads.max(1);
        config.threads_align = self.threads.max(1);
        config.report_unaligned = self.report_unaligned;
        if config.threads > 1 {
            config.load_balancing = LoadBalancing::QueryParallel;
        }
        if matches!(config.masking, MaskingAlgo::Tantan) && self.seed_len == 0 {
            return Err(seedx_error::Error::config("seed_len must be nonzero"));
        }

        Ok(config)
    }
}
