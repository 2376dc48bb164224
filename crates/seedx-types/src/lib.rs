//! Core data model and configuration for the seed-hit-to-alignment
//! extension pipeline: the shared entities every stage crate passes
//! between each other, plus the externally-facing configuration.

mod config;
mod hsp;
mod ids;
mod query_memory;
mod seed_hit;
mod stats;
mod work_target;

pub use config::{CompBasedStats, Config, ExtensionMode, LoadBalancing, MaskingAlgo, Sensitivity};
pub use hsp::{CigarOp, Hsp, HspValues, Match, Target};
pub use ids::{BlockId, Diagonal, Frame, QueryId, MAX_CONTEXTS};
pub use query_memory::QueryMemory;
pub use seed_hit::{cmp_frame_diag_subject, BySubjectOffset, LocalHit, SeedHit, TargetHits, TargetScore};
pub use stats::{Statistics, WorkerStats};
pub use work_target::{AdjustedMatrixHandle, DiagonalSegment, HspTraits, WorkTarget};
