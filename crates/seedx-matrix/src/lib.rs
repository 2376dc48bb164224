//! Scoring matrices, Karlin-Altschul statistics, and composition-based
//! score adjustment.

pub mod blosum62;
pub mod composition;
pub mod hauser;
pub mod karlin;
pub mod matrix_pool;
pub mod scoring;

pub use composition::{make_adjusted_matrix, test_to_apply_readjustment, Composition, CompositionVerdict};
pub use hauser::BiasCorrection;
pub use karlin::KarlinAltschul;
pub use matrix_pool::MatrixPool;
pub use scoring::ScoringMatrix;
