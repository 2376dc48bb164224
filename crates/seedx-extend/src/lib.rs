//! Ungapped extension, greedy chaining, and composition-matrix
//! integration.

pub mod chaining;
pub mod stage;
pub mod xdrop;

pub use chaining::greedy_chain;
pub use stage::{extend_target, extend_targets, ExtendEnv, TargetJob};
pub use xdrop::xdrop_extend;
