//! Seed-hit buffer and query-range partitioner.

pub mod buffer;
pub mod sizing;

pub use buffer::{next_batch, HitBatch, HitSource, PartitionedHitBuffer};
pub use sizing::batch_max_bytes;
