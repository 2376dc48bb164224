//! Adaptive ranker: chunked expansion with score-drop/bitscore-cutoff
//! early exit and `QueryMemory`-backed short-circuiting.

pub mod chunk_size;
pub mod ranker;

pub use chunk_size::ranking_chunk_size;
pub use ranker::{should_short_circuit_query, ChunkIter, ChunkResult, EarlyExit, sort_targets_by_score_desc};
