//! Query-range dispatcher and order-preserving output sink.

pub mod fetcher;
pub mod sink;

pub use fetcher::{AlignFetcher, ClaimedRange};
pub use sink::OutputSink;
