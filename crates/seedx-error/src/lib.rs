//! Error kinds for the seed-hit-to-alignment extension pipeline.
//!
//! Mirrors the five fatal/recoverable categories of the pipeline's error
//! handling design: configuration, I/O, resource exhaustion, and invalid
//! input data are fatal; 8-bit DP overflow and duplicate composition-matrix
//! builds are recovered locally and never surface as an [`Error`].

use std::io;

/// Result alias used throughout the seedx workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that can terminate the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mutually exclusive options, unsupported mode combinations, or a
    /// missing required file.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure reading the seed-hit buffer or fetching a sequence.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Allocation failure or an explicit memory ceiling violation.
    #[error("resource exhaustion: {message} (resident={resident_bytes}, limit={limit_bytes})")]
    ResourceExhausted {
        message: String,
        resident_bytes: u64,
        limit_bytes: u64,
    },

    /// Nonsensical input data: sequence length mismatches, out-of-range
    /// frame indices, or a target block id with no backing sequence.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A worker thread panicked or returned an error and could not
    /// continue; the message names the query range it was processing.
    #[error("worker failed while processing query range [{query_begin}, {query_end}): {source}")]
    WorkerFailed {
        query_begin: u32,
        query_end: u32,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn resource_exhausted(
        message: impl Into<String>,
        resident_bytes: u64,
        limit_bytes: u64,
    ) -> Self {
        Self::ResourceExhausted {
            message: message.into(),
            resident_bytes,
            limit_bytes,
        }
    }
}
