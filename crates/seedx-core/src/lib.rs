//! Facade crate wiring the hit buffer, loader, ranker, extension,
//! filter, aligner, and dispatcher crates into one `run_search` entry
//! point.

mod database;
mod engine;
mod format;

pub use database::{Database, InMemoryDatabase};
pub use engine::{run_search, QueryRecord};
pub use format::{OutputFormat, TabularFormat};
