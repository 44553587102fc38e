//! Bulk test-data generation pipeline.
//!
//! The pipeline creates a fleet of synthetic users followed by a large volume
//! of posts, inserted in bounded batches so memory stays flat regardless of
//! the total row count. Each batch is one multi-row insert committed as its
//! own unit of work: a failure rolls back the in-flight batch only, leaving
//! earlier committed batches in place.

pub mod chunk;
pub mod generator;
pub mod runner;
pub mod store;

use thiserror::Error;

pub use runner::{GenerationConfig, GenerationSummary, Seeder};
pub use store::BulkStore;

/// Errors surfaced by the generation pipeline
#[derive(Debug, Error)]
pub enum SeedError {
    /// Bad partitioning or configuration parameters
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Insert or commit failure raised by the storage engine
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}
