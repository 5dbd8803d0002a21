// src/storage/mod.rs

//! Storage abstractions for canonical location records.
//!
//! The store is shared with concurrent external writers (the sensor
//! update endpoint and the admin console). The upsert contract is this
//! pipeline's entire concurrency agreement with them: merge field-wise,
//! never clobber fields the pipeline does not own, never delete.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CanonicalRecord;

// Re-export for convenience
pub use local::LocalStore;

/// Outcome counters for one batch upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records merged into the store
    pub written: usize,
    /// Records rejected at validation (missing name/coordinates)
    pub skipped: usize,
    /// Records lost to failed sub-batch commits
    pub failed: usize,
    /// Sub-batches committed
    pub committed_batches: usize,
    /// Sub-batches that failed to commit
    pub failed_batches: usize,
}

/// Trait for canonical record storage backends.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Merge-upsert a record batch, keyed by each record's name slug.
    ///
    /// Invalid records are skipped and counted; a sub-batch commit
    /// failure is counted and does not abort the remaining sub-batches.
    async fn upsert_batch(&self, records: &[CanonicalRecord]) -> Result<ImportReport>;

    /// Load one stored document by slug.
    async fn load(&self, slug: &str) -> Result<Option<CanonicalRecord>>;
}
