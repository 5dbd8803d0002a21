// src/pipeline/import.rs

//! Store import step.

use crate::error::Result;
use crate::models::CanonicalRecord;
use crate::storage::{ImportReport, LocationStore};

/// Upsert a record batch into the store and log the outcome counters.
pub async fn run_import(
    store: &dyn LocationStore,
    records: &[CanonicalRecord],
) -> Result<ImportReport> {
    log::info!("Importing {} records into the store", records.len());

    let report = store.upsert_batch(records).await?;

    log::info!(
        "Import complete: {} written, {} skipped, {} failed ({} sub-batches, {} failed)",
        report.written,
        report.skipped,
        report.failed,
        report.committed_batches,
        report.failed_batches
    );

    Ok(report)
}
