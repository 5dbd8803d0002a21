// src/storage/local.rs

//! Local filesystem store.
//!
//! One JSON document per concept under `locations/`, plus the exported
//! record array and run summary at the root. Development stand-in for
//! the shared document store; writes are atomic (temp file + rename).
//!
//! ## Layout
//!
//! ```text
//! {root}/
//! ├── config.toml                     # Crawler configuration
//! ├── dining-locations.json           # Exported record array
//! ├── dining-locations-summary.json   # Run summary
//! └── locations/                      # One document per slug
//!     ├── cafe-libro.json
//!     └── union-express.json
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{CanonicalRecord, ScrapeSummary, StoreConfig};
use crate::storage::{ImportReport, LocationStore};

/// Exported record array file name.
pub const EXPORT_FILE: &str = "dining-locations.json";

/// Run summary file name.
pub const SUMMARY_FILE: &str = "dining-locations-summary.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
    config: StoreConfig,
}

impl LocalStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, config: StoreConfig) -> Self {
        Self {
            root_dir: root_dir.into(),
            config,
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    fn document_key(slug: &str) -> String {
        format!("locations/{slug}.json")
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Write the exported record array and run summary.
    pub async fn write_export(
        &self,
        records: &[CanonicalRecord],
        summary: &ScrapeSummary,
    ) -> Result<()> {
        self.write_json(EXPORT_FILE, records).await?;
        self.write_json(SUMMARY_FILE, summary).await?;
        Ok(())
    }

    /// Load a previously exported record array.
    pub async fn load_export(&self) -> Result<Vec<CanonicalRecord>> {
        match self.read_json(EXPORT_FILE).await? {
            Some(records) => Ok(records),
            None => Err(AppError::store(format!("{EXPORT_FILE} not found"))),
        }
    }

    /// Load the last run summary, if any.
    pub async fn load_summary(&self) -> Result<Option<ScrapeSummary>> {
        self.read_json(SUMMARY_FILE).await
    }

    /// Merge one record over its stored document and write the result.
    async fn upsert_record(&self, record: &CanonicalRecord) -> Result<()> {
        let key = Self::document_key(&record.slug());
        let stored: Option<CanonicalRecord> = self.read_json(&key).await?;
        let merged = record.merge_over(stored.as_ref(), self.config.initial_crowd_level);
        self.write_json(&key, &merged).await
    }

    /// Commit one validated sub-batch. The first write error aborts the
    /// sub-batch.
    async fn commit_chunk(&self, chunk: &[&CanonicalRecord]) -> Result<()> {
        for record in chunk {
            self.upsert_record(record).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LocationStore for LocalStore {
    async fn upsert_batch(&self, records: &[CanonicalRecord]) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        // Validation pass: skip records the store must not accept
        let mut valid: Vec<&CanonicalRecord> = Vec::new();
        for record in records {
            match record.write_rejection(&self.config.placeholder_names) {
                Some(reason) => {
                    report.skipped += 1;
                    log::warn!("Skipping invalid record: {reason}");
                }
                None => valid.push(record),
            }
        }

        for chunk in valid.chunks(self.config.batch_size.max(1)) {
            match self.commit_chunk(chunk).await {
                Ok(()) => {
                    report.written += chunk.len();
                    report.committed_batches += 1;
                }
                Err(error) => {
                    // A failed sub-batch does not abort the rest
                    report.failed += chunk.len();
                    report.failed_batches += 1;
                    log::error!("Sub-batch commit failed: {error}");
                }
            }
        }

        Ok(report)
    }

    async fn load(&self, slug: &str) -> Result<Option<CanonicalRecord>> {
        self.read_json(&Self::document_key(slug)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, LiveMenuEntry, Status};
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> LocalStore {
        LocalStore::new(tmp.path(), StoreConfig::default())
    }

    fn record(name: &str) -> CanonicalRecord {
        CanonicalRecord {
            name: name.to_string(),
            building: "Student Union".to_string(),
            coordinates: Some(GeoPoint {
                lat: 36.1250,
                lng: -97.0650,
            }),
            status: Some(Status::Open),
            crowd_level: Some(50),
            official_menu: vec!["Coffee".to_string()],
            live_menu: None,
            description: "A test concept".to_string(),
            url: "/locations/test.html".to_string(),
            map_link: None,
            has_grubhub: None,
            cuisine: None,
            hours: None,
            detailed_menu: None,
        }
    }

    #[tokio::test]
    async fn test_write_and_read_bytes() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.write_bytes("test.txt", b"hello").await.unwrap();
        let data = store.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let data = store.read_bytes("nope.txt").await.unwrap();
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_document_with_seeds() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let mut fresh = record("Union Express");
        fresh.status = None;
        fresh.crowd_level = None;

        let report = store.upsert_batch(&[fresh]).await.unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(report.skipped, 0);

        let stored = store.load("union-express").await.unwrap().unwrap();
        assert_eq!(stored.status, Some(Status::Open));
        assert_eq!(stored.crowd_level, Some(50));
        assert_eq!(stored.live_menu, Some(vec![]));
    }

    #[tokio::test]
    async fn test_upsert_preserves_sensor_owned_fields() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store
            .upsert_batch(&[record("Union Express")])
            .await
            .unwrap();

        // Sensor and crowdsourcing collaborators update the document
        let mut updated = store.load("union-express").await.unwrap().unwrap();
        updated.status = Some(Status::Closed);
        updated.crowd_level = Some(91);
        updated.live_menu = Some(vec![LiveMenuEntry {
            item: "Street tacos".to_string(),
            author: "student".to_string(),
            time: "2025-10-04T18:00:00Z".to_string(),
        }]);
        store
            .write_json(&LocalStore::document_key("union-express"), &updated)
            .await
            .unwrap();

        // Re-import must not clobber collaborator fields
        store
            .upsert_batch(&[record("Union Express")])
            .await
            .unwrap();

        let stored = store.load("union-express").await.unwrap().unwrap();
        assert_eq!(stored.status, Some(Status::Closed));
        assert_eq!(stored.crowd_level, Some(91));
        assert_eq!(stored.live_menu.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_double_import_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let batch = vec![record("Carvery"), record("Dash")];

        store.upsert_batch(&batch).await.unwrap();
        let first = store.load("carvery").await.unwrap().unwrap();

        store.upsert_batch(&batch).await.unwrap();
        let second = store.load("carvery").await.unwrap().unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_invalid_record_skipped_others_written() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let mut nameless = record("");
        nameless.name = String::new();

        let batch = vec![record("Carvery"), nameless, record("Dash")];
        let report = store.upsert_batch(&batch).await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.written, 2);
        assert!(store.load("carvery").await.unwrap().is_some());
        assert!(store.load("dash").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_placeholder_name_skipped() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let report = store.upsert_batch(&[record("Locations")]).await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.written, 0);
    }

    #[tokio::test]
    async fn test_missing_coordinates_skipped() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let mut bad = record("Carvery");
        bad.coordinates = None;

        let report = store.upsert_batch(&[bad]).await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.written, 0);
    }

    #[tokio::test]
    async fn test_crowd_level_clamped_on_write() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let mut wild = record("Carvery");
        wild.crowd_level = Some(250);

        store.upsert_batch(&[wild]).await.unwrap();
        let stored = store.load("carvery").await.unwrap().unwrap();
        assert_eq!(stored.crowd_level, Some(100));
    }

    #[tokio::test]
    async fn test_batching_counts() {
        let tmp = TempDir::new().unwrap();
        let config = StoreConfig {
            batch_size: 2,
            ..StoreConfig::default()
        };
        let store = LocalStore::new(tmp.path(), config);

        let batch = vec![record("A1"), record("B2"), record("C3")];
        let report = store.upsert_batch(&batch).await.unwrap();

        assert_eq!(report.written, 3);
        assert_eq!(report.committed_batches, 2);
        assert_eq!(report.failed_batches, 0);
    }

    #[tokio::test]
    async fn test_export_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let records = vec![record("Carvery")];
        let summary = ScrapeSummary::from_records(
            &records,
            chrono::DateTime::parse_from_rfc3339("2025-10-04T12:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        );

        store.write_export(&records, &summary).await.unwrap();

        let loaded = store.load_export().await.unwrap();
        assert_eq!(loaded, records);

        let loaded_summary = store.load_summary().await.unwrap().unwrap();
        assert_eq!(loaded_summary.total_locations, 1);
    }
}
