// src/models/summary.rs

//! Run summary artifact written alongside the record array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CanonicalRecord, GeoPoint};

/// Per-location line of the run summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    pub name: String,
    pub building: String,
    pub coordinates: Option<GeoPoint>,
    pub has_hours: bool,
    pub has_detailed_menu: bool,
    pub has_grubhub: bool,
}

/// Summary object for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeSummary {
    pub total_locations: usize,

    /// Unique buildings in first-seen order
    pub buildings: Vec<String>,

    /// ISO-8601 timestamp of the run
    pub scrape_date: DateTime<Utc>,

    pub locations: Vec<LocationSummary>,
}

impl ScrapeSummary {
    /// Build the summary for a batch of assembled records.
    pub fn from_records(records: &[CanonicalRecord], scrape_date: DateTime<Utc>) -> Self {
        let mut buildings: Vec<String> = Vec::new();
        for record in records {
            if !buildings.contains(&record.building) {
                buildings.push(record.building.clone());
            }
        }

        let locations = records
            .iter()
            .map(|record| LocationSummary {
                name: record.name.clone(),
                building: record.building.clone(),
                coordinates: record.coordinates,
                has_hours: record.hours.as_ref().is_some_and(|h| !h.is_empty()),
                has_detailed_menu: record
                    .detailed_menu
                    .as_ref()
                    .is_some_and(|m| !m.is_empty()),
                has_grubhub: record.has_grubhub.unwrap_or(false),
            })
            .collect();

        Self {
            total_locations: records.len(),
            buildings,
            scrape_date,
            locations,
        }
    }
}
