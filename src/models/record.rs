// src/models/record.rs

//! Canonical location record and its merge semantics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ScheduleEntry;
use crate::utils::slugify;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Open/closed state of a location, as stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Closed,
}

/// A crowd-submitted menu sighting. Owned by the crowdsourcing feature;
/// this pipeline never writes entries, only preserves them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiveMenuEntry {
    pub item: String,
    pub author: String,
    pub time: String,
}

/// One node of a detailed menu: either a flat run of items or a mapping
/// of subcategory name to further nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MenuNode {
    Items(Vec<String>),
    Groups(BTreeMap<String, MenuNode>),
}

/// Detailed menu: category name to node. Ordered keys keep the
/// serialized form stable across runs.
pub type MenuTree = BTreeMap<String, MenuNode>;

/// The unit persisted per serving concept.
///
/// Field names follow the store contract shared with the map UI, the
/// admin console, and the sensor update endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    /// Concept display name; its slug is the store document identity
    #[serde(default)]
    pub name: String,

    /// Building-level venue the concept serves from
    #[serde(default)]
    pub building: String,

    /// Always present on pipeline output; optional here so imported
    /// documents missing it can be detected and skipped at write time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,

    /// Sensor/admin-owned once the document exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Sensor/admin-owned once the document exists; clamped to [0,100]
    /// before persistence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crowd_level: Option<i64>,

    /// Flat deduplicated tag list derived from descriptions and menus
    #[serde(default)]
    pub official_menu: Vec<String>,

    /// Crowd-submitted sightings; never written by this pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_menu: Option<Vec<LiveMenuEntry>>,

    #[serde(default)]
    pub description: String,

    /// Source URL of the concept detail page
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_grubhub: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Vec<ScheduleEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_menu: Option<MenuTree>,
}

impl CanonicalRecord {
    /// Store document identity derived from the concept name.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Clamp a crowd level into the valid range.
    pub fn clamp_crowd_level(level: i64) -> i64 {
        level.clamp(0, 100)
    }

    /// Reason this record must not be written, if any.
    ///
    /// A record is rejected when its name is empty or a known placeholder
    /// heading, its slug derives empty, or its coordinates are absent.
    pub fn write_rejection(&self, placeholder_names: &[String]) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("missing name".to_string());
        }
        if placeholder_names.iter().any(|p| p == &self.name) {
            return Some(format!("placeholder name '{}'", self.name));
        }
        if self.slug().is_empty() {
            return Some(format!("name '{}' yields an empty slug", self.name));
        }
        if self.coordinates.is_none() {
            return Some("missing coordinates".to_string());
        }
        None
    }

    /// Field-wise merge of this freshly assembled record over the stored
    /// document, producing the document to persist.
    ///
    /// Pipeline-owned fields overwrite (optional ones only when present);
    /// collaborator-owned fields (`status`, `crowd_level`, `live_menu`)
    /// keep the stored value when the document already exists and are
    /// seeded only on first creation, so sensor updates and crowdsourced
    /// entries survive re-import.
    pub fn merge_over(&self, stored: Option<&CanonicalRecord>, default_crowd_level: i64) -> CanonicalRecord {
        let mut merged = match stored {
            Some(existing) => {
                let mut doc = existing.clone();
                doc.name = self.name.clone();
                doc.building = self.building.clone();
                doc.description = self.description.clone();
                doc.url = self.url.clone();
                doc.official_menu = self.official_menu.clone();
                if self.coordinates.is_some() {
                    doc.coordinates = self.coordinates;
                }
                if self.map_link.is_some() {
                    doc.map_link = self.map_link.clone();
                }
                if self.has_grubhub.is_some() {
                    doc.has_grubhub = self.has_grubhub;
                }
                if self.cuisine.is_some() {
                    doc.cuisine = self.cuisine.clone();
                }
                if self.hours.is_some() {
                    doc.hours = self.hours.clone();
                }
                if self.detailed_menu.is_some() {
                    doc.detailed_menu = self.detailed_menu.clone();
                }
                doc
            }
            None => {
                let mut doc = self.clone();
                doc.status = Some(doc.status.unwrap_or(Status::Open));
                doc.crowd_level = Some(doc.crowd_level.unwrap_or(default_crowd_level));
                doc.live_menu = Some(doc.live_menu.take().unwrap_or_default());
                doc
            }
        };

        if let Some(level) = merged.crowd_level {
            merged.crowd_level = Some(Self::clamp_crowd_level(level));
        }

        merged
    }
}
