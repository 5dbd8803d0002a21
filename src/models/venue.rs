// src/models/venue.rs

//! Venue and concept structures produced by the listing parser.

use serde::{Deserialize, Serialize};

use crate::models::GeoPoint;

/// A building-level grouping of serving concepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Venue {
    /// Building name, e.g. "Student Union"
    pub name: String,

    /// First descriptive paragraph from the listing section
    pub description: String,

    /// Coordinate hint resolved through the configured fallback chain
    pub coordinates: GeoPoint,

    /// Serving concepts discovered inside this section
    pub concepts: Vec<Concept>,
}

/// One named serving point within a venue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Concept {
    /// Display name from the listing anchor text
    pub name: String,

    /// Detail page URL as found in the listing (possibly site-relative)
    pub url: String,

    /// Short description inherited from the listing context
    pub description: String,
}

impl Venue {
    /// Count concepts across a set of venues.
    pub fn total_concepts(venues: &[Venue]) -> usize {
        venues.iter().map(|v| v.concepts.len()).sum()
    }
}
