// src/models/mod.rs

//! Domain models for the dining crawler.
//!
//! This module contains all data structures used throughout the
//! application, organized by their primary purpose.

mod config;
mod record;
mod schedule;
mod summary;
mod venue;

// Re-export all public types
pub use config::{
    BuildingCoordinate, Config, CrawlerConfig, GeoConfig, LandmarkHint, ListingConfig,
    SourceConfig, StoreConfig, TagConfig, TagKeyword,
};
pub use record::{CanonicalRecord, GeoPoint, LiveMenuEntry, MenuNode, MenuTree, Status};
pub use schedule::{open_state, OpenState, ScheduleEntry};
pub use summary::{LocationSummary, ScrapeSummary};
pub use venue::{Concept, Venue};
