// src/services/mod.rs

//! Fetching and parsing services.
//!
//! Each source document gets its own parser; all of them match against
//! the typed token stream from [`markup`] rather than raw pattern
//! strings.

pub mod detail;
pub mod fetcher;
pub mod hours;
pub mod listing;
pub mod markup;

pub use detail::{ConceptDetail, DetailPageParser};
pub use fetcher::Fetcher;
pub use hours::{HoursTable, HoursTableParser};
pub use listing::ListingParser;
