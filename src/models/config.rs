// src/models/config.rs

//! Application configuration structures.
//!
//! Every table the parsers match against (skip headings, dining keywords,
//! coordinate lookups, landmark hints, tag keywords, placeholder names)
//! is configuration data injected into the components, so tests can
//! substitute fixtures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::GeoPoint;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Source document URLs
    #[serde(default)]
    pub source: SourceConfig,

    /// Listing page section rules
    #[serde(default)]
    pub listing: ListingConfig,

    /// Coordinate resolution tables
    #[serde(default)]
    pub geo: GeoConfig,

    /// Menu tag derivation tables
    #[serde(default)]
    pub tags: TagConfig,

    /// Persistence settings
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.source.listing_url.trim().is_empty() {
            return Err(AppError::validation("source.listing_url is empty"));
        }
        if self.source.hours_url.trim().is_empty() {
            return Err(AppError::validation("source.hours_url is empty"));
        }
        if self.source.concept_path.trim().is_empty() {
            return Err(AppError::validation("source.concept_path is empty"));
        }
        if self.store.batch_size == 0 {
            return Err(AppError::validation("store.batch_size must be > 0"));
        }
        if !(0..=100).contains(&self.store.initial_crowd_level) {
            return Err(AppError::validation(
                "store.initial_crowd_level must be within 0..=100",
            ));
        }
        if self.tags.keywords.is_empty() {
            return Err(AppError::validation("No tag keywords defined"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            source: SourceConfig::default(),
            listing: ListingConfig::default(),
            geo: GeoConfig::default(),
            tags: TagConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between concept detail fetches in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Source document locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL used to resolve site-relative links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Venue listing page
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Weekly hours page
    #[serde(default = "defaults::hours_url")]
    pub hours_url: String,

    /// Path segment identifying concept detail links
    #[serde(default = "defaults::concept_path")]
    pub concept_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            listing_url: defaults::listing_url(),
            hours_url: defaults::hours_url(),
            concept_path: defaults::concept_path(),
        }
    }
}

/// Listing page section rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Headings that are navigational/marketing, not venues
    #[serde(default = "defaults::skip_headings")]
    pub skip_headings: Vec<String>,

    /// Keywords that keep a concept-less section as a venue
    #[serde(default = "defaults::venue_keywords")]
    pub venue_keywords: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            skip_headings: defaults::skip_headings(),
            venue_keywords: defaults::venue_keywords(),
        }
    }
}

/// A named building coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingCoordinate {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Keyword-based coordinate hint: all keywords must appear in the venue
/// description for the hint to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkHint {
    pub keywords: Vec<String>,
    pub lat: f64,
    pub lng: f64,
}

/// Coordinate resolution tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Known building name -> coordinate table
    #[serde(default = "defaults::building_coordinates")]
    pub buildings: Vec<BuildingCoordinate>,

    /// Street/landmark phrase hints tried after the name lookup
    #[serde(default = "defaults::landmark_hints")]
    pub landmarks: Vec<LandmarkHint>,

    /// Final fallback: campus center
    #[serde(default = "defaults::campus_center")]
    pub campus_center: GeoPoint,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            buildings: defaults::building_coordinates(),
            landmarks: defaults::landmark_hints(),
            campus_center: defaults::campus_center(),
        }
    }
}

impl GeoConfig {
    /// Resolve a venue's coordinates: exact name lookup, then landmark
    /// hints over the description, then the campus center. Total by
    /// construction.
    pub fn resolve(&self, venue_name: &str, description: &str) -> GeoPoint {
        if let Some(found) = self
            .buildings
            .iter()
            .find(|b| b.name == venue_name)
        {
            return GeoPoint {
                lat: found.lat,
                lng: found.lng,
            };
        }

        for hint in &self.landmarks {
            if !hint.keywords.is_empty()
                && hint.keywords.iter().all(|k| description.contains(k.as_str()))
            {
                return GeoPoint {
                    lat: hint.lat,
                    lng: hint.lng,
                };
            }
        }

        self.campus_center
    }
}

/// One keyword to display-tag mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagKeyword {
    /// Lowercase keyword searched in the description
    pub keyword: String,

    /// Display tag appended when the keyword matches
    pub tag: String,
}

/// Menu tag derivation tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    /// Ordered keyword -> display tag table
    #[serde(default = "defaults::tag_keywords")]
    pub keywords: Vec<TagKeyword>,

    /// Tag used when nothing else matched
    #[serde(default = "defaults::fallback_tag")]
    pub fallback_tag: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            keywords: defaults::tag_keywords(),
            fallback_tag: defaults::fallback_tag(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum records per store commit
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Seed crowd level for freshly discovered concepts
    #[serde(default = "defaults::initial_crowd_level")]
    pub initial_crowd_level: i64,

    /// Names that mark a record as a parsing artifact, not a location
    #[serde(default = "defaults::placeholder_names")]
    pub placeholder_names: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            initial_crowd_level: defaults::initial_crowd_level(),
            placeholder_names: defaults::placeholder_names(),
        }
    }
}

mod defaults {
    use super::{BuildingCoordinate, LandmarkHint, TagKeyword};
    use crate::models::GeoPoint;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        500
    }

    // Source defaults
    pub fn base_url() -> String {
        "https://dining.okstate.edu".into()
    }
    pub fn listing_url() -> String {
        "https://dining.okstate.edu/locations/".into()
    }
    pub fn hours_url() -> String {
        "https://dining.okstate.edu/hours/fall-hours.html".into()
    }
    pub fn concept_path() -> String {
        "/locations/".into()
    }

    // Listing defaults
    pub fn skip_headings() -> Vec<String> {
        vec![
            "Our Locations".into(),
            "We're Serious About Food.".into(),
            "Dining Hours".into(),
        ]
    }
    pub fn venue_keywords() -> Vec<String> {
        vec![
            "Market".into(),
            "Dining".into(),
            "Dairy Bar".into(),
            "Café".into(),
            "Brews".into(),
        ]
    }

    // Geo defaults
    pub fn building_coordinates() -> Vec<BuildingCoordinate> {
        fn coord(name: &str, lat: f64, lng: f64) -> BuildingCoordinate {
            BuildingCoordinate {
                name: name.to_string(),
                lat,
                lng,
            }
        }

        vec![
            coord("Adams Market", 36.1285, -97.0673),
            coord("Bennett Hall", 36.1260, -97.0680),
            coord("Central Market Place", 36.1300, -97.0650),
            coord("North Dining", 36.1285, -97.0673),
            coord("Student Union", 36.1250, -97.0650),
            coord("Larry & Kay's Dairy Bar", 36.1250, -97.0680),
            coord("Café Libro", 36.1250, -97.0650),
            coord("Barkin' Brews", 36.1300, -97.0700),
            coord("Agricultural Hall", 36.1250, -97.0680),
            coord("McElroy Hall", 36.1300, -97.0700),
        ]
    }

    pub fn landmark_hints() -> Vec<LandmarkHint> {
        vec![
            LandmarkHint {
                keywords: vec!["Hall of Fame".into(), "Monroe".into()],
                lat: 36.1285,
                lng: -97.0673,
            },
            LandmarkHint {
                keywords: vec!["Farm Road".into()],
                lat: 36.1300,
                lng: -97.0650,
            },
            LandmarkHint {
                keywords: vec!["University Avenue".into(), "Hester".into()],
                lat: 36.1250,
                lng: -97.0650,
            },
        ]
    }

    pub fn campus_center() -> GeoPoint {
        GeoPoint {
            lat: 36.1285,
            lng: -97.0673,
        }
    }

    // Tag defaults
    pub fn tag_keywords() -> Vec<TagKeyword> {
        fn kw(keyword: &str, tag: &str) -> TagKeyword {
            TagKeyword {
                keyword: keyword.to_string(),
                tag: tag.to_string(),
            }
        }

        vec![
            kw("pizza", "Pizza"),
            kw("burgers", "Burgers"),
            kw("salads", "Salads"),
            kw("sandwiches", "Sandwiches"),
            kw("coffee", "Coffee"),
            kw("starbucks", "Starbucks Coffee"),
            kw("chicken", "Chicken"),
            kw("nuggets", "Chicken Nuggets"),
            kw("waffle fries", "Waffle Fries"),
            kw("fries", "Fries"),
            kw("pasta", "Pasta"),
            kw("calzones", "Calzones"),
            kw("smoothies", "Smoothies"),
            kw("cookies", "Cookies"),
            kw("ice cream", "Ice Cream"),
            kw("milkshakes", "Milkshakes"),
            kw("milk shakes", "Milkshakes"),
            kw("breakfast", "Breakfast"),
            kw("lunch", "Lunch"),
            kw("sushi", "Sushi"),
            kw("deli", "Deli"),
            kw("grill", "Grill"),
            kw("bakery", "Bakery"),
            kw("soup", "Soup"),
            kw("tomato soup", "Tomato Soup"),
            kw("tacos", "Tacos"),
            kw("noodles", "Noodles"),
            kw("wings", "Wings"),
            kw("boneless wings", "Boneless Wings"),
            kw("mac and cheese", "Mac and Cheese"),
            kw("mac & cheese", "Mac and Cheese"),
            kw("vegan", "Vegan Options"),
            kw("vegetarian", "Vegetarian Options"),
            kw("gluten-friendly", "Gluten-Friendly"),
            kw("allergen-friendly", "Allergen-Friendly"),
            kw("gourmet", "Gourmet"),
            kw("grab-and-go", "Grab-and-Go"),
            kw("snacks", "Snacks"),
            kw("beverages", "Beverages"),
            kw("frozen custard", "Frozen Custard"),
            kw("queso", "Queso"),
            kw("guacamole", "Guacamole"),
            kw("nachos", "Nachos"),
            kw("chips and salsa", "Chips and Salsa"),
            kw("bowl-ritos", "Bowl-ritos"),
            kw("mediterranean", "Mediterranean"),
            kw("grocery", "Grocery Items"),
            kw("necessities", "Campus Necessities"),
            kw("grilled cheese", "Grilled Cheese"),
            kw("homestyle", "Homestyle"),
            kw("local ingredients", "Local Ingredients"),
            kw("meal replacement shakes", "Meal Replacement Shakes"),
            kw("cold-brew", "Cold-Brew Coffee"),
            kw("hand-carved meats", "Hand-Carved Meats"),
            kw("gourmet sides", "Gourmet Sides"),
        ]
    }

    pub fn fallback_tag() -> String {
        "Various options".into()
    }

    // Store defaults
    pub fn batch_size() -> usize {
        500
    }
    pub fn initial_crowd_level() -> i64 {
        50
    }
    pub fn placeholder_names() -> Vec<String> {
        vec!["Locations".into()]
    }
}
