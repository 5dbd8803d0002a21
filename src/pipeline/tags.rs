// src/pipeline/tags.rs

//! Menu tag derivation.
//!
//! Produces the flat, deduplicated tag list shown on the map and fed to
//! the recommendation engine: cuisine tags, then keyword matches from
//! the listing description, then detailed-menu category names.

use crate::models::{MenuTree, TagConfig};

/// Extractor over the configured keyword table.
pub struct MenuTagExtractor<'a> {
    config: &'a TagConfig,
}

impl<'a> MenuTagExtractor<'a> {
    pub fn new(config: &'a TagConfig) -> Self {
        Self { config }
    }

    /// Derive tags in insertion order. Never empty: a concept with no
    /// matches gets the configured fallback tag.
    pub fn extract(&self, description: &str, menu: &MenuTree, cuisine: &[String]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();

        for tag in cuisine {
            if !tag.is_empty() && !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }

        let lowered = description.to_lowercase();
        for entry in &self.config.keywords {
            if lowered.contains(entry.keyword.as_str()) && !tags.contains(&entry.tag) {
                tags.push(entry.tag.clone());
            }
        }

        for category in menu.keys() {
            let tag = title_case(category);
            if tag.chars().count() > 2 && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        if tags.is_empty() {
            tags.push(self.config.fallback_tag.clone());
        }

        tags
    }
}

/// First character uppercased, the rest lowercased.
fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
