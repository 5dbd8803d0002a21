// src/pipeline/reconcile.rs

//! Concept name reconciliation.
//!
//! The listing page and the hours page share no identifiers, so a
//! concept's schedule is found by trying an ordered chain of normalized
//! name variants against the hours table. First non-empty hit wins; a
//! name that matches no variant simply has no hours, which is a data gap
//! rather than an error.

use crate::models::ScheduleEntry;
use crate::services::HoursTable;
use crate::utils::concept_url_slug;

/// The ordered lookup chain for a concept name and its source URL.
///
/// Deterministic normalization, not fuzzy distance: uppercased exact
/// name, URL-slug words, punctuation stripped, "&" spelled out,
/// whitespace collapsed.
pub fn name_variants(name: &str, url: &str) -> Vec<String> {
    let upper = name.to_uppercase();
    let mut variants = vec![upper.clone()];

    if let Some(slug) = concept_url_slug(url) {
        variants.push(slug.replace('-', " ").to_uppercase());
    }

    variants.push(upper.replace(['.', ','], ""));
    variants.push(upper.replace('&', "AND"));
    variants.push(upper.split_whitespace().collect::<Vec<_>>().join(" "));

    variants
}

/// Find the best-matching schedule for a concept, or empty when no
/// variant matches.
pub fn reconcile_hours(table: &HoursTable, name: &str, url: &str) -> Vec<ScheduleEntry> {
    for variant in name_variants(name, url) {
        if let Some(entries) = table.get(&variant) {
            if !entries.is_empty() {
                return entries.to_vec();
            }
        }
    }
    Vec::new()
}
