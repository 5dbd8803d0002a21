// src/services/listing.rs

//! Venue listing page parser.
//!
//! Splits the listing document into per-venue sections at top-level
//! heading boundaries and extracts each venue's description, concept
//! links, and coordinate hint.

use crate::models::{Concept, GeoConfig, ListingConfig, Venue};
use crate::services::markup::{Token, tokenize};

/// Parser for the venue listing page.
pub struct ListingParser<'a> {
    listing: &'a ListingConfig,
    geo: &'a GeoConfig,
    concept_path: &'a str,
}

impl<'a> ListingParser<'a> {
    pub fn new(listing: &'a ListingConfig, geo: &'a GeoConfig, concept_path: &'a str) -> Self {
        Self {
            listing,
            geo,
            concept_path,
        }
    }

    /// Parse the listing document into venues.
    pub fn parse(&self, html: &str) -> Vec<Venue> {
        let tokens = tokenize(html);
        let mut venues = Vec::new();

        for section in split_sections(&tokens) {
            if let Some(venue) = self.parse_section(section) {
                venues.push(venue);
            }
        }

        venues
    }

    fn parse_section(&self, section: &[Token]) -> Option<Venue> {
        let Some(Token::Heading { text: name, .. }) = section.first() else {
            return None;
        };
        let name = name.clone();

        if self.listing.skip_headings.iter().any(|h| h == &name) {
            return None;
        }

        let description = section
            .iter()
            .find_map(|token| match token {
                Token::Paragraph(text) if !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_default();

        let concepts = self.extract_concepts(section);

        // A concept-less section is kept only when its heading still reads
        // as a dining venue; it may gain concepts in a later listing.
        let dining_heading = self
            .listing
            .venue_keywords
            .iter()
            .any(|keyword| name.contains(keyword.as_str()));
        if concepts.is_empty() && !dining_heading {
            return None;
        }

        let coordinates = self.geo.resolve(&name, &description);

        Some(Venue {
            name,
            description,
            coordinates,
            concepts,
        })
    }

    fn extract_concepts(&self, section: &[Token]) -> Vec<Concept> {
        let mut concepts: Vec<Concept> = Vec::new();

        for (idx, token) in section.iter().enumerate() {
            let Token::Link { href, text, .. } = token else {
                continue;
            };
            if !self.is_concept_link(href) || text.is_empty() {
                continue;
            }

            // Deduplicate by concept name within the section
            if concepts.iter().any(|c| c.name == *text) {
                continue;
            }

            // The paragraph after the link carries the short description
            let description = section[idx + 1..]
                .iter()
                .find_map(|t| match t {
                    Token::Paragraph(p) => Some(p.clone()),
                    _ => None,
                })
                .unwrap_or_default();

            concepts.push(Concept {
                name: text.clone(),
                url: href.clone(),
                description,
            });
        }

        concepts
    }

    fn is_concept_link(&self, href: &str) -> bool {
        href.contains(self.concept_path) && href.ends_with(".html")
    }
}

/// Split a token stream into sections at each `<h2>` boundary. Tokens
/// before the first heading belong to no section.
fn split_sections(tokens: &[Token]) -> Vec<&[Token]> {
    let boundaries: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| match t {
            Token::Heading { level: 2, .. } => Some(i),
            _ => None,
        })
        .collect();

    boundaries
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = boundaries.get(n + 1).copied().unwrap_or(tokens.len());
            &tokens[start..end]
        })
        .collect()
}
