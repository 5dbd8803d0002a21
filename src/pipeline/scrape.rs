// src/pipeline/scrape.rs

//! Scrape orchestration.
//!
//! Sequential, single-pass: fetch the listing, fetch the hours table,
//! then walk each discovered concept fetching its detail page with a
//! politeness delay between fetches, reconciling hours and deriving tags
//! along the way. A failed listing or hours fetch aborts the run; a
//! failed detail fetch degrades that one record.

use std::time::Duration;

use crate::error::Result;
use crate::models::{CanonicalRecord, Concept, Config, ScheduleEntry, ScrapeSummary, Status, Venue};
use crate::pipeline::{MenuTagExtractor, reconcile_hours};
use crate::services::{ConceptDetail, DetailPageParser, Fetcher, HoursTableParser, ListingParser};
use crate::utils::resolve_url;
use crate::utils::time::{Clock, Pacer};

/// Result of one scrape run.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub records: Vec<CanonicalRecord>,
    pub summary: ScrapeSummary,
    pub venue_count: usize,
    pub detail_total: usize,
    pub detail_failures: usize,
    pub hours_matched: usize,
}

/// Run the extraction pipeline end to end, producing the record batch
/// and run summary.
pub async fn run_scrape(
    config: &Config,
    fetcher: &Fetcher,
    pacer: &dyn Pacer,
    clock: &dyn Clock,
) -> Result<ScrapeOutcome> {
    // Step 1: venue listing (fatal on failure)
    log::info!("Fetching venue listing from {}", config.source.listing_url);
    let listing_html = fetcher.fetch_text(&config.source.listing_url).await?;
    let listing_parser =
        ListingParser::new(&config.listing, &config.geo, &config.source.concept_path);
    let venues = listing_parser.parse(&listing_html);
    log::info!(
        "Found {} venues with {} total concepts",
        venues.len(),
        Venue::total_concepts(&venues)
    );

    // Step 2: weekly hours (fatal on failure)
    log::info!("Fetching hours page from {}", config.source.hours_url);
    let hours_html = fetcher.fetch_text(&config.source.hours_url).await?;
    let hours_table = HoursTableParser::new(&config.source.concept_path).parse(&hours_html);
    log::info!("Hours table holds {} name variants", hours_table.key_count());

    // Step 3: per-concept detail pages, sequential with politeness delay
    let detail_parser = DetailPageParser::new();
    let tag_extractor = MenuTagExtractor::new(&config.tags);
    let delay = Duration::from_millis(config.crawler.request_delay_ms);

    let mut records = Vec::new();
    let mut detail_total = 0;
    let mut detail_failures = 0;
    let mut hours_matched = 0;

    for venue in &venues {
        for concept in &venue.concepts {
            detail_total += 1;
            log::debug!("Scraping {} ({})", concept.name, concept.url);

            let detail_url = resolve_url(&config.source.base_url, &concept.url);
            let detail = match fetcher.fetch_text(&detail_url).await {
                Ok(html) => Some(detail_parser.parse(&html)),
                Err(error) => {
                    detail_failures += 1;
                    log::warn!("Could not scrape {}: {}", concept.url, error);
                    None
                }
            };

            let hours = reconcile_hours(&hours_table, &concept.name, &concept.url);
            if !hours.is_empty() {
                hours_matched += 1;
            }

            records.push(assemble_record(
                config,
                venue,
                concept,
                detail.as_ref(),
                hours,
                &tag_extractor,
            ));

            pacer.pause(delay).await;
        }
    }

    let summary = ScrapeSummary::from_records(&records, clock.now());

    log::info!(
        "Assembled {} records ({} detail failures, {} with hours)",
        records.len(),
        detail_failures,
        hours_matched
    );

    Ok(ScrapeOutcome {
        records,
        summary,
        venue_count: venues.len(),
        detail_total,
        detail_failures,
        hours_matched,
    })
}

/// Assemble the canonical record for one concept.
///
/// `status` and `crowd_level` are initial seeds only; the store keeps the
/// sensor-owned values once a document exists. `live_menu` is never set
/// here.
fn assemble_record(
    config: &Config,
    venue: &Venue,
    concept: &Concept,
    detail: Option<&ConceptDetail>,
    hours: Vec<ScheduleEntry>,
    tag_extractor: &MenuTagExtractor<'_>,
) -> CanonicalRecord {
    let empty_detail = ConceptDetail::default();
    let detail = detail.unwrap_or(&empty_detail);

    let official_menu =
        tag_extractor.extract(&concept.description, &detail.detailed_menu, &detail.cuisine);

    let description = if detail.full_description.is_empty() {
        concept.description.clone()
    } else {
        detail.full_description.clone()
    };

    CanonicalRecord {
        name: concept.name.clone(),
        building: venue.name.clone(),
        coordinates: Some(venue.coordinates),
        status: Some(Status::Open),
        crowd_level: Some(config.store.initial_crowd_level),
        official_menu,
        live_menu: None,
        description,
        url: concept.url.clone(),
        map_link: detail.map_link.clone(),
        has_grubhub: detail.has_grubhub.then_some(true),
        cuisine: (!detail.cuisine.is_empty()).then(|| detail.cuisine.clone()),
        hours: (!hours.is_empty()).then_some(hours),
        detailed_menu: (!detail.detailed_menu.is_empty()).then(|| detail.detailed_menu.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, MenuTree};

    fn venue() -> Venue {
        Venue {
            name: "Student Union".to_string(),
            description: "South side of campus.".to_string(),
            coordinates: GeoPoint {
                lat: 36.1250,
                lng: -97.0650,
            },
            concepts: vec![],
        }
    }

    fn concept() -> Concept {
        Concept {
            name: "Mambo Italiano".to_string(),
            url: "/locations/mambo-italiano.html".to_string(),
            description: "Pasta and calzones.".to_string(),
        }
    }

    #[test]
    fn test_assemble_without_detail() {
        let config = Config::default();
        let extractor = MenuTagExtractor::new(&config.tags);

        let record = assemble_record(&config, &venue(), &concept(), None, vec![], &extractor);

        assert_eq!(record.name, "Mambo Italiano");
        assert_eq!(record.building, "Student Union");
        assert!(record.coordinates.is_some());
        assert_eq!(record.status, Some(Status::Open));
        assert_eq!(record.crowd_level, Some(50));
        assert_eq!(record.description, "Pasta and calzones.");
        assert!(record.live_menu.is_none());
        assert!(record.cuisine.is_none());
        assert!(record.has_grubhub.is_none());
        assert!(record.hours.is_none());
        assert!(record.detailed_menu.is_none());
        // Description keywords still produce tags
        assert!(record.official_menu.contains(&"Pasta".to_string()));
        assert!(record.official_menu.contains(&"Calzones".to_string()));
    }

    #[test]
    fn test_record_assembly_is_deterministic() {
        let config = Config::default();

        let listing_html = r#"
            <h2>Student Union</h2>
            <p>On University Avenue near Hester Street.</p>
            <p><a href="/locations/mambo-italiano.html">Mambo Italiano</a></p>
            <p>Pasta and calzones.</p>
            <h2>North Dining</h2>
            <p>Across from the Hall of Fame on Monroe.</p>
            <p><a href="/locations/carvery.html">Carvery</a></p>
            <p>Hand-carved meats daily.</p>
        "#;
        let hours_html = r#"
            <table>
                <tr><td><a href="/locations/carvery.html"><strong>Carvery</strong></a></td><td></td></tr>
                <tr><td>Monday - Thursday</td><td>8 a.m. to 11 p.m.</td></tr>
            </table>
        "#;

        let build = || {
            let listing_parser =
                ListingParser::new(&config.listing, &config.geo, &config.source.concept_path);
            let venues = listing_parser.parse(listing_html);
            let hours_table =
                HoursTableParser::new(&config.source.concept_path).parse(hours_html);
            let extractor = MenuTagExtractor::new(&config.tags);

            let mut records = Vec::new();
            for venue in &venues {
                for concept in &venue.concepts {
                    let hours = reconcile_hours(&hours_table, &concept.name, &concept.url);
                    records.push(assemble_record(
                        &config, venue, concept, None, hours, &extractor,
                    ));
                }
            }
            records
        };

        let first = build();
        let second = build();

        // Byte-for-byte identical output for identical inputs
        assert_eq!(
            serde_json::to_string_pretty(&first).unwrap(),
            serde_json::to_string_pretty(&second).unwrap()
        );

        // Coordinate fallback chain is total
        assert!(first.iter().all(|r| r.coordinates.is_some()));

        // Hours were reconciled across the two documents
        let carvery = first.iter().find(|r| r.name == "Carvery").unwrap();
        assert_eq!(carvery.hours.as_ref().unwrap().len(), 1);
        let mambo = first.iter().find(|r| r.name == "Mambo Italiano").unwrap();
        assert!(mambo.hours.is_none());
    }

    #[test]
    fn test_assemble_with_detail() {
        let config = Config::default();
        let extractor = MenuTagExtractor::new(&config.tags);

        let mut menu = MenuTree::new();
        menu.insert(
            "Pasta".to_string(),
            crate::models::MenuNode::Items(vec!["Spaghetti".to_string()]),
        );
        let detail = ConceptDetail {
            cuisine: vec!["Italian".to_string()],
            has_grubhub: true,
            map_link: Some("https://map.example.edu/?q=union".to_string()),
            full_description: "Authentic pasta in the Union.".to_string(),
            detailed_menu: menu,
        };

        let hours = vec![ScheduleEntry {
            day: "Daily".to_string(),
            hours: "8 a.m. to 2 p.m.".to_string(),
        }];

        let record = assemble_record(
            &config,
            &venue(),
            &concept(),
            Some(&detail),
            hours,
            &extractor,
        );

        assert_eq!(record.description, "Authentic pasta in the Union.");
        assert_eq!(record.cuisine.as_deref(), Some(&["Italian".to_string()][..]));
        assert_eq!(record.has_grubhub, Some(true));
        assert!(record.map_link.is_some());
        assert_eq!(record.hours.as_ref().unwrap().len(), 1);
        assert!(record.detailed_menu.is_some());
        assert_eq!(record.official_menu[0], "Italian");
    }
}
