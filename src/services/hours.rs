// src/services/hours.rs

//! Weekly hours table parser.
//!
//! The hours page is authored independently of the listing page and
//! shares no identifiers with it, only concept names and URL slugs. Each
//! concept's schedule is therefore stored under several normalized name
//! variants, which is what makes reconciliation possible downstream.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::ScheduleEntry;
use crate::services::markup::{RowAnchor, Token, tokenize};
use crate::utils::concept_url_slug;

/// Day cell must name a weekday or one of the recognized day words.
static DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(monday|tuesday|wednesday|thursday|friday|saturday|sunday|daily|weekday|weekend|closed)")
        .expect("day pattern")
});

/// Time cell must carry a digit, a meridiem, or "Closed".
static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]|a\.?m\.?|p\.?m\.?|closed)").expect("time pattern"));

/// A clock expression: digits followed by a meridiem.
static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9]\s*(a\.?m\.?|p\.?m\.?)").expect("time-of-day pattern"));

/// Schedules keyed by concept-name variant.
#[derive(Debug, Clone, Default)]
pub struct HoursTable {
    entries: HashMap<String, Vec<ScheduleEntry>>,
}

impl HoursTable {
    /// Look up a schedule under one exact key.
    pub fn get(&self, key: &str) -> Option<&[ScheduleEntry]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Number of keys (variants included).
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a concept's schedule under its name and derived variants.
    ///
    /// The uppercased anchor text and the slug-derived key overwrite;
    /// punctuation/ampersand/whitespace normalizations only fill free
    /// slots.
    fn insert_concept(
        &mut self,
        name_upper: &str,
        url_slug: Option<&str>,
        schedule: Vec<ScheduleEntry>,
    ) {
        self.entries
            .insert(name_upper.to_string(), schedule.clone());

        if let Some(slug) = url_slug {
            let slug_key = slug.replace('-', " ").to_uppercase();
            if slug_key != name_upper {
                self.entries.insert(slug_key, schedule.clone());
            }
        }

        let variations = [
            name_upper.split_whitespace().collect::<Vec<_>>().join(" "),
            name_upper.replace(['.', ','], ""),
            name_upper.replace('&', "AND"),
        ];
        for variation in variations {
            if variation != name_upper && !self.entries.contains_key(&variation) {
                self.entries.insert(variation, schedule.clone());
            }
        }
    }
}

/// Parser for the weekly hours page.
pub struct HoursTableParser<'a> {
    concept_path: &'a str,
}

impl<'a> HoursTableParser<'a> {
    pub fn new(concept_path: &'a str) -> Self {
        Self { concept_path }
    }

    /// Parse the hours document into a multi-keyed schedule table.
    pub fn parse(&self, html: &str) -> HoursTable {
        let tokens = tokenize(html);
        let mut table = HoursTable::default();

        for rows in table_blocks(&tokens) {
            self.parse_table(&rows, &mut table);
        }

        table
    }

    fn parse_table(&self, rows: &[(&Vec<String>, &Option<RowAnchor>)], out: &mut HoursTable) {
        // Rows between one concept anchor and the next belong to that concept
        let anchor_rows: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, (_, anchor))| {
                anchor
                    .as_ref()
                    .is_some_and(|a| a.emphasized && a.href.contains(self.concept_path))
            })
            .map(|(i, _)| i)
            .collect();

        for (n, &start) in anchor_rows.iter().enumerate() {
            let end = anchor_rows.get(n + 1).copied().unwrap_or(rows.len());
            let anchor = rows[start].1.as_ref().expect("anchor row");

            let schedule: Vec<ScheduleEntry> = rows[start + 1..end]
                .iter()
                .filter_map(|(cells, _)| parse_schedule_row(cells))
                .collect();

            if schedule.is_empty() {
                continue;
            }

            let name_upper = anchor.label.to_uppercase();
            let url_slug = concept_url_slug(&anchor.href);
            out.insert_concept(&name_upper, url_slug.as_deref(), schedule);
        }
    }
}

/// Collect the rows of each table block in the token stream.
fn table_blocks(tokens: &[Token]) -> Vec<Vec<(&Vec<String>, &Option<RowAnchor>)>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<(&Vec<String>, &Option<RowAnchor>)>> = None;

    for token in tokens {
        match token {
            Token::TableStart => current = Some(Vec::new()),
            Token::Row { cells, anchor } => {
                if let Some(rows) = current.as_mut() {
                    rows.push((cells, anchor));
                }
            }
            Token::TableEnd => {
                if let Some(rows) = current.take() {
                    blocks.push(rows);
                }
            }
            _ => {}
        }
    }

    blocks
}

/// Validate one table row as a schedule entry, applying the day/time swap
/// correction for transposed source columns.
///
/// The swap heuristic cannot tell a genuinely transposed row from a
/// correctly ordered row whose day cell happens to contain a clock
/// expression; known source-data risk.
fn parse_schedule_row(cells: &[String]) -> Option<ScheduleEntry> {
    if cells.len() < 2 {
        return None;
    }

    let mut day = cells[0].trim().to_string();
    let mut time = cells[1].trim().to_string();

    if is_blank(&day) || is_blank(&time) {
        return None;
    }

    let day_upper = day.to_uppercase();
    let time_upper = time.to_uppercase();
    if day_upper.contains("CONCEPT")
        || time_upper.contains("HOURS")
        || time_upper.contains("OPERATION")
    {
        return None;
    }

    if TIME_OF_DAY.is_match(&day) && !TIME_OF_DAY.is_match(&time) {
        std::mem::swap(&mut day, &mut time);
    }

    let day_valid = DAY_PATTERN.is_match(&day) && day.chars().count() < 50;
    let time_valid = TIME_PATTERN.is_match(&time);

    if day_valid && time_valid {
        Some(ScheduleEntry { day, hours: time })
    } else {
        None
    }
}

/// Empty or entity residue only.
fn is_blank(cell: &str) -> bool {
    cell.chars().all(|c| c.is_whitespace() || c == '&' || c == ';')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> HoursTable {
        HoursTableParser::new("/locations/").parse(html)
    }

    const HOURS_PAGE: &str = r#"
        <table>
            <tr><th>Concept</th><th>Hours of Operation</th></tr>
            <tr><td><a href="/locations/carvery.html"><strong>Carvery</strong></a></td><td></td></tr>
            <tr><td>Monday - Thursday</td><td>8 a.m. to 11 p.m.</td></tr>
            <tr><td>Friday</td><td>8 a.m. to 2 p.m.</td></tr>
            <tr><td><a href="/locations/bread-beyond-deli.html"><strong>Bread &amp; Beyond Deli</strong></a></td><td></td></tr>
            <tr><td>Daily</td><td>10 a.m. to 8 p.m.</td></tr>
        </table>
    "#;

    #[test]
    fn test_rows_grouped_by_concept() {
        let table = parse(HOURS_PAGE);

        let carvery = table.get("CARVERY").unwrap();
        assert_eq!(carvery.len(), 2);
        assert_eq!(carvery[0].day, "Monday - Thursday");
        assert_eq!(carvery[0].hours, "8 a.m. to 11 p.m.");

        let deli = table.get("BREAD & BEYOND DELI").unwrap();
        assert_eq!(deli.len(), 1);
        assert_eq!(deli[0].day, "Daily");
    }

    #[test]
    fn test_slug_variant_key() {
        let table = parse(HOURS_PAGE);
        assert!(table.get("BREAD BEYOND DELI").is_some());
    }

    #[test]
    fn test_ampersand_variant_key() {
        let table = parse(HOURS_PAGE);
        assert!(table.get("BREAD AND BEYOND DELI").is_some());
    }

    #[test]
    fn test_swap_correction() {
        let html = r#"
            <table>
                <tr><td><a href="/locations/zest.html"><strong>Zest</strong></a></td><td></td></tr>
                <tr><td>8 a.m. to 11 p.m.</td><td>Monday - Thursday</td></tr>
            </table>
        "#;
        let table = parse(html);
        let zest = table.get("ZEST").unwrap();
        assert_eq!(zest[0].day, "Monday - Thursday");
        assert_eq!(zest[0].hours, "8 a.m. to 11 p.m.");
    }

    #[test]
    fn test_header_rows_skipped() {
        let table = parse(HOURS_PAGE);
        let carvery = table.get("CARVERY").unwrap();
        assert!(carvery.iter().all(|e| !e.day.contains("Concept")));
    }

    #[test]
    fn test_invalid_rows_discarded() {
        let html = r#"
            <table>
                <tr><td><a href="/locations/zest.html"><strong>Zest</strong></a></td><td></td></tr>
                <tr><td></td><td>8 a.m. to 2 p.m.</td></tr>
                <tr><td>Sometime</td><td>whenever</td></tr>
                <tr><td>Monday</td><td>Closed</td></tr>
            </table>
        "#;
        let table = parse(html);
        let zest = table.get("ZEST").unwrap();
        assert_eq!(zest.len(), 1);
        assert_eq!(zest[0].day, "Monday");
        assert_eq!(zest[0].hours, "Closed");
    }

    #[test]
    fn test_overlong_day_cell_discarded() {
        let long_day = "Monday ".repeat(10);
        let html = format!(
            r#"
            <table>
                <tr><td><a href="/locations/zest.html"><strong>Zest</strong></a></td><td></td></tr>
                <tr><td>{long_day}</td><td>8 a.m. to 2 p.m.</td></tr>
            </table>
        "#
        );
        assert!(parse(&html).get("ZEST").is_none());
    }

    #[test]
    fn test_concept_without_valid_rows_absent() {
        let html = r#"
            <table>
                <tr><td><a href="/locations/zest.html"><strong>Zest</strong></a></td><td></td></tr>
            </table>
        "#;
        let table = parse(html);
        assert!(table.get("ZEST").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_non_emphasized_links_are_not_concepts() {
        let html = r#"
            <table>
                <tr><td><a href="/locations/zest.html">Zest</a></td><td></td></tr>
                <tr><td>Daily</td><td>8 a.m. to 2 p.m.</td></tr>
            </table>
        "#;
        assert!(parse(html).is_empty());
    }

    #[test]
    fn test_document_without_tables() {
        assert!(parse("<p>no tables here</p>").is_empty());
    }
}
