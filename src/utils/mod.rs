// src/utils/mod.rs

//! Utility functions and helpers.

pub mod time;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
///
/// # Examples
/// ```
/// use dining_crawler::utils::resolve_url;
///
/// assert_eq!(
///     resolve_url("https://dining.example.edu", "/locations/cafe.html"),
///     "https://dining.example.edu/locations/cafe.html"
/// );
/// ```
pub fn resolve_url(base: &str, href: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Derive the store document identity from a location name.
///
/// Lowercased, every run of non-alphanumeric characters collapsed to a
/// single hyphen, leading/trailing hyphens trimmed. Deterministic: two
/// runs with the same name always address the same document.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Collapse runs of whitespace (including non-breaking spaces) to single
/// spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the URL slug of a concept detail page, e.g.
/// `/locations/cafe-libro.html` -> `cafe-libro`.
pub fn concept_url_slug(href: &str) -> Option<String> {
    let idx = href.find("/locations/")?;
    let tail = &href[idx + "/locations/".len()..];
    let stem = tail.strip_suffix(".html").unwrap_or(tail);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            resolve_url("https://dining.example.edu/", "https://other.com/page"),
            "https://other.com/page"
        );
    }

    #[test]
    fn test_resolve_absolute_path() {
        assert_eq!(
            resolve_url("https://dining.example.edu/hours/", "/locations/zest.html"),
            "https://dining.example.edu/locations/zest.html"
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        assert_eq!(
            resolve_url("https://dining.example.edu/locations/", "zest.html"),
            "https://dining.example.edu/locations/zest.html"
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Café Libro"), "caf-libro");
        assert_eq!(slugify("Larry & Kay's Dairy Bar"), "larry-kay-s-dairy-bar");
        assert_eq!(slugify("B & B, Co."), "b-b-co");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_is_stable() {
        assert_eq!(slugify("Union Express"), slugify("Union Express"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \u{a0} b\n c  "), "a b c");
    }

    #[test]
    fn test_concept_url_slug() {
        assert_eq!(
            concept_url_slug("/locations/cafe-libro.html"),
            Some("cafe-libro".to_string())
        );
        assert_eq!(
            concept_url_slug("https://dining.example.edu/locations/zest.html"),
            Some("zest".to_string())
        );
        assert_eq!(concept_url_slug("/hours/fall.html"), None);
    }
}
