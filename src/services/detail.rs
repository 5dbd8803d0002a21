// src/services/detail.rs

//! Concept detail page parser.
//!
//! Extracts cuisine tags, the Grubhub availability flag, an external map
//! link, the full description, and the nested category/subcategory menu
//! tree. Missing structure always degrades to an empty field; this parser
//! never fails on its own.

use std::collections::BTreeMap;

use crate::models::{MenuNode, MenuTree};
use crate::services::markup::{Token, tokenize};

/// Everything a detail page can contribute to a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConceptDetail {
    pub cuisine: Vec<String>,
    pub has_grubhub: bool,
    pub map_link: Option<String>,
    pub full_description: String,
    pub detailed_menu: MenuTree,
}

/// Parser for concept detail pages.
#[derive(Debug, Default)]
pub struct DetailPageParser;

impl DetailPageParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one concept's detail document.
    pub fn parse(&self, html: &str) -> ConceptDetail {
        let tokens = tokenize(html);

        ConceptDetail {
            cuisine: extract_cuisine(&tokens),
            has_grubhub: html.to_lowercase().contains("grubhub"),
            map_link: extract_map_link(&tokens),
            full_description: extract_full_description(&tokens),
            detailed_menu: extract_menu(&tokens),
        }
    }
}

/// The paragraph following a "Cuisine" label, split on whitespace.
fn extract_cuisine(tokens: &[Token]) -> Vec<String> {
    let label_idx = tokens
        .iter()
        .position(|t| matches!(t, Token::Label(text) if text == "Cuisine"));

    let Some(idx) = label_idx else {
        return Vec::new();
    };

    tokens[idx + 1..]
        .iter()
        .find_map(|t| match t {
            Token::Paragraph(text) => Some(
                text.split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        })
        .unwrap_or_default()
}

/// Href of the first link whose anchor text contains "Map It".
fn extract_map_link(tokens: &[Token]) -> Option<String> {
    tokens.iter().find_map(|t| match t {
        Token::Link { href, text, .. } if text.contains("Map It") => Some(href.clone()),
        _ => None,
    })
}

/// First paragraph after the page's `<h1>` title.
fn extract_full_description(tokens: &[Token]) -> String {
    let title_idx = tokens
        .iter()
        .position(|t| matches!(t, Token::Heading { level: 1, .. }));

    let Some(idx) = title_idx else {
        return String::new();
    };

    tokens[idx + 1..]
        .iter()
        .find_map(|t| match t {
            Token::Paragraph(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Menu tree from the section following a "Menu" heading.
///
/// `<h3>` marks a category. Within a category, each label marks a
/// subcategory collecting the list items up to the next label; a category
/// whose labels yield nothing collects its direct items under an implicit
/// "Items" subcategory. Empty categories are dropped.
fn extract_menu(tokens: &[Token]) -> MenuTree {
    let Some(menu_idx) = tokens.iter().position(
        |t| matches!(t, Token::Heading { level, text } if *level <= 2 && text == "Menu"),
    ) else {
        return MenuTree::new();
    };

    let section_end = tokens[menu_idx + 1..]
        .iter()
        .position(|t| matches!(t, Token::Heading { level, .. } if *level <= 2))
        .map(|offset| menu_idx + 1 + offset)
        .unwrap_or(tokens.len());
    let section = &tokens[menu_idx + 1..section_end];

    // Category boundaries at each <h3>
    let category_starts: Vec<usize> = section
        .iter()
        .enumerate()
        .filter_map(|(i, t)| match t {
            Token::Heading { level: 3, text } if !text.is_empty() => Some(i),
            _ => None,
        })
        .collect();

    let mut menu = MenuTree::new();

    for (n, &start) in category_starts.iter().enumerate() {
        let Token::Heading { text: category, .. } = &section[start] else {
            continue;
        };
        let end = category_starts
            .get(n + 1)
            .copied()
            .unwrap_or(section.len());

        let subsections = parse_category(&section[start + 1..end]);
        if !subsections.is_empty() {
            menu.insert(category.clone(), MenuNode::Groups(subsections));
        }
    }

    menu
}

fn parse_category(tokens: &[Token]) -> BTreeMap<String, MenuNode> {
    let mut subsections = BTreeMap::new();

    let label_starts: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| match t {
            Token::Label(text) if !text.is_empty() => Some(i),
            _ => None,
        })
        .collect();

    for (n, &start) in label_starts.iter().enumerate() {
        let Token::Label(name) = &tokens[start] else {
            continue;
        };
        let end = label_starts.get(n + 1).copied().unwrap_or(tokens.len());

        let items = collect_items(&tokens[start + 1..end]);
        if !items.is_empty() {
            subsections.insert(name.clone(), MenuNode::Items(items));
        }
    }

    // No labeled subsection yielded anything: take the category's direct
    // list items instead
    if subsections.is_empty() {
        let items = collect_items(tokens);
        if !items.is_empty() {
            subsections.insert("Items".to_string(), MenuNode::Items(items));
        }
    }

    subsections
}

fn collect_items(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Item(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        })
        .collect()
}
