// src/services/markup.rs

//! Typed markup token scan.
//!
//! The source pages are loosely structured; the parsers only care about a
//! handful of node boundaries (headings, paragraphs, links, emphasized
//! labels, list items, table rows). This module walks a parsed document
//! in order and emits those boundaries as typed tokens, so the matching
//! rules in `listing`, `hours`, and `detail` are written against a small
//! interface instead of pattern strings, and a missing boundary shows up
//! as an absent token rather than a silent empty match.

use scraper::{ElementRef, Html, Node};

use crate::utils::normalize_whitespace;

/// First link of a table row, with its anchor text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAnchor {
    pub href: String,
    pub label: String,
    /// Anchor text is wrapped in `<strong>`/`<em>`
    pub emphasized: bool,
}

/// A node boundary in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `<h1>`..`<h6>` with its level
    Heading { level: u8, text: String },

    /// `<p>` with its full inner text; emitted before any `Link` tokens
    /// nested inside it
    Paragraph(String),

    /// `<a href>` with its anchor text
    Link {
        href: String,
        text: String,
        emphasized: bool,
    },

    /// A `<strong>` label outside links
    Label(String),

    /// `<li>` with its full inner text
    Item(String),

    TableStart,

    /// `<tr>` with its `<td>` cell texts
    Row {
        cells: Vec<String>,
        anchor: Option<RowAnchor>,
    },

    TableEnd,
}

/// Tokenize an HTML document into node-boundary tokens.
pub fn tokenize(html: &str) -> Vec<Token> {
    let document = Html::parse_document(html);
    let mut tokens = Vec::new();
    walk_children(document.root_element(), &mut tokens);
    tokens
}

fn walk_children(element: ElementRef<'_>, out: &mut Vec<Token>) {
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            visit_element(el, out);
        }
    }
}

fn visit_element(el: ElementRef<'_>, out: &mut Vec<Token>) {
    let name = el.value().name();

    if let Some(level) = heading_level(name) {
        out.push(Token::Heading {
            level,
            text: element_text(el),
        });
        return;
    }

    match name {
        "script" | "style" => {}
        "p" => {
            out.push(Token::Paragraph(element_text(el)));
            walk_children(el, out);
        }
        "a" => {
            if let Some(href) = el.value().attr("href") {
                out.push(Token::Link {
                    href: href.to_string(),
                    text: element_text(el),
                    emphasized: has_emphasis(el),
                });
            }
        }
        "strong" => {
            let text = element_text(el);
            if !text.is_empty() {
                out.push(Token::Label(text));
            }
        }
        "li" => {
            out.push(Token::Item(element_text(el)));
            walk_children(el, out);
        }
        "table" => visit_table(el, out),
        _ => walk_children(el, out),
    }
}

fn visit_table(table: ElementRef<'_>, out: &mut Vec<Token>) {
    out.push(Token::TableStart);

    for node in table.descendants() {
        let Some(row) = ElementRef::wrap(node) else {
            continue;
        };
        if row.value().name() != "tr" {
            continue;
        }

        let cells: Vec<String> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .map(element_text)
            .collect();

        let anchor = row
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "a" && el.value().attr("href").is_some())
            .map(|a| RowAnchor {
                href: a.value().attr("href").unwrap_or_default().to_string(),
                label: element_text(a),
                emphasized: has_emphasis(a),
            });

        out.push(Token::Row { cells, anchor });
    }

    out.push(Token::TableEnd);
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn has_emphasis(el: ElementRef<'_>) -> bool {
    el.descendants().filter_map(ElementRef::wrap).any(|d| {
        let name = d.value().name();
        name == "strong" || name == "em"
    })
}

/// Collected inner text of an element, entity-decoded by the HTML parser,
/// NBSP-normalized, whitespace-collapsed. Text inside `<script>`/`<style>`
/// descendants is dropped.
fn element_text(el: ElementRef<'_>) -> String {
    let mut buffer = String::new();
    collect_text(el, &mut buffer);
    normalize_whitespace(&buffer)
}

fn collect_text(el: ElementRef<'_>, buffer: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => buffer.push_str(text),
            Node::Element(element) => {
                let name = element.name();
                if name == "script" || name == "style" {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, buffer);
                }
            }
            _ => {}
        }
    }
}
