use crate::parsers::PageFacts;
use crate::results::PageRecord;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Elements whose text never renders
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

static ERROR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)error").unwrap());

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[src]").unwrap());
static VIDEO: LazyLock<Selector> = LazyLock::new(|| Selector::parse("video").unwrap());

/// Parses HTML into a page record
///
/// Parsing is forgiving: missing elements become empty strings or lists.
pub fn extract(html: &str) -> PageRecord {
    let doc = Html::parse_document(html);
    record_from(&doc)
}

/// Parses HTML once and collects everything the heuristic checks need
pub fn inspect(html: &str) -> PageFacts {
    let doc = Html::parse_document(html);
    let record = record_from(&doc);

    let anchor_hrefs = doc
        .select(&ANCHOR)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    let image_srcs = doc
        .select(&IMAGE)
        .filter_map(|e| e.value().attr("src"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    let has_error_text = all_text_nodes(&doc).any(|text| ERROR_PATTERN.is_match(text));

    let stripped_text = visible_text_nodes(&doc)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    ::log::debug!(
        "HTML inspector found {} links, {} images",
        anchor_hrefs.len(),
        image_srcs.len()
    );

    PageFacts {
        record,
        anchor_hrefs,
        image_srcs,
        video_count: doc.select(&VIDEO).count(),
        meta_tags: named_meta_tags(&doc),
        has_error_text,
        stripped_text,
    }
}

fn record_from(doc: &Html) -> PageRecord {
    let title = doc
        .select(&TITLE)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let meta_description = doc
        .select(&META)
        .find(|e| e.value().attr("name") == Some("description"))
        .and_then(|e| e.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    let h1_tags = doc.select(&H1).map(element_text).collect();

    PageRecord {
        url: String::new(),
        title,
        meta_description,
        h1_tags,
        content: visible_text_nodes(doc).collect(),
    }
}

/// Concatenated text of an element, whitespace kept as written
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Meta tags carrying a non-empty `name`; later duplicates win
fn named_meta_tags(doc: &Html) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    for element in doc.select(&META) {
        let Some(name) = element.value().attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let content = element.value().attr("content").unwrap_or_default();
        tags.insert(name.to_string(), content.to_string());
    }
    tags
}

/// Every text node in document order, scripts and styles included
fn all_text_nodes(doc: &Html) -> impl Iterator<Item = &str> {
    doc.tree.root().descendants().filter_map(|node| {
        let text: &str = node.value().as_text()?;
        Some(text)
    })
}

/// Text nodes that are not inside a hidden element
fn visible_text_nodes(doc: &Html) -> impl Iterator<Item = &str> {
    doc.tree.root().descendants().filter_map(|node| {
        let text: &str = node.value().as_text()?;
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        (!hidden).then_some(text)
    })
}
