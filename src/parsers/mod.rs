pub mod html;
pub mod stopwords;
pub mod text;


use crate::results::PageRecord;
use std::collections::BTreeMap;

/// Everything the check battery reads from one parsed page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFacts {
    /// Title, description, headings and raw visible text
    pub record: PageRecord,
    /// `href` of every anchor that has one
    pub anchor_hrefs: Vec<String>,
    /// `src` of every image that has one
    pub image_srcs: Vec<String>,
    /// Number of `<video>` elements
    pub video_count: usize,
    /// Named meta tags, name to content
    pub meta_tags: BTreeMap<String, String>,
    /// Whether any text node mentions "error"
    pub has_error_text: bool,
    /// Visible text nodes, trimmed and joined with single spaces
    pub stripped_text: String,
}
