use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::similarity::SimilarityMatrix;

/// Score awarded when a heuristic passes
pub const PASS: i32 = 10;
/// Score awarded when a heuristic fails
pub const FAIL: i32 = -10;
/// Score for checks that carry no verdict
pub const NEUTRAL: i32 = 0;

/// Structural and textual summary of one fetched page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// URL the page was fetched from
    pub url: String,

    /// Text of the `<title>` element, empty if missing
    pub title: String,

    /// `content` attribute of `<meta name="description">`, empty if missing
    pub meta_description: String,

    /// Text of every `<h1>` in document order
    pub h1_tags: Vec<String>,

    /// Visible text of the page (stop-words removed once normalized)
    pub content: String,
}

/// Message carried by a check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckMessage {
    /// Plain human-readable message
    Text(String),
    /// Named meta tags discovered on the page
    Tags(BTreeMap<String, String>),
}

impl From<String> for CheckMessage {
    fn from(value: String) -> Self {
        CheckMessage::Text(value)
    }
}

impl From<&str> for CheckMessage {
    fn from(value: &str) -> Self {
        CheckMessage::Text(value.to_string())
    }
}

impl std::fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMessage::Text(text) => f.write_str(text),
            CheckMessage::Tags(tags) => {
                let rendered = tags
                    .iter()
                    .map(|(name, content)| format!("{name}={content}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{rendered}}}")
            }
        }
    }
}

/// Whether a check could actually look at the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Checked,
    Unreachable,
}

/// Message and signed score produced by a single heuristic check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub message: CheckMessage,
    pub score: i32,
    pub status: CheckStatus,
}

impl CheckResult {
    pub fn new(message: impl Into<CheckMessage>, score: i32) -> Self {
        Self {
            message: message.into(),
            score,
            status: CheckStatus::Checked,
        }
    }

    /// Result for a check whose page could not be fetched
    pub fn unreachable(reason: &str) -> Self {
        Self {
            message: CheckMessage::Text(format!("page unreachable: {reason}")),
            score: NEUTRAL,
            status: CheckStatus::Unreachable,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        self.status == CheckStatus::Unreachable
    }
}

/// All heuristic results for one submitted URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub robots_txt: CheckResult,
    pub duplicate_content: CheckResult,
    pub code_errors: CheckResult,
    pub html_errors: CheckResult,
    pub internal_links: CheckResult,
    pub links: CheckResult,
    pub image_weights: CheckResult,
    pub page_speed: CheckResult,
    pub meta_tags: CheckResult,
    pub text: CheckResult,
    pub video: CheckResult,
}

impl PageReport {
    /// Check results paired with their stable field names, in report order
    pub fn checks(&self) -> [(&'static str, &CheckResult); 11] {
        [
            ("robots_txt", &self.robots_txt),
            ("duplicate_content", &self.duplicate_content),
            ("code_errors", &self.code_errors),
            ("html_errors", &self.html_errors),
            ("internal_links", &self.internal_links),
            ("links", &self.links),
            ("image_weights", &self.image_weights),
            ("page_speed", &self.page_speed),
            ("meta_tags", &self.meta_tags),
            ("text", &self.text),
            ("video", &self.video),
        ]
    }

    /// Unweighted sum of every check score
    pub fn total_score(&self) -> i32 {
        self.checks().iter().map(|(_, check)| check.score).sum()
    }
}

/// Output of one analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// One report per submitted URL, in submission order
    pub reports: Vec<PageReport>,

    /// Pairwise similarity over the pages that could be fetched
    pub similarity: SimilarityMatrix,
}
