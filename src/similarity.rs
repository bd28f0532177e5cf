//! TF-IDF cosine similarity across the fetched pages.
//!
//! Scores are keyed by page URL so callers never depend on corpus positions
//! lining up with the submitted URL list.

use crate::results::PageRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Symmetric matrix of pairwise similarity scores in `[0, 1]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    /// URL of the page behind each row and column
    pub urls: Vec<String>,
    pub scores: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Score between the pages at positions `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.scores.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Score between two pages identified by URL (first occurrence of each)
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.urls.iter().position(|u| u == a)?;
        let j = self.urls.iter().position(|u| u == b)?;
        self.get(i, j)
    }

    /// Every unordered pair of distinct pages with its score
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        (0..self.len()).flat_map(move |i| {
            (i + 1..self.len())
                .map(move |j| (self.urls[i].as_str(), self.urls[j].as_str(), self.scores[i][j]))
        })
    }
}

/// Builds TF-IDF vectors over every page's content and compares each pair
///
/// Empty input yields an empty matrix; a single page yields `[[1.0]]`.
pub fn analyze_similarity(pages: &[PageRecord]) -> SimilarityMatrix {
    let urls = pages.iter().map(|page| page.url.clone()).collect::<Vec<_>>();
    let vectors = tfidf_vectors(pages);

    let n = pages.len();
    let mut scores = vec![vec![0.0; n]; n];
    for i in 0..n {
        scores[i][i] = 1.0;
        for j in i + 1..n {
            let score = if pages[i].content == pages[j].content {
                1.0
            } else {
                dot(&vectors[i], &vectors[j]).clamp(0.0, 1.0)
            };
            scores[i][j] = score;
            scores[j][i] = score;
        }
    }

    SimilarityMatrix { urls, scores }
}

/// Lowercased tokens of two or more word characters
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// L2-normalized TF-IDF vector per page, as sparse term maps
fn tfidf_vectors(pages: &[PageRecord]) -> Vec<HashMap<String, f64>> {
    let counts = pages
        .iter()
        .map(|page| {
            let mut tf: HashMap<String, f64> = HashMap::new();
            for token in tokenize(&page.content) {
                *tf.entry(token).or_insert(0.0) += 1.0;
            }
            tf
        })
        .collect::<Vec<_>>();

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for tf in &counts {
        for term in tf.keys() {
            *document_frequency.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    // Smoothed idf: ln((1 + n) / (1 + df)) + 1
    let n = pages.len() as f64;
    let idf = document_frequency
        .iter()
        .map(|(term, df)| (term.to_string(), ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0))
        .collect::<HashMap<_, _>>();

    counts
        .iter()
        .map(|tf| {
            let mut vector = tf
                .iter()
                .map(|(term, count)| (term.clone(), count * idf[term]))
                .collect::<HashMap<_, _>>();
            let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                vector.values_mut().for_each(|w| *w /= norm);
            }
            vector
        })
        .collect()
}

fn dot(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum()
}
