pub mod aggregator;
pub mod checks;
pub mod config;
pub mod fetcher;
pub mod parsers;
pub mod results;
pub mod similarity;
pub mod utils;

// Re-export commonly used types for convenience
pub use aggregator::parse_url_list;
pub use results::{AuditReport, CheckResult, PageRecord, PageReport};
pub use similarity::SimilarityMatrix;

use config::AuditConfig;
use fetcher::Fetcher;
use std::error::Error;

/// Builder for an audit run over a list of URLs
#[derive(Debug, Clone, Default)]
pub struct Audit {
    config: AuditConfig,
}

impl Audit {
    /// Create a builder with default transport settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let config = AuditConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> Result<Self, Box<dyn Error>> {
        let config = AuditConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    /// Set the maximum number of URLs processed concurrently
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.request_timeout_secs = timeout_seconds;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Analyze every URL in a whitespace-separated list
    pub async fn run(self, input: &str) -> Result<AuditReport, Box<dyn Error>> {
        let urls = parse_url_list(input);
        let fetcher = Fetcher::new(&self.config)?;
        Ok(aggregator::analyze(&fetcher, &urls, self.config.max_concurrency).await)
    }
}
