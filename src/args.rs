use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seo-audit")]
#[command(about = "Heuristic SEO report and content similarity for a list of pages")]
#[command(version)]
pub struct Args {
    /// URLs to analyze; read from stdin when omitted
    pub urls: Vec<String>,

    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of URLs analyzed concurrently
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urls_and_flags() {
        let args = Args::parse_from([
            "seo-audit",
            "example.com",
            "https://rust-lang.org",
            "-c",
            "8",
            "--format",
            "json",
        ]);
        assert_eq!(args.urls, vec!["example.com", "https://rust-lang.org"]);
        assert_eq!(args.concurrency, Some(8));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["seo-audit"]);
        assert!(args.urls.is_empty());
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.timeout.is_none());
    }
}
