use crate::config::AuditConfig;
use reqwest::header::CONTENT_LENGTH;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// A page fetched with a successful status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: Url,
    pub status: u16,
    pub body: String,
    /// Wall-clock time of the GET, body included
    pub elapsed: Duration,
}

/// Prefix `https://` onto URLs typed without a scheme
pub fn ensure_scheme(raw: &str) -> String {
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// Thin HTTP layer shared by every task of an audit run
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher from the transport configuration
    pub fn new(config: &AuditConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the body of a page, `None` on any failure or non-2xx status
    pub async fn fetch(&self, url: &str) -> Option<String> {
        match self.fetch_page(url).await {
            Ok(page) => Some(page.body),
            Err(e) => {
                ::log::warn!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }

    /// Fetch a page and time the request
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = parse_url(url)?;
        let start = Instant::now();

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let elapsed = start.elapsed();
        ::log::debug!(
            "Fetched {} ({} bytes) in {:.2} seconds",
            final_url,
            body.len(),
            elapsed.as_secs_f64()
        );

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
            elapsed,
        })
    }

    /// GET a URL and report only its status code
    pub async fn probe(&self, url: &Url) -> Option<u16> {
        match self.client.get(url.clone()).send().await {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                ::log::debug!("Probe of {} failed: {}", url, e);
                None
            }
        }
    }

    /// Size announced by a HEAD request's `Content-Length` header
    pub async fn content_length(&self, url: &Url) -> Option<u64> {
        let response = match self.client.head(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                ::log::debug!("HEAD {} failed: {}", url, e);
                return None;
            }
        };

        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
    }
}

fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;

    fn fetcher() -> Fetcher {
        Fetcher::new(&AuditConfig::default()).unwrap()
    }

    #[test]
    fn test_ensure_scheme() {
        assert_eq!(ensure_scheme("example.com"), "https://example.com");
        assert_eq!(ensure_scheme("example.com/a/b"), "https://example.com/a/b");
        assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
        assert_eq!(ensure_scheme("https://example.com"), "https://example.com");
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/page");
                then.status(200)
                    .header("content-type", "text/html; charset=utf-8")
                    .body("<html><body>hello</body></html>");
            })
            .await;

        let body = fetcher().fetch(&server.url("/page")).await;
        mock.assert_async().await;
        assert_eq!(body.as_deref(), Some("<html><body>hello</body></html>"));
    }

    #[tokio::test]
    async fn test_fetch_is_none_on_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404).body("nope");
            })
            .await;

        assert!(fetcher().fetch(&server.url("/missing")).await.is_none());

        let err = fetcher()
            .fetch_page(&server.url("/missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_invalid_url() {
        let err = fetcher().fetch_page("http://[::1").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_probe_reports_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/robots.txt");
                then.status(200).body("User-agent: *");
            })
            .await;

        let found = Url::parse(&server.url("/robots.txt")).unwrap();
        assert_eq!(fetcher().probe(&found).await, Some(200));

        let missing = Url::parse(&server.url("/other.txt")).unwrap();
        assert_eq!(fetcher().probe(&missing).await, Some(404));
    }

    #[tokio::test]
    async fn test_content_length_reads_head_header() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(HEAD).path("/photo.jpg");
                then.status(200).header("content-length", "2048");
            })
            .await;

        let image = Url::parse(&server.url("/photo.jpg")).unwrap();
        assert_eq!(fetcher().content_length(&image).await, Some(2048));
        mock.assert_async().await;
    }
}
