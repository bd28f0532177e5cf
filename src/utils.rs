use url::Url;

/// Host plus explicit port, the way it appears in the URL authority
pub fn netloc(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Location of robots.txt at the origin of the given page
pub fn robots_url(url: &Url) -> Option<Url> {
    url.join("/robots.txt").ok()
}

/// Convert a byte count to kilobytes
pub fn bytes_to_kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

/// Take at most `limit` characters from the start of `text`
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_netloc_keeps_port() {
        let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
        assert_eq!(netloc(&url), "127.0.0.1:8080");

        let url = Url::parse("https://example.com/page").unwrap();
        assert_eq!(netloc(&url), "example.com");
    }

    #[test]
    fn test_robots_url_uses_origin() {
        let url = Url::parse("https://example.com/blog/post?id=1").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "https://example.com/robots.txt"
        );
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("привет мир", 6), "привет");
        assert_eq!(truncate_chars("short", 200), "short");
    }
}
