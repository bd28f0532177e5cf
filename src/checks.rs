//! The heuristic check battery.
//!
//! Every check is a pure function of data that was fetched once per URL.
//! The network probes behind `robots_txt` and `image_weights` live in the
//! aggregator; these functions only turn their outcome into a score.

use crate::parsers::PageFacts;
use crate::results::{CheckMessage, CheckResult, FAIL, NEUTRAL, PASS, PageRecord};
use crate::utils::{bytes_to_kb, netloc, truncate_chars};
use std::time::Duration;
use url::Url;

/// Links above this count pass the link checks
pub const MIN_LINKS: usize = 5;
/// Total image weight below this many kilobytes passes
pub const MAX_IMAGE_KB: f64 = 1024.0;
/// Page loads faster than this pass
pub const MAX_LOAD_TIME: Duration = Duration::from_secs(2);
/// Characters of page text shown in the text check
pub const TEXT_EXCERPT_CHARS: usize = 200;

/// Scores the status returned for `/robots.txt`
pub fn robots_txt(status: Option<u16>) -> CheckResult {
    match status {
        Some(code) if (200..300).contains(&code) => CheckResult::new("robots.txt found", PASS),
        _ => CheckResult::new("robots.txt not found", FAIL),
    }
}

/// Flags content already seen on an earlier page; the first match wins
pub fn duplicate_content(content: &str, earlier: &[PageRecord]) -> CheckResult {
    match earlier.iter().find(|page| page.content == content) {
        Some(original) => {
            ::log::debug!("Content duplicates {}", original.url);
            CheckResult::new("duplicate content found", FAIL)
        }
        None => CheckResult::new("duplicate content not found", NEUTRAL),
    }
}

pub fn code_errors(facts: &PageFacts) -> CheckResult {
    if facts.has_error_text {
        CheckResult::new("code errors found", FAIL)
    } else {
        CheckResult::new("code errors not found", PASS)
    }
}

pub fn html_errors(facts: &PageFacts) -> CheckResult {
    if facts.has_error_text {
        CheckResult::new("errors found", FAIL)
    } else {
        CheckResult::new("errors not found", PASS)
    }
}

/// Counts anchors whose href mentions the page's own host
pub fn internal_links(facts: &PageFacts, page_url: &Url) -> CheckResult {
    let domain = netloc(page_url);
    let count = if domain.is_empty() {
        0
    } else {
        facts
            .anchor_hrefs
            .iter()
            .filter(|href| href.contains(&domain))
            .count()
    };
    let score = if count > MIN_LINKS { PASS } else { FAIL };
    CheckResult::new(format!("internal links: {}", count), score)
}

pub fn links(facts: &PageFacts) -> CheckResult {
    let count = facts.anchor_hrefs.len();
    let score = if count > MIN_LINKS { PASS } else { FAIL };
    CheckResult::new(format!("found {} links", count), score)
}

/// Absolute URLs of every image on the page; unresolvable sources are skipped
pub fn image_urls(facts: &PageFacts, base: &Url) -> Vec<Url> {
    facts
        .image_srcs
        .iter()
        .filter_map(|src| match base.join(src) {
            Ok(url) => Some(url),
            Err(e) => {
                ::log::debug!("Skipping image {}: {}", src, e);
                None
            }
        })
        .collect()
}

/// Scores the summed `Content-Length` of the page's images
pub fn image_weights(total_bytes: u64) -> CheckResult {
    let kb = bytes_to_kb(total_bytes);
    let score = if kb < MAX_IMAGE_KB { PASS } else { FAIL };
    CheckResult::new(format!("total image weight: {:.2} KB", kb), score)
}

pub fn page_speed(elapsed: Duration) -> CheckResult {
    let score = if elapsed < MAX_LOAD_TIME { PASS } else { FAIL };
    CheckResult::new(
        format!("page load time: {:.2} seconds", elapsed.as_secs_f64()),
        score,
    )
}

/// Passes when both `description` and `keywords` are declared
pub fn meta_tags(facts: &PageFacts) -> CheckResult {
    let complete =
        facts.meta_tags.contains_key("description") && facts.meta_tags.contains_key("keywords");
    let score = if complete { PASS } else { FAIL };
    CheckResult::new(CheckMessage::Tags(facts.meta_tags.clone()), score)
}

pub fn text(facts: &PageFacts) -> CheckResult {
    if facts.stripped_text.is_empty() {
        CheckResult::new("text not found", FAIL)
    } else {
        CheckResult::new(truncate_chars(&facts.stripped_text, TEXT_EXCERPT_CHARS), PASS)
    }
}

/// Video is a bonus; its absence is neutral
pub fn video(facts: &PageFacts) -> CheckResult {
    if facts.video_count > 0 {
        CheckResult::new(format!("found {} video elements", facts.video_count), PASS)
    } else {
        CheckResult::new("video elements not found", NEUTRAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html;

    fn anchors(count: usize, href: &str) -> PageFacts {
        PageFacts {
            anchor_hrefs: vec![href.to_string(); count],
            ..PageFacts::default()
        }
    }

    fn record(url: &str, content: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            content: content.to_string(),
            ..PageRecord::default()
        }
    }

    #[test]
    fn test_robots_txt() {
        let found = robots_txt(Some(200));
        assert_eq!(found.score, PASS);
        assert_eq!(found.message.to_string(), "robots.txt found");

        let missing = robots_txt(Some(404));
        assert_eq!(missing.score, FAIL);
        assert_eq!(missing.message.to_string(), "robots.txt not found");

        assert_eq!(robots_txt(None).score, FAIL);
    }

    #[test]
    fn test_duplicate_content() {
        let earlier = vec![record("https://a.test", "alpha"), record("https://b.test", "beta")];

        let duplicate = duplicate_content("beta", &earlier);
        assert_eq!(duplicate.score, FAIL);
        assert_eq!(duplicate.message.to_string(), "duplicate content found");

        let unique = duplicate_content("gamma", &earlier);
        assert_eq!(unique.score, NEUTRAL);
        assert_eq!(unique.message.to_string(), "duplicate content not found");

        assert_eq!(duplicate_content("alpha", &[]).score, NEUTRAL);
    }

    #[test]
    fn test_error_checks() {
        let clean = html::inspect("<p>all good</p>");
        assert_eq!(code_errors(&clean).score, PASS);
        assert_eq!(html_errors(&clean).score, PASS);

        let broken = html::inspect("<p>Internal Server Error</p>");
        assert_eq!(code_errors(&broken).score, FAIL);
        assert_eq!(html_errors(&broken).score, FAIL);
        assert_eq!(code_errors(&broken).message.to_string(), "code errors found");
    }

    #[test]
    fn test_links_threshold() {
        let six = links(&anchors(6, "/a"));
        assert_eq!(six.score, PASS);
        assert_eq!(six.message.to_string(), "found 6 links");

        let five = links(&anchors(5, "/a"));
        assert_eq!(five.score, FAIL);
        assert_eq!(five.message.to_string(), "found 5 links");
    }

    #[test]
    fn test_internal_links_match_domain() {
        let page = Url::parse("https://example.com/blog").unwrap();

        let internal = internal_links(&anchors(6, "https://example.com/post"), &page);
        assert_eq!(internal.score, PASS);
        assert_eq!(internal.message.to_string(), "internal links: 6");

        // Relative links do not contain the domain
        let relative = internal_links(&anchors(10, "/post"), &page);
        assert_eq!(relative.score, FAIL);
        assert_eq!(relative.message.to_string(), "internal links: 0");
    }

    #[test]
    fn test_image_weights() {
        let light = image_weights(2048);
        assert_eq!(light.score, PASS);
        assert_eq!(light.message.to_string(), "total image weight: 2.00 KB");

        let none = image_weights(0);
        assert_eq!(none.score, PASS);
        assert_eq!(none.message.to_string(), "total image weight: 0.00 KB");

        let heavy = image_weights(1024 * 1024);
        assert_eq!(heavy.score, FAIL);
        assert_eq!(heavy.message.to_string(), "total image weight: 1024.00 KB");
    }

    #[test]
    fn test_image_urls_resolve_against_base() {
        let facts = PageFacts {
            image_srcs: vec![
                "/logo.png".to_string(),
                "img/a.jpg".to_string(),
                "https://cdn.test/b.png".to_string(),
                "http://[::1".to_string(),
            ],
            ..PageFacts::default()
        };
        let base = Url::parse("https://example.com/blog/post").unwrap();
        let urls = image_urls(&facts, &base)
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        assert_eq!(
            urls,
            vec![
                "https://example.com/logo.png",
                "https://example.com/blog/img/a.jpg",
                "https://cdn.test/b.png",
            ]
        );
    }

    #[test]
    fn test_page_speed() {
        let fast = page_speed(Duration::from_millis(1234));
        assert_eq!(fast.score, PASS);
        assert_eq!(fast.message.to_string(), "page load time: 1.23 seconds");

        assert_eq!(page_speed(Duration::from_secs(2)).score, FAIL);
    }

    #[test]
    fn test_meta_tags() {
        let complete = html::inspect(
            r#"<meta name="description" content="d"><meta name="keywords" content="k">"#,
        );
        assert_eq!(meta_tags(&complete).score, PASS);

        let missing_keywords = html::inspect(r#"<meta name="description" content="d">"#);
        let result = meta_tags(&missing_keywords);
        assert_eq!(result.score, FAIL);
        match result.message {
            CheckMessage::Tags(tags) => assert_eq!(tags["description"], "d"),
            CheckMessage::Text(text) => panic!("expected tag map, got {}", text),
        }
    }

    #[test]
    fn test_text_excerpt() {
        let long = PageFacts {
            stripped_text: "x".repeat(500),
            ..PageFacts::default()
        };
        let result = text(&long);
        assert_eq!(result.score, PASS);
        assert_eq!(result.message.to_string().chars().count(), TEXT_EXCERPT_CHARS);

        let empty = text(&PageFacts::default());
        assert_eq!(empty.score, FAIL);
        assert_eq!(empty.message.to_string(), "text not found");
    }

    #[test]
    fn test_video_is_never_negative() {
        let none = video(&PageFacts::default());
        assert_eq!(none.score, NEUTRAL);
        assert_eq!(none.message.to_string(), "video elements not found");

        let some = video(&PageFacts {
            video_count: 2,
            ..PageFacts::default()
        });
        assert_eq!(some.score, PASS);
        assert_eq!(some.message.to_string(), "found 2 video elements");
    }
}
