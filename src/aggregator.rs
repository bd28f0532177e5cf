use crate::checks;
use crate::fetcher::{Fetcher, ensure_scheme};
use crate::parsers::{PageFacts, html, text};
use crate::results::{AuditReport, CheckResult, PageRecord, PageReport};
use crate::similarity::{SimilarityMatrix, analyze_similarity};
use crate::utils::robots_url;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// A submitted URL that was fetched and parsed
#[derive(Debug, Clone)]
struct LoadedPage {
    final_url: Url,
    elapsed: Duration,
    facts: PageFacts,
}

type LoadOutcome = Result<LoadedPage, String>;

/// Splits the submitted text into URLs, adding a scheme where missing
pub fn parse_url_list(input: &str) -> Vec<String> {
    input.split_whitespace().map(ensure_scheme).collect()
}

/// Runs the full analysis over a list of URLs
///
/// Each URL is fetched and parsed once. Pages that fail to load still get a
/// report with their checks marked unreachable. Reports come back in input
/// order. Dropping the returned future aborts every in-flight task.
pub async fn analyze(fetcher: &Fetcher, urls: &[String], max_concurrency: usize) -> AuditReport {
    ::log::info!("Analyzing {} URLs", urls.len());
    let permits = max_concurrency.clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(permits));

    let mut loaded = load_pages(fetcher, urls, &semaphore).await;

    // Every page that loaded, in submission order. Duplicate scanning reads
    // the extracted text; similarity reads the stop-word-free copy.
    let mut extracted = Vec::new();
    let mut corpus = Vec::new();
    let mut positions = vec![None; urls.len()];
    for (index, outcome) in loaded.iter().enumerate() {
        if let Ok(page) = outcome {
            positions[index] = Some(corpus.len());
            let mut record = page.facts.record.clone();
            record.url = urls[index].clone();
            corpus.push(normalized_record(&record));
            extracted.push(record);
        }
    }

    let similarity = if corpus.is_empty() {
        ::log::info!("No pages could be fetched, skipping similarity analysis");
        SimilarityMatrix::default()
    } else {
        analyze_similarity(&corpus)
    };
    for (a, b, score) in similarity.pairs() {
        ::log::info!("Similarity between {} and {}: {:.2}", a, b, score);
    }

    let extracted = Arc::new(extracted);
    let mut tasks = JoinSet::new();
    for (index, url) in urls.iter().enumerate() {
        let outcome = std::mem::replace(&mut loaded[index], Err(String::new()));
        let fetcher = fetcher.clone();
        let url = url.clone();
        let extracted = Arc::clone(&extracted);
        let semaphore = Arc::clone(&semaphore);
        let position = positions[index];

        tasks.spawn(async move {
            let _permit = semaphore.acquire().await.ok();
            let report = run_checks(&fetcher, url, outcome, &extracted, position).await;
            (index, report)
        });
    }

    let mut reports: Vec<Option<PageReport>> = vec![None; urls.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, report)) => reports[index] = Some(report),
            Err(e) => ::log::error!("Check task failed: {}", e),
        }
    }

    let reports = reports
        .into_iter()
        .zip(urls)
        .map(|(report, url)| {
            report.unwrap_or_else(|| {
                let failed = CheckResult::unreachable("analysis task failed");
                unreachable_report(url, failed, "analysis task failed")
            })
        })
        .collect();

    AuditReport {
        reports,
        similarity,
    }
}

/// Fetches and parses every URL concurrently, one outcome per URL
async fn load_pages(
    fetcher: &Fetcher,
    urls: &[String],
    semaphore: &Arc<Semaphore>,
) -> Vec<LoadOutcome> {
    let mut tasks = JoinSet::new();
    for (index, url) in urls.iter().enumerate() {
        let fetcher = fetcher.clone();
        let url = url.clone();
        let semaphore = Arc::clone(semaphore);

        tasks.spawn(async move {
            let _permit = semaphore.acquire().await.ok();
            (index, load_page(&fetcher, &url).await)
        });
    }

    let failed: LoadOutcome = Err("analysis task failed".to_string());
    let mut outcomes = vec![failed; urls.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = outcome,
            Err(e) => ::log::error!("Fetch task failed: {}", e),
        }
    }
    outcomes
}

async fn load_page(fetcher: &Fetcher, url: &str) -> LoadOutcome {
    match fetcher.fetch_page(url).await {
        Ok(page) => Ok(LoadedPage {
            facts: html::inspect(&page.body),
            final_url: page.final_url,
            elapsed: page.elapsed,
        }),
        Err(e) => {
            ::log::warn!("Failed to fetch {}: {}", url, e);
            Err(e.to_string())
        }
    }
}

/// Copy of a record with stop-words removed from its content
fn normalized_record(record: &PageRecord) -> PageRecord {
    PageRecord {
        content: text::remove_stop_words(&record.content),
        ..record.clone()
    }
}

/// Runs all eleven checks for one URL
async fn run_checks(
    fetcher: &Fetcher,
    url: String,
    outcome: LoadOutcome,
    extracted: &[PageRecord],
    position: Option<usize>,
) -> PageReport {
    let robots_txt = check_robots_txt(fetcher, &url).await;

    let (page, position) = match (outcome, position) {
        (Ok(page), Some(position)) => (page, position),
        (Err(reason), _) => return unreachable_report(&url, robots_txt, &reason),
        (Ok(_), None) => {
            return unreachable_report(&url, robots_txt, "page missing from corpus");
        }
    };

    let image_weights = check_image_weights(fetcher, &page).await;
    let facts = &page.facts;
    ::log::debug!("Scored {}", url);

    PageReport {
        robots_txt,
        duplicate_content: checks::duplicate_content(
            &extracted[position].content,
            &extracted[..position],
        ),
        code_errors: checks::code_errors(facts),
        html_errors: checks::html_errors(facts),
        internal_links: checks::internal_links(facts, &page.final_url),
        links: checks::links(facts),
        image_weights,
        page_speed: checks::page_speed(page.elapsed),
        meta_tags: checks::meta_tags(facts),
        text: checks::text(facts),
        video: checks::video(facts),
        url,
    }
}

async fn check_robots_txt(fetcher: &Fetcher, url: &str) -> CheckResult {
    let status = match Url::parse(url).ok().as_ref().and_then(robots_url) {
        Some(robots) => fetcher.probe(&robots).await,
        None => None,
    };
    checks::robots_txt(status)
}

/// Sums announced image sizes; images without a `Content-Length` weigh nothing
async fn check_image_weights(fetcher: &Fetcher, page: &LoadedPage) -> CheckResult {
    let mut total_bytes = 0u64;
    for image in checks::image_urls(&page.facts, &page.final_url) {
        if let Some(length) = fetcher.content_length(&image).await {
            total_bytes = total_bytes.saturating_add(length);
        }
    }
    checks::image_weights(total_bytes)
}

/// Report for a page that could not be fetched; only robots.txt is scored
fn unreachable_report(url: &str, robots_txt: CheckResult, reason: &str) -> PageReport {
    let missing = CheckResult::unreachable(reason);
    PageReport {
        url: url.to_string(),
        robots_txt,
        duplicate_content: missing.clone(),
        code_errors: missing.clone(),
        html_errors: missing.clone(),
        internal_links: missing.clone(),
        links: missing.clone(),
        image_weights: missing.clone(),
        page_speed: missing.clone(),
        meta_tags: missing.clone(),
        text: missing.clone(),
        video: missing,
    }
}
