use clap::Parser;
use seo_audit::{Audit, AuditReport};
use std::io::Read;

mod args;
use args::{Args, OutputFormat};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let input = if args.urls.is_empty() {
        let mut buffer = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
            ::log::error!("Failed to read URLs from stdin: {}", e);
            std::process::exit(1);
        }
        buffer
    } else {
        args.urls.join(" ")
    };

    let mut audit = Audit::new();
    if let Some(path) = &args.config {
        audit = match audit.with_config_file(path) {
            Ok(audit) => audit,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        };
    }
    if let Some(concurrency) = args.concurrency {
        audit = audit.with_max_concurrency(concurrency);
    }
    if let Some(timeout) = args.timeout {
        audit = audit.with_request_timeout(timeout);
    }

    let start_time = std::time::Instant::now();
    let report = match audit.run(&input).await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    };
    ::log::info!(
        "Analyzed {} pages in {:.2} seconds",
        report.reports.len(),
        start_time.elapsed().as_secs_f64()
    );

    match args.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ::log::error!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
        OutputFormat::Text => print_text(&report),
    }
}

fn print_text(report: &AuditReport) {
    for page in &report.reports {
        println!("{} (total {:+})", page.url, page.total_score());
        for (name, check) in page.checks() {
            println!("  {:<18} {:>+4}  {}", name, check.score, check.message);
        }
        println!();
    }

    if report.similarity.len() > 1 {
        println!("Similarity");
        for (a, b, score) in report.similarity.pairs() {
            println!("  {:.2}  {} <> {}", score, a, b);
        }
    }
}
