// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build and validate the crawl configuration (flags > config file > defaults)
// 3. Validate the root URL
// 4. Wire Ctrl-C / SIGTERM to the crawl's cancellation token
// 5. Run the crawl and print the report
// 6. Exit with proper code (0 = crawl finished or was cancelled, 2 = error)
//
// Nothing touches the network until steps 2 and 3 have passed.
// =============================================================================

mod cli;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use cli::Cli;
use domain_crawler::config::{self, ConfigFile};
use domain_crawler::crawl::{CrawlOutcome, CrawlReport, Crawler};
use domain_crawler::error::CrawlError;
use domain_crawler::fetch::HttpFetcher;
use domain_crawler::urls::CanonicalUrl;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let file = cli
        .config
        .as_deref()
        .map(ConfigFile::load)
        .transpose()
        .map_err(CrawlError::from)?;
    let config = config::resolve(file, cli.workers, cli.timeout_secs).map_err(CrawlError::from)?;

    let root = CanonicalUrl::parse_root(&cli.root_url).map_err(|e| CrawlError::InvalidRoot {
        url: cli.root_url.clone(),
        reason: e.reason,
    })?;

    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;

    // One token for the whole crawl; the signal task cancels it
    let cancel = CancellationToken::new();
    let signal_task = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            info!("received shutdown signal, finishing in-flight pages");
            cancel.cancel();
        }
    });

    let crawler = Crawler::new(config, Arc::new(fetcher));
    let result = crawler.crawl(root, cancel).await;
    signal_task.abort();

    let report = result?;
    print_report(&report, cli.json)?;

    Ok(0)
}

// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No handler could be installed: never fire
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

// Prints the report either as a list or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_list(report);
    }
    Ok(())
}

fn print_list(report: &CrawlReport) {
    println!("🔍 Crawl of {}", report.root);
    println!("{}", "=".repeat(60));

    for page in &report.visited {
        println!("  {}", page);
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages visited: {}", report.visited.len());
    println!("   ✅ Fetched: {}", report.pages_fetched);
    println!("   ❌ Failed: {}", report.fetch_failures);

    if report.outcome == CrawlOutcome::Cancelled {
        println!("   ⏹️  Cancelled with {} page(s) still queued", report.queued_remaining);
    }
}
