//! # Lessons Scraper
//!
//! Crawls a paginated lessons site, reads each page as markdown through a
//! reader proxy, and asks a hosted LLM to find article links, the next page,
//! and a bilingual (original + English) version of every article. The
//! collected articles are written as JSON and as a Markdown reader.
//!
//! ## Usage
//!
//! ```sh
//! lessons_scraper https://learning.aljazeera.net/en/lessons/level/elementary -o ./output
//! ```
//!
//! ## Architecture
//!
//! 1. **Startup**: load `.env`, the awful_aj config and chat templates, validate credentials
//! 2. **Crawl**: one sequential pagination crawl per starting URL, crawls run concurrently
//! 3. **Output**: merge the collections and write JSON and Markdown

use awful_aj::{config, config_dir};
use clap::Parser;
use futures::future::join_all;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod api;
mod cli;
mod crawler;
mod dummy;
mod fetcher;
mod gateway;
mod models;
mod outputs;
mod prompts;
mod settings;
mod templates;
#[cfg(test)]
mod testing;
mod utils;

use api::AwfulModel;
use cli::Cli;
use crawler::scrape_all_articles;
use models::{ArticleCollection, CrawlOutcome};
use outputs::{json, markdown};
use settings::Settings;
use utils::ensure_writable_dir;

/// Process exit status for a finished run: 0 when there is something to
/// write, 2 when every crawl came back empty.
fn exit_status(articles: &ArticleCollection) -> u8 {
    if articles.is_empty() { 2 } else { 0 }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("lessons_scraper starting up");

    let args = Cli::parse();
    debug!(urls = ?args.urls, output_dir = %args.output_dir, dummy = args.dummy, "Parsed CLI arguments");

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let (articles, pages) = if args.dummy {
        info!("Using sample articles; skipping crawl");
        (dummy::dummy_articles(), Vec::new())
    } else {
        for url in &args.urls {
            Url::parse(url).map_err(|e| format!("invalid start URL {url}: {e}"))?;
        }

        // ---- Load config & validate before any network activity ----
        let config_path = match &args.config {
            Some(path) => path.clone(),
            None => config_dir()?.join("config.yaml").to_string_lossy().into_owned(),
        };
        let mut model_config =
            config::load_config(&config_path).map_err(|e| format!("failed to load {config_path}: {e}"))?;
        info!(%config_path, "Loaded configuration");

        let settings = Settings::from_parts(&args, &model_config.model, &model_config.api_key)?;
        model_config.model = settings.model.clone();
        model_config.api_key = settings.api_key.clone();
        info!(
            model = %settings.model,
            reader_prefix = %settings.reader_prefix,
            max_pages = ?settings.crawl.max_pages,
            discovery = ?settings.crawl.discovery,
            "Settings validated"
        );

        let created = templates::ensure_templates().await?;
        if created > 0 {
            info!(created, "Installed missing chat templates");
        }
        let model = AwfulModel::load(model_config, settings.model_timeout).await?;

        // ---- Crawl every starting URL; each crawl is sequential ----
        let outcomes: Vec<CrawlOutcome> = join_all(
            args.urls
                .iter()
                .map(|url| scrape_all_articles(url, &settings, &model)),
        )
        .await;

        for (url, outcome) in args.urls.iter().zip(&outcomes) {
            info!(
                %url,
                articles = outcome.articles.len(),
                pages_fetched = outcome.pages_fetched,
                reason = %outcome.stop_reason,
                "Crawl result"
            );
        }
        CrawlOutcome::merge(outcomes)
    };

    let status = exit_status(&articles);
    if status != 0 {
        error!("No articles were found; nothing to write");
        return Ok(ExitCode::from(status));
    }
    info!(count = articles.len(), pages = pages.len(), "Collected articles");

    let json_path = json::write_collection(&articles, &pages, &args.output_dir, &args.name).await?;
    let md_path = match markdown::write_collection(&articles, &pages, &args.output_dir, &args.name).await {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "Failed writing Markdown; JSON output is still available");
            None
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        json = %json_path.display(),
        markdown = ?md_path,
        articles = articles.len(),
        "Execution complete"
    );

    Ok(ExitCode::SUCCESS)
}
