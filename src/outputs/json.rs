//! JSON output of a crawl.
//!
//! Articles are written keyed by source URL, in the same shape the
//! article-filter prompt returns them:
//!
//! ```text
//! {
//!   "generated_at": "2026-10-14T13:00:00+00:00",
//!   "pages": ["https://…?page=1"],
//!   "articles": { "https://…/lesson": { "title": …, "title_english": …, … } }
//! }
//! ```

use crate::models::ArticleCollection;
use chrono::Local;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct LessonsFile<'a> {
    generated_at: String,
    pages: &'a [String],
    articles: &'a ArticleCollection,
}

pub fn to_json(articles: &ArticleCollection, pages: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&LessonsFile {
        generated_at: Local::now().to_rfc3339(),
        pages,
        articles,
    })
}

/// Write `<output_dir>/<name>.json`, returning its path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir, %name))]
pub async fn write_collection(
    articles: &ArticleCollection,
    pages: &[String],
    output_dir: &str,
    name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = to_json(articles, pages)?;
    fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join(format!("{name}.json"));
    fs::write(&path, json).await?;
    info!(path = %path.display(), count = articles.len(), "Wrote JSON file");
    Ok(path)
}
