//! Command-line interface definitions for the lessons scraper.
//!
//! Every option can also come from the environment (a `.env` file in the
//! working directory is loaded first).

use clap::Parser;

/// Crawl paginated lesson listings and write a bilingual reader.
///
/// # Examples
///
/// ```sh
/// # Crawl one level
/// lessons_scraper https://learning.aljazeera.net/en/lessons/level/elementary
///
/// # Render the canned articles without touching the network
/// lessons_scraper --dummy -o ./output
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing page(s) to start crawling from
    #[arg(required_unless_present = "dummy")]
    pub urls: Vec<String>,

    /// Skip crawling and render the built-in sample articles
    #[arg(long)]
    pub dummy: bool,

    /// Output directory for the JSON and Markdown files
    #[arg(short, long, default_value = "output")]
    pub output_dir: String,

    /// File stem for the generated files
    #[arg(long, default_value = "lessons")]
    pub name: String,

    /// Optional path to the awful_aj config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Prefix the target URL is appended to when fetching markdown
    #[arg(long, env = "READER_PREFIX", default_value = "https://r.jina.ai/")]
    pub reader_prefix: String,

    /// Model identifier, overrides the one in config.yaml
    #[arg(long, env = "LESSONS_MODEL")]
    pub model: Option<String>,

    /// Hosted model API key, overrides the one in config.yaml
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for each reader fetch, in seconds
    #[arg(long, default_value_t = 90)]
    pub fetch_timeout_secs: u64,

    /// Timeout for each model call, in seconds
    #[arg(long, default_value_t = 120)]
    pub model_timeout_secs: u64,

    /// Stop after this many listing pages (0 for no limit)
    #[arg(long, default_value_t = 200)]
    pub max_pages: usize,

    /// End the crawl when a link or next-page reply is malformed instead of carrying on
    #[arg(long)]
    pub strict_discovery: bool,
}
