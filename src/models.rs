//! Data models for crawled lessons and the outcome of a crawl.
//!
//! - [`Article`]: one bilingual lesson as returned by the article-filter prompt
//! - [`ArticleCollection`]: every resolved article keyed by its source URL
//! - [`CrawlOutcome`]: what a single pagination crawl produced and why it stopped

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A bilingual lesson article.
///
/// All four fields are required. The model reply is deserialized straight into
/// this struct, so a reply missing any key (or carrying `null` for one) never
/// becomes an `Article`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Title in the original language.
    pub title: String,
    /// English translation of the title.
    pub title_english: String,
    /// Main article body in the original language.
    pub content: String,
    /// English translation of the body.
    pub content_english: String,
}

/// Articles keyed by canonical source URL.
pub type ArticleCollection = BTreeMap<String, Article>;

/// Why a crawl loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Next-page extraction found nothing.
    NoNextPage,
    /// Next-page extraction returned the page being crawled.
    SelfLoop,
    /// The page itself could not be fetched.
    PageFetchFailed,
    /// The configured page limit was reached.
    PageLimit,
    /// A discovery response was malformed and the strict policy is active.
    MalformedDiscovery,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::NoNextPage => "no next page",
            StopReason::SelfLoop => "next page equals current page",
            StopReason::PageFetchFailed => "page fetch failed",
            StopReason::PageLimit => "page limit reached",
            StopReason::MalformedDiscovery => "malformed discovery response",
        };
        f.write_str(s)
    }
}

/// Result of crawling one pagination chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOutcome {
    /// Every article that resolved with all four fields.
    pub articles: ArticleCollection,
    /// Next-page URLs in the order they were followed.
    pub next_pages: Vec<String>,
    /// Number of page-level fetch attempts (articles not included).
    pub pages_fetched: usize,
    pub stop_reason: StopReason,
}

impl CrawlOutcome {
    /// Fold several crawls into one collection and one next-page log.
    ///
    /// Later outcomes overwrite articles with the same URL.
    pub fn merge(outcomes: Vec<CrawlOutcome>) -> (ArticleCollection, Vec<String>) {
        let mut articles = ArticleCollection::new();
        let mut next_pages = Vec::new();
        for outcome in outcomes {
            articles.extend(outcome.articles);
            next_pages.extend(outcome.next_pages);
        }
        (articles, next_pages)
    }
}
