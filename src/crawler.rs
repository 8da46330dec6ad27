//! Pagination-driven crawl of a lessons listing.
//!
//! One crawl walks a single pagination chain strictly in sequence:
//!
//! 1. fetch the listing page as markdown
//! 2. ask the model for the article links on it
//! 3. fetch and filter each unvisited article, one at a time
//! 4. ask the model for the next page and follow it
//!
//! A listing page that cannot be fetched ends the crawl with whatever was
//! collected so far. A failing article is logged and skipped, and is never
//! attempted again in the same crawl. Nothing is retried.

use crate::api::AskAsync;
use crate::fetcher::{PageSource, ReaderClient};
use crate::gateway::Gateway;
use crate::models::{Article, ArticleCollection, CrawlOutcome, StopReason};
use crate::settings::Settings;
use crate::utils::base_url;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub const DEFAULT_MAX_PAGES: usize = 200;

/// What to do when a link or next-page reply cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryPolicy {
    /// Treat it as "nothing found" and keep going.
    #[default]
    Degrade,
    /// Stop the crawl.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Listing pages to fetch at most. `None` follows pagination until it ends.
    pub max_pages: Option<usize>,
    pub discovery: DiscoveryPolicy,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: Some(DEFAULT_MAX_PAGES),
            discovery: DiscoveryPolicy::Degrade,
        }
    }
}

pub struct Crawler<F, M> {
    fetcher: F,
    gateway: Gateway<M>,
    options: CrawlOptions,
}

impl<F: PageSource, M: AskAsync> Crawler<F, M> {
    pub fn new(fetcher: F, model: M, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            gateway: Gateway::new(model),
            options,
        }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &Gateway<M> {
        &self.gateway
    }

    /// Crawl the pagination chain starting at `start_url`.
    ///
    /// Pages are handled one at a time. Each article URL is fetched at most
    /// once per crawl, and a next page equal to the current page ends the
    /// crawl.
    ///
    /// Never fails: fetch and model errors are logged and show up as a
    /// shorter collection and the returned [`StopReason`].
    ///
    /// # Arguments
    ///
    /// * `start_url` - First listing page; parsed and normalised before use
    ///
    /// # Returns
    ///
    /// A [`CrawlOutcome`] holding the collected articles, the next pages that
    /// were followed in order, the number of page fetches, and why the crawl
    /// stopped.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let crawler = Crawler::new(ReaderClient::new(prefix, timeout)?, &model, CrawlOptions::default());
    /// let outcome = crawler.crawl("https://learning.aljazeera.net/en/lessons/level/elementary").await;
    /// println!("{} articles, stopped: {}", outcome.articles.len(), outcome.stop_reason);
    /// ```
    #[instrument(level = "info", skip_all, fields(%start_url))]
    pub async fn crawl(&self, start_url: &str) -> CrawlOutcome {
        let t0 = Instant::now();
        let mut page_url = Url::parse(start_url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| start_url.to_string());
        let site = base_url(&page_url).unwrap_or_default();

        let mut visited: HashSet<String> = HashSet::new();
        let mut articles = ArticleCollection::new();
        let mut next_pages = Vec::new();
        let mut page_num = 1usize;
        let mut pages_fetched = 0usize;

        let stop_reason = loop {
            info!(page = page_num, url = %page_url, "Scraping page");
            pages_fetched += 1;
            let markdown = match self.fetcher.fetch_markdown(&page_url).await {
                Ok(markdown) => markdown,
                Err(e) => {
                    error!(page = page_num, url = %page_url, error = %e, "Failed to fetch page; stopping crawl");
                    break StopReason::PageFetchFailed;
                }
            };

            let article_links = match self.options.discovery {
                DiscoveryPolicy::Degrade => self.gateway.extract_links(&markdown, &page_url).await,
                DiscoveryPolicy::Fail => match self.gateway.try_extract_links(&markdown, &page_url).await {
                    Ok(links) => links,
                    Err(_) => {
                        warn!(page = page_num, "Malformed link reply under strict discovery; stopping crawl");
                        break StopReason::MalformedDiscovery;
                    }
                },
            };
            info!(page = page_num, count = article_links.len(), "Found articles on page");

            for article_url in article_links {
                if !visited.insert(article_url.clone()) {
                    debug!(url = %article_url, "Article already visited");
                    continue;
                }
                if let Some(article) = self.scrape_article(&article_url).await {
                    articles.insert(article_url, article);
                }
            }

            let next_page = match self.options.discovery {
                DiscoveryPolicy::Degrade => self.gateway.extract_next_page(&markdown, &page_url).await,
                DiscoveryPolicy::Fail => match self.gateway.try_extract_next_page(&markdown, &page_url).await {
                    Ok(next) => next,
                    Err(_) => {
                        warn!(page = page_num, "Malformed next-page reply under strict discovery; stopping crawl");
                        break StopReason::MalformedDiscovery;
                    }
                },
            };

            match next_page {
                None => {
                    info!(page = page_num, "No next page found");
                    break StopReason::NoNextPage;
                }
                Some(next) if next == page_url => {
                    info!(page = page_num, url = %next, "Next page is the current page");
                    break StopReason::SelfLoop;
                }
                Some(next) => {
                    if self.options.max_pages.is_some_and(|max| pages_fetched >= max) {
                        warn!(pages_fetched, next = %next, "Page limit reached; not following next page");
                        break StopReason::PageLimit;
                    }
                    info!(page = page_num, next = %next, "Following next page");
                    next_pages.push(next.clone());
                    page_url = next;
                    page_num += 1;
                }
            }
        };

        info!(
            %site,
            articles = articles.len(),
            pages_fetched,
            reason = %stop_reason,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Crawl finished"
        );

        CrawlOutcome {
            articles,
            next_pages,
            pages_fetched,
            stop_reason,
        }
    }

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn scrape_article(&self, url: &str) -> Option<Article> {
        info!("Scraping article");
        let markdown = match self.fetcher.fetch_markdown(url).await {
            Ok(markdown) => markdown,
            Err(e) => {
                error!(error = %e, "Failed to fetch article; skipping");
                return None;
            }
        };
        match self.gateway.filter_article(&markdown).await {
            Some(article) => {
                info!(title = %article.title_english, "Collected article");
                Some(article)
            }
            None => {
                warn!("Model did not return a complete article; skipping");
                None
            }
        }
    }
}

/// Crawl one starting URL with a reader client owned by this call.
///
/// The HTTP client is built on entry and dropped on every exit path.
///
/// # Arguments
///
/// * `start_url` - First listing page of the crawl
/// * `settings` - Reader prefix, fetch timeout and crawl options
/// * `model` - Model client; pass `&model` to share one across crawls
///
/// # Returns
///
/// The crawl's [`CrawlOutcome`]. If the HTTP client cannot be built the
/// outcome is empty with [`StopReason::PageFetchFailed`].
pub async fn scrape_all_articles<M: AskAsync>(start_url: &str, settings: &Settings, model: M) -> CrawlOutcome {
    let fetcher = match ReaderClient::new(&settings.reader_prefix, settings.fetch_timeout) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(%start_url, error = %e, "Failed to build HTTP client");
            return CrawlOutcome {
                articles: ArticleCollection::new(),
                next_pages: Vec::new(),
                pages_fetched: 0,
                stop_reason: StopReason::PageFetchFailed,
            };
        }
    };
    Crawler::new(fetcher, model, settings.crawl).crawl(start_url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::Mode;
    use crate::testing::{FakeModel, FakeSite};

    const START: &str = "https://learning.example.org/en/lessons/level/elementary";
    const PAGE_2: &str = "https://learning.example.org/en/lessons/level/elementary?page=1";
    const PAGE_3: &str = "https://learning.example.org/en/lessons/level/elementary?page=2";
    const ARTICLE_A: &str = "https://learning.example.org/en/lessons/coffee";
    const ARTICLE_B: &str = "https://learning.example.org/en/lessons/istanbul";
    const ARTICLE_C: &str = "https://learning.example.org/en/lessons/language";

    fn article_json(name: &str) -> String {
        format!(
            r#"{{"title": "عنوان {name}", "title_english": "Title {name}", "content": "نص {name}", "content_english": "Text {name}"}}"#
        )
    }

    fn crawler(site: FakeSite, model: FakeModel) -> Crawler<FakeSite, FakeModel> {
        Crawler::new(site, model, CrawlOptions::default())
    }

    #[tokio::test]
    async fn test_two_pages_two_articles() {
        let site = FakeSite::new()
            .page(START, "LISTING-ONE [coffee](/en/lessons/coffee) [istanbul](/en/lessons/istanbul) [next](?page=1)")
            .page(PAGE_2, "LISTING-TWO nothing here")
            .page(ARTICLE_A, "ARTICLE-COFFEE")
            .page(ARTICLE_B, "ARTICLE-ISTANBUL");
        let model = FakeModel::new()
            .reply(Mode::Links, "LISTING-ONE", r#"["/en/lessons/coffee", "/en/lessons/istanbul"]"#)
            .reply(Mode::NextPage, "LISTING-ONE", "?page=1")
            .reply(Mode::NextPage, "LISTING-TWO", "null")
            .reply(Mode::Article, "ARTICLE-COFFEE", &article_json("coffee"))
            .reply(Mode::Article, "ARTICLE-ISTANBUL", &format!("```json\n{}\n```", article_json("istanbul")));
        let crawler = crawler(site, model);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.articles.len(), 2);
        assert_eq!(outcome.articles[ARTICLE_A].title_english, "Title coffee");
        assert_eq!(outcome.articles[ARTICLE_B].content_english, "Text istanbul");
        assert_eq!(outcome.next_pages, vec![PAGE_2.to_string()]);
        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(outcome.stop_reason, StopReason::NoNextPage);

        let site = crawler.fetcher();
        assert_eq!(site.fetch_count(START), 1);
        assert_eq!(site.fetch_count(PAGE_2), 1);
        // articles of page one are resolved before page two is requested
        assert_eq!(site.fetched(), vec![START, ARTICLE_A, ARTICLE_B, PAGE_2]);
    }

    #[tokio::test]
    async fn test_main_page_timeout_returns_empty() {
        let site = FakeSite::new().timeout(START);
        let crawler = crawler(site, FakeModel::new());

        let outcome = crawler.crawl(START).await;

        assert!(outcome.articles.is_empty());
        assert!(outcome.next_pages.is_empty());
        assert_eq!(outcome.stop_reason, StopReason::PageFetchFailed);
        assert_eq!(crawler.fetcher().fetched(), vec![START]);
        assert!(crawler.gateway().model().calls().is_empty());
    }

    #[tokio::test]
    async fn test_visited_articles_are_not_fetched_again() {
        let site = FakeSite::new()
            .page(START, "LISTING-ONE")
            .page(PAGE_2, "LISTING-TWO")
            .page(ARTICLE_A, "ARTICLE-COFFEE")
            .page(ARTICLE_B, "ARTICLE-ISTANBUL")
            .page(ARTICLE_C, "ARTICLE-LANGUAGE");
        let model = FakeModel::new()
            .reply(Mode::Links, "LISTING-ONE", &format!(r#"["{ARTICLE_A}", "{ARTICLE_B}"]"#))
            .reply(Mode::Links, "LISTING-TWO", &format!(r#"["{ARTICLE_B}", "{ARTICLE_C}", "{ARTICLE_A}"]"#))
            .reply(Mode::NextPage, "LISTING-ONE", PAGE_2)
            .reply(Mode::Article, "ARTICLE-COFFEE", &article_json("coffee"))
            .reply(Mode::Article, "ARTICLE-ISTANBUL", &article_json("istanbul"))
            .reply(Mode::Article, "ARTICLE-LANGUAGE", &article_json("language"));
        let crawler = crawler(site, model);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.articles.len(), 3);
        assert_eq!(crawler.fetcher().fetch_count(ARTICLE_A), 1);
        assert_eq!(crawler.fetcher().fetch_count(ARTICLE_B), 1);
        assert_eq!(crawler.fetcher().fetch_count(ARTICLE_C), 1);
        assert_eq!(crawler.gateway().model().calls_for(Mode::Article), 3);
    }

    #[tokio::test]
    async fn test_failed_article_is_attempted_once() {
        let site = FakeSite::new()
            .page(START, "LISTING-ONE")
            .page(PAGE_2, "LISTING-TWO")
            .page(ARTICLE_B, "ARTICLE-ISTANBUL");
        // ARTICLE_A is not served, so its fetch fails with a 404
        let model = FakeModel::new()
            .reply(Mode::Links, "LISTING-ONE", &format!(r#"["{ARTICLE_A}", "{ARTICLE_B}"]"#))
            .reply(Mode::Links, "LISTING-TWO", &format!(r#"["{ARTICLE_A}"]"#))
            .reply(Mode::NextPage, "LISTING-ONE", PAGE_2)
            .reply(Mode::Article, "ARTICLE-ISTANBUL", &article_json("istanbul"));
        let crawler = crawler(site, model);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.articles.keys().collect::<Vec<_>>(), vec![ARTICLE_B]);
        assert_eq!(crawler.fetcher().fetch_count(ARTICLE_A), 1);
        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(outcome.stop_reason, StopReason::NoNextPage);
    }

    #[tokio::test]
    async fn test_self_loop_stops_crawl() {
        let site = FakeSite::new().page(START, "LISTING-ONE").page(PAGE_2, "LISTING-TWO");
        let model = FakeModel::new()
            .reply(Mode::NextPage, "LISTING-ONE", PAGE_2)
            .reply(Mode::NextPage, "LISTING-TWO", "\"?page=1\"");
        let crawler = crawler(site, model);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.stop_reason, StopReason::SelfLoop);
        assert_eq!(outcome.next_pages, vec![PAGE_2.to_string()]);
        assert_eq!(crawler.fetcher().fetch_count(PAGE_2), 1);
    }

    #[tokio::test]
    async fn test_self_loop_on_first_page_leaves_log_empty() {
        let site = FakeSite::new().page(START, "LISTING-ONE");
        let model = FakeModel::new().reply(Mode::NextPage, "LISTING-ONE", START);
        let crawler = crawler(site, model);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.stop_reason, StopReason::SelfLoop);
        assert!(outcome.next_pages.is_empty());
        assert_eq!(outcome.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_malformed_links_degrade_and_pagination_continues() {
        let site = FakeSite::new().page(START, "LISTING-ONE").page(PAGE_2, "LISTING-TWO");
        let model = FakeModel::new()
            .reply(Mode::Links, "LISTING-ONE", "Sure! Here are the lessons: coffee, istanbul")
            .reply(Mode::NextPage, "LISTING-ONE", "?page=1");
        let crawler = crawler(site, model);

        let outcome = crawler.crawl(START).await;

        assert!(outcome.articles.is_empty());
        assert_eq!(outcome.next_pages, vec![PAGE_2.to_string()]);
        assert_eq!(outcome.pages_fetched, 2);
        let model = crawler.gateway().model();
        assert_eq!(model.calls_for(Mode::NextPage), 2);
        // the next-page prompt reused the markdown already fetched for page one
        assert_eq!(crawler.fetcher().fetch_count(START), 1);
        assert!(model.calls().iter().any(|(m, p)| *m == Mode::NextPage && p.contains("LISTING-ONE")));
    }

    #[tokio::test]
    async fn test_strict_discovery_stops_on_malformed_links() {
        let site = FakeSite::new().page(START, "LISTING-ONE");
        let model = FakeModel::new()
            .reply(Mode::Links, "LISTING-ONE", "not json")
            .reply(Mode::NextPage, "LISTING-ONE", "?page=1");
        let options = CrawlOptions {
            discovery: DiscoveryPolicy::Fail,
            ..CrawlOptions::default()
        };
        let crawler = Crawler::new(site, model, options);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.stop_reason, StopReason::MalformedDiscovery);
        assert!(outcome.next_pages.is_empty());
        assert_eq!(crawler.gateway().model().calls_for(Mode::NextPage), 0);
    }

    #[tokio::test]
    async fn test_strict_discovery_still_degrades_transport_failures() {
        let site = FakeSite::new().page(START, "LISTING-ONE");
        let model = FakeModel::new().fail(Mode::Links, "LISTING-ONE");
        let options = CrawlOptions {
            discovery: DiscoveryPolicy::Fail,
            ..CrawlOptions::default()
        };
        let crawler = Crawler::new(site, model, options);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.stop_reason, StopReason::NoNextPage);
    }

    #[tokio::test]
    async fn test_incomplete_articles_never_collected() {
        let site = FakeSite::new()
            .page(START, "LISTING-ONE")
            .page(ARTICLE_A, "ARTICLE-COFFEE")
            .page(ARTICLE_B, "ARTICLE-ISTANBUL")
            .page(ARTICLE_C, "ARTICLE-LANGUAGE");
        let model = FakeModel::new()
            .reply(
                Mode::Links,
                "LISTING-ONE",
                &format!(r#"["{ARTICLE_A}", "{ARTICLE_B}", "{ARTICLE_C}"]"#),
            )
            .reply(Mode::Article, "ARTICLE-COFFEE", &article_json("coffee"))
            .reply(
                Mode::Article,
                "ARTICLE-ISTANBUL",
                r#"{"title": "إسطنبول", "title_english": "Istanbul", "content": "نص"}"#,
            )
            .reply(Mode::Article, "ARTICLE-LANGUAGE", "I cannot translate this article.");
        let crawler = crawler(site, model);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.articles.keys().collect::<Vec<_>>(), vec![ARTICLE_A]);
        for article in outcome.articles.values() {
            assert!(!article.title.is_empty());
            assert!(!article.title_english.is_empty());
            assert!(!article.content.is_empty());
            assert!(!article.content_english.is_empty());
        }
    }

    #[tokio::test]
    async fn test_page_limit_stops_before_following() {
        let site = FakeSite::new()
            .page(START, "LISTING-ONE")
            .page(PAGE_2, "LISTING-TWO")
            .page(PAGE_3, "LISTING-THREE");
        let model = FakeModel::new()
            .reply(Mode::NextPage, "LISTING-ONE", PAGE_2)
            .reply(Mode::NextPage, "LISTING-TWO", PAGE_3)
            .reply(Mode::NextPage, "LISTING-THREE", START);
        let options = CrawlOptions {
            max_pages: Some(2),
            ..CrawlOptions::default()
        };
        let crawler = Crawler::new(site, model, options);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.stop_reason, StopReason::PageLimit);
        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(outcome.next_pages, vec![PAGE_2.to_string()]);
        assert_eq!(crawler.fetcher().fetch_count(PAGE_3), 0);
    }

    #[tokio::test]
    async fn test_unreachable_second_page_keeps_first_page_results() {
        let site = FakeSite::new()
            .page(START, "LISTING-ONE")
            .page(ARTICLE_A, "ARTICLE-COFFEE");
        let model = FakeModel::new()
            .reply(Mode::Links, "LISTING-ONE", &format!(r#"["{ARTICLE_A}"]"#))
            .reply(Mode::NextPage, "LISTING-ONE", PAGE_2)
            .reply(Mode::Article, "ARTICLE-COFFEE", &article_json("coffee"));
        let crawler = crawler(site, model);

        let outcome = crawler.crawl(START).await;

        assert_eq!(outcome.stop_reason, StopReason::PageFetchFailed);
        assert_eq!(outcome.articles.len(), 1);
        assert_eq!(outcome.next_pages, vec![PAGE_2.to_string()]);
        assert_eq!(outcome.pages_fetched, 2);
    }
}
