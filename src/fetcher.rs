//! Page fetching through a markdown reader proxy.
//!
//! Every page is requested as `<reader-prefix><target-url>`; the proxy renders
//! the target and answers with markdown. There is no retry and no cache, so
//! fetching the same URL twice issues two requests.

use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, instrument};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Reader returned {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Timeout after {secs} seconds fetching {url}")]
    Timeout { url: String, secs: u64 },
}

/// Anything that can turn a page URL into markdown.
///
/// The crawler is generic over this so it can run against an in-memory site
/// in tests.
pub trait PageSource {
    async fn fetch_markdown(&self, url: &str) -> Result<String, FetchError>;
}

/// Reader proxy client owning one pooled `reqwest::Client`.
///
/// Built at the start of a crawl and dropped with it.
#[derive(Debug)]
pub struct ReaderClient {
    client: Client,
    prefix: String,
    timeout: Duration,
}

impl ReaderClient {
    /// Build a client that requests `<prefix><target>` with a fixed timeout.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Reader proxy prefix, e.g. `https://r.jina.ai/`
    /// * `timeout` - Whole-request timeout applied to every fetch
    pub fn new(prefix: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            prefix: prefix.to_string(),
            timeout,
        })
    }

    /// The proxied URL for `target`.
    pub fn reader_url(&self, target: &str) -> String {
        format!("{}{}", self.prefix, target)
    }
}

impl PageSource for ReaderClient {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_markdown(&self, url: &str) -> Result<String, FetchError> {
        let reader_url = self.reader_url(url);
        let t0 = Instant::now();
        info!(%reader_url, "Fetching via reader");

        let wrap = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout.as_secs(),
                }
            } else {
                FetchError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        };

        let response = self
            .client
            .get(&reader_url)
            .header(reqwest::header::ACCEPT, "text/markdown, text/plain")
            .send()
            .await
            .map_err(wrap)?;

        let status = response.status();
        if !status.is_success() {
            error!(%reader_url, %status, "Reader returned non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let markdown = response.text().await.map_err(wrap)?;
        info!(
            bytes = markdown.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched markdown"
        );
        Ok(markdown)
    }
}
