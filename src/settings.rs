//! Validated runtime settings.
//!
//! Combines the CLI/environment with the values found in the awful_aj config
//! file. Missing credentials are a startup error raised before any request is
//! sent.

use crate::cli::Cli;
use crate::crawler::{CrawlOptions, DiscoveryPolicy};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("reader prefix is not an http(s) URL: {0}")]
    InvalidReaderPrefix(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub api_key: String,
    pub reader_prefix: String,
    pub fetch_timeout: Duration,
    pub model_timeout: Duration,
    pub crawl: CrawlOptions,
}

impl Settings {
    /// CLI values take precedence over the config file values.
    ///
    /// # Arguments
    ///
    /// * `cli` - Parsed command line, including env fallbacks
    /// * `file_model` - `model` from the awful_aj config file
    /// * `file_api_key` - `api_key` from the awful_aj config file
    ///
    /// # Returns
    ///
    /// Validated settings, or [`ConfigError`] when the model or credential is
    /// blank on both sides or the reader prefix is not an http(s) URL.
    pub fn from_parts(cli: &Cli, file_model: &str, file_api_key: &str) -> Result<Self, ConfigError> {
        let model = pick(cli.model.as_deref(), file_model).ok_or(ConfigError::Missing("model"))?;
        let api_key = pick(cli.api_key.as_deref(), file_api_key).ok_or(ConfigError::Missing("api key"))?;

        let reader_prefix = cli.reader_prefix.trim();
        if reader_prefix.is_empty() {
            return Err(ConfigError::Missing("reader prefix"));
        }
        match Url::parse(reader_prefix) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ConfigError::InvalidReaderPrefix(reader_prefix.to_string())),
        }

        Ok(Self {
            model,
            api_key,
            reader_prefix: reader_prefix.to_string(),
            fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs),
            model_timeout: Duration::from_secs(cli.model_timeout_secs),
            crawl: CrawlOptions {
                max_pages: (cli.max_pages > 0).then_some(cli.max_pages),
                discovery: if cli.strict_discovery {
                    DiscoveryPolicy::Fail
                } else {
                    DiscoveryPolicy::Degrade
                },
            },
        })
    }
}

fn pick(flag: Option<&str>, file: &str) -> Option<String> {
    flag.map(str::trim)
        .filter(|v| !v.is_empty())
        .or(Some(file.trim()).filter(|v| !v.is_empty()))
        .map(str::to_string)
}
