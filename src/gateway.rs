//! Model response gateway.
//!
//! Model output is free text. Before the crawler trusts it, every reply goes
//! through [`normalize_response`] and one of three shape parsers:
//!
//! | Mode | Parsed into | Absence value |
//! |------|-------------|---------------|
//! | [`Mode::Links`] | deduplicated absolute URLs | empty list |
//! | [`Mode::NextPage`] | one absolute URL | `None` |
//! | [`Mode::Article`] | [`Article`] with all four keys | `None` |
//!
//! [`Gateway`] never lets an error past its boundary on the plain methods:
//! transport failures and malformed replies are logged and turned into the
//! absence value. The `try_` variants keep malformed replies as
//! [`ResponseError`] so the crawler can apply a strict discovery policy.

use crate::api::AskAsync;
use crate::models::Article;
use crate::prompts::{self, Mode};
use crate::utils::{looks_truncated, truncate_for_log};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use url::Url;

const ARTICLE_KEYS: [&str; 4] = ["title", "title_english", "content", "content_english"];

// A tag only counts when whitespace or an opening bracket follows it, so
// `javascript:void(0)` or `js/page/2` are left intact.
static LANG_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?i:jsonc?|javascript|js)\s+|(?i:jsonc?)([\[{]))").unwrap());

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected shape: {0}")]
    Shape(&'static str),

    #[error("missing keys: {0:?}")]
    MissingKeys(Vec<&'static str>),
}

/// Strip the wrapping models like to put around structured answers.
///
/// Trims whitespace, removes a surrounding code fence, then removes a leading
/// language tag such as `json` left behind by the fence.
pub fn normalize_response(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(inner) = text.strip_prefix("```") {
        text = inner.strip_suffix("```").unwrap_or(inner).trim();
    }
    if let Some(caps) = LANG_TAG.captures(text) {
        let cut = match caps.get(1) {
            Some(bracket) => bracket.start(),
            None => caps.get(0).map_or(0, |m| m.end()),
        };
        text = text[cut..].trim();
    }
    text
}

/// Remove one layer of matching quotes around a single-string answer.
pub fn strip_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && matches!(first, '"' | '\'' | '`') => {
            text[first.len_utf8()..text.len() - last.len_utf8()].trim()
        }
        _ => text,
    }
}

/// Whether `href` reads like a relative reference: a path, query or fragment.
fn looks_relative(href: &str) -> bool {
    let starts_ok = href
        .chars()
        .next()
        .is_some_and(|c| matches!(c, '/' | '?' | '#' | '.' | '-' | '_' | '~' | '%') || c.is_alphanumeric());
    starts_ok && !href.contains(['{', '}', '"', '[', ']', '(', ')', '<', '>', '`', '\\'])
}

/// Resolve `href` against `page_url`, keeping only http(s) results.
///
/// # Arguments
///
/// * `page_url` - The page the reference was found on
/// * `href` - An absolute URL or a relative path, query or fragment
///
/// # Returns
///
/// The absolute URL, or `None` for prose, JSON fragments, script pseudo-URLs
/// and non-http schemes.
fn resolve(page_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.chars().any(char::is_whitespace) {
        return None;
    }
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) if looks_relative(href) => {
            Url::parse(page_url).ok()?.join(href).ok()?
        }
        Err(_) => return None,
    };
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

pub fn parse_links(raw: &str, page_url: &str) -> Result<Vec<String>, ResponseError> {
    let value: serde_json::Value = serde_json::from_str(normalize_response(raw))?;
    let items = value.as_array().ok_or(ResponseError::Shape("expected a JSON array"))?;
    Ok(items
        .iter()
        .filter_map(|item| item.as_str())
        .filter_map(|href| resolve(page_url, href))
        .unique()
        .collect())
}

/// `Ok(None)` means the model said there is no next page.
pub fn parse_next_page(raw: &str, page_url: &str) -> Result<Option<String>, ResponseError> {
    let text = strip_quotes(normalize_response(raw));
    if text.is_empty() || text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    resolve(page_url, text)
        .map(Some)
        .ok_or(ResponseError::Shape("next page is not a URL"))
}

pub fn parse_article(raw: &str) -> Result<Article, ResponseError> {
    let value: serde_json::Value = serde_json::from_str(normalize_response(raw))?;
    let object = value.as_object().ok_or(ResponseError::Shape("expected a JSON object"))?;
    let missing: Vec<&'static str> = ARTICLE_KEYS
        .into_iter()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ResponseError::MissingKeys(missing));
    }
    Ok(serde_json::from_value(value)?)
}

fn log_malformed(mode: Mode, raw: &str, e: &ResponseError) {
    let truncated = matches!(e, ResponseError::Json(err) if looks_truncated(err));
    warn!(
        ?mode,
        error = %e,
        truncated,
        response_preview = %truncate_for_log(raw, 300),
        "Model returned non-conforming reply"
    );
}

/// Sends the fixed prompts and enforces the reply contracts.
#[derive(Debug)]
pub struct Gateway<M> {
    model: M,
}

impl<M: AskAsync> Gateway<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    #[cfg(test)]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// One outbound call. `None` when the transport failed.
    async fn call(&self, mode: Mode, prompt: &str) -> Option<String> {
        match self.model.ask(mode, prompt).await {
            Ok(reply) => {
                debug!(?mode, bytes = reply.len(), "Model replied");
                Some(reply)
            }
            Err(e) => {
                error!(?mode, error = %e, "Model call failed");
                None
            }
        }
    }

    /// Article links on a listing page. Malformed replies are kept as errors.
    ///
    /// Relative hrefs are resolved against `page_url` and duplicates are
    /// dropped in first-seen order. A failed model call is not a malformed
    /// reply and yields an empty list.
    ///
    /// # Arguments
    ///
    /// * `markdown` - The listing page as returned by the reader
    /// * `page_url` - URL the page was fetched from, used as the join base
    ///
    /// # Returns
    ///
    /// Absolute http(s) article URLs, or [`ResponseError`] when the reply
    /// was not a list of URL strings.
    #[instrument(level = "info", skip_all, fields(%page_url))]
    pub async fn try_extract_links(&self, markdown: &str, page_url: &str) -> Result<Vec<String>, ResponseError> {
        let prompt = prompts::extract_links_prompt(markdown, page_url);
        let Some(raw) = self.call(Mode::Links, &prompt).await else {
            return Ok(Vec::new());
        };
        parse_links(&raw, page_url).inspect_err(|e| log_malformed(Mode::Links, &raw, e))
    }

    /// Article links on a listing page, empty on any failure.
    pub async fn extract_links(&self, markdown: &str, page_url: &str) -> Vec<String> {
        self.try_extract_links(markdown, page_url).await.unwrap_or_default()
    }

    /// Pagination target of a listing page. Malformed replies are kept as errors.
    ///
    /// # Returns
    ///
    /// `Ok(None)` for an empty, `null` or `none` reply and for a failed model
    /// call, `Ok(Some(url))` with `url` resolved against `page_url`.
    #[instrument(level = "info", skip_all, fields(%page_url))]
    pub async fn try_extract_next_page(
        &self,
        markdown: &str,
        page_url: &str,
    ) -> Result<Option<String>, ResponseError> {
        let prompt = prompts::next_page_prompt(markdown, page_url);
        let Some(raw) = self.call(Mode::NextPage, &prompt).await else {
            return Ok(None);
        };
        parse_next_page(&raw, page_url).inspect_err(|e| log_malformed(Mode::NextPage, &raw, e))
    }

    /// Pagination target of a listing page, `None` on any failure.
    pub async fn extract_next_page(&self, markdown: &str, page_url: &str) -> Option<String> {
        self.try_extract_next_page(markdown, page_url).await.unwrap_or_default()
    }

    /// Bilingual title and content of one article, `None` unless all four keys came back.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let gateway = Gateway::new(model);
    /// if let Some(article) = gateway.filter_article(&markdown).await {
    ///     println!("{} / {}", article.title_english, article.title);
    /// }
    /// ```
    #[instrument(level = "info", skip_all)]
    pub async fn filter_article(&self, markdown: &str) -> Option<Article> {
        let prompt = prompts::filter_article_prompt(markdown);
        let raw = self.call(Mode::Article, &prompt).await?;
        parse_article(&raw)
            .inspect_err(|e| log_malformed(Mode::Article, &raw, e))
            .ok()
    }
}
