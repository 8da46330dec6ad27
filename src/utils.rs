//! Small helpers shared across the crate.
//!
//! - Base URL extraction for log context
//! - String truncation and slugification for logs and Markdown anchors
//! - JSON error classification for truncated model replies
//! - File system validation for the output directory

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Reduce a URL to `scheme://host[:port]`, dropping path, query and fragment.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(base_url("https://a.b/c?d=1").unwrap(), "https://a.b");
/// ```
pub fn base_url(full_url: &str) -> Result<String, url::ParseError> {
    let parsed = Url::parse(full_url)?;
    let host = parsed.host_str().ok_or(url::ParseError::EmptyHost)?;
    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// Truncate a string for logging purposes.
///
/// Keeps at most `max` bytes, backing off to the previous char boundary so
/// Arabic text never splits mid-character, and appends `"…(+N bytes)"`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// Long lesson translations occasionally hit the model's token limit, which
/// shows up as an EOF while parsing.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Convert a title to a URL-friendly slug for Markdown anchors.
///
/// Non-Latin letters are kept since `char::is_alphanumeric` accepts them.
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let scratch_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    match stdfs::File::create(&scratch_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
