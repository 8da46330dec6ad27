//! In-memory stand-ins for the reader proxy and the hosted model.

use crate::api::{AskAsync, ModelError};
use crate::fetcher::{FetchError, PageSource};
use crate::prompts::Mode;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

enum Reply {
    Text(String),
    Fail,
}

/// Scripted model: the first rule whose mode matches and whose needle occurs
/// in the prompt wins. Unmatched calls answer `[]`, `null`, or fail for
/// articles.
#[derive(Default)]
pub struct FakeModel {
    rules: Vec<(Mode, String, Reply)>,
    calls: Mutex<Vec<(Mode, String)>>,
}

impl FakeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, mode: Mode, needle: &str, reply: &str) -> Self {
        self.rules.push((mode, needle.to_string(), Reply::Text(reply.to_string())));
        self
    }

    pub fn fail(mut self, mode: Mode, needle: &str) -> Self {
        self.rules.push((mode, needle.to_string(), Reply::Fail));
        self
    }

    pub fn calls(&self) -> Vec<(Mode, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, mode: Mode) -> usize {
        self.calls.lock().unwrap().iter().filter(|(m, _)| *m == mode).count()
    }
}

impl AskAsync for FakeModel {
    async fn ask(&self, mode: Mode, text: &str) -> Result<String, ModelError> {
        self.calls.lock().unwrap().push((mode, text.to_string()));
        let rule = self
            .rules
            .iter()
            .find(|(m, needle, _)| *m == mode && text.contains(needle.as_str()));
        match rule {
            Some((_, _, Reply::Text(reply))) => Ok(reply.clone()),
            Some((_, _, Reply::Fail)) => Err(ModelError::Call("scripted failure".to_string())),
            None => match mode {
                Mode::Links => Ok("[]".to_string()),
                Mode::NextPage => Ok("null".to_string()),
                Mode::Article => Err(ModelError::Call("no scripted reply".to_string())),
            },
        }
    }
}

/// Site served from memory. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    timeouts: Vec<String>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, markdown: &str) -> Self {
        self.pages.insert(url.to_string(), markdown.to_string());
        self
    }

    pub fn timeout(mut self, url: &str) -> Self {
        self.timeouts.push(url.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetched.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

impl PageSource for FakeSite {
    async fn fetch_markdown(&self, url: &str) -> Result<String, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());
        if self.timeouts.iter().any(|u| u == url) {
            return Err(FetchError::Timeout {
                url: url.to_string(),
                secs: 90,
            });
        }
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: StatusCode::NOT_FOUND,
        })
    }
}
