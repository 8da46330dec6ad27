//! Hosted model interaction.
//!
//! The crawler talks to the model through the [`AskAsync`] trait. The
//! production implementation, [`AwfulModel`], wraps `awful_aj::api::ask` against
//! an OpenAI-compatible endpoint (Gemini's compatibility endpoint works) with
//! one chat template per [`Mode`].
//!
//! Each call gets exactly one attempt bounded by a fixed timeout. There is no
//! retry or backoff: a failed call is reported and the gateway degrades it.

use crate::prompts::Mode;
use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template, template::ChatTemplate};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model call failed: {0}")]
    Call(String),

    #[error("model call timed out after {0} seconds")]
    Timeout(u64),
}

/// Trait for async LLM interaction.
///
/// `mode` selects the conversation template; `text` is the fully rendered
/// user prompt.
pub trait AskAsync {
    async fn ask(&self, mode: Mode, text: &str) -> Result<String, ModelError>;
}

impl<T: AskAsync> AskAsync for &T {
    async fn ask(&self, mode: Mode, text: &str) -> Result<String, ModelError> {
        (**self).ask(mode, text).await
    }
}

/// `awful_aj` backed model client with one template per mode.
pub struct AwfulModel {
    config: AwfulJadeConfig,
    links: ChatTemplate,
    next_page: ChatTemplate,
    article: ChatTemplate,
    timeout: Duration,
}

impl AwfulModel {
    /// Load the three chat templates and take ownership of the config.
    ///
    /// Templates must already exist in the awful_aj config directory, see
    /// [`crate::templates::ensure_templates`].
    pub async fn load(config: AwfulJadeConfig, call_timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let links = template::load_template(Mode::Links.template_name()).await?;
        let next_page = template::load_template(Mode::NextPage.template_name()).await?;
        let article = template::load_template(Mode::Article.template_name()).await?;
        debug!("Loaded chat templates");
        Ok(Self {
            config,
            links,
            next_page,
            article,
            timeout: call_timeout,
        })
    }

    fn template_for(&self, mode: Mode) -> &ChatTemplate {
        match mode {
            Mode::Links => &self.links,
            Mode::NextPage => &self.next_page,
            Mode::Article => &self.article,
        }
    }
}

impl fmt::Debug for AwfulModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwfulModel")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AskAsync for AwfulModel {
    #[instrument(level = "info", skip_all, fields(?mode))]
    async fn ask(&self, mode: Mode, text: &str) -> Result<String, ModelError> {
        let t0 = Instant::now();
        let call = ask(&self.config, text.to_string(), self.template_for(mode), None, None);
        let res = match timeout(self.timeout, call).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(ModelError::Call(e.to_string())),
            Err(_) => Err(ModelError::Timeout(self.timeout.as_secs())),
        };
        let dt = t0.elapsed();

        match &res {
            Ok(reply) => debug!(elapsed_ms = dt.as_millis() as u64, bytes = reply.len(), "API call succeeded"),
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "API call failed"),
        }
        res
    }
}
