//! Chat templates for the three model calls.
//!
//! awful_aj reads templates from `<config_dir>/templates/<name>.yaml`. The
//! crawler ships its own system prompts and writes any template file that is
//! missing, leaving edited ones alone.

use crate::prompts::Mode;
use awful_aj::config_dir;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

#[derive(Debug, Serialize)]
struct TemplateFile {
    system_prompt: &'static str,
    messages: Vec<()>,
}

/// YAML body of the template for `mode`.
pub fn render_template(mode: Mode) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&TemplateFile {
        system_prompt: mode.system_prompt(),
        messages: Vec::new(),
    })
}

/// Write missing template files into `dir`, returning how many were created.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn write_missing(dir: &Path) -> Result<usize, Box<dyn Error>> {
    fs::create_dir_all(dir).await?;
    let mut created = 0;
    for mode in Mode::ALL {
        let path = dir.join(format!("{}.yaml", mode.template_name()));
        if fs::try_exists(&path).await? {
            debug!(path = %path.display(), "Template already present");
            continue;
        }
        fs::write(&path, render_template(mode)?).await?;
        info!(path = %path.display(), "Wrote chat template");
        created += 1;
    }
    Ok(created)
}

/// Make sure awful_aj can load every template the crawler asks for.
pub async fn ensure_templates() -> Result<usize, Box<dyn Error>> {
    write_missing(&config_dir()?.join("templates")).await
}
