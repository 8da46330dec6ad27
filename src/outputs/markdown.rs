//! Bilingual Markdown reader.
//!
//! Original-language text is wrapped in `<div dir="rtl">` so Markdown
//! renderers that pass HTML through lay Arabic out right to left. Shaping is
//! left to the renderer.

use crate::models::ArticleCollection;
use crate::utils::slugify_title;
use chrono::Local;
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub fn collection_to_markdown(articles: &ArticleCollection, pages: &[String]) -> String {
    let mut md = String::new();

    writeln!(md, "# Lessons\n").unwrap();
    writeln!(
        md,
        "_{} articles, generated {}_\n",
        articles.len(),
        Local::now().format("%Y-%m-%d %H:%M")
    )
    .unwrap();

    writeln!(md, "## Contents\n").unwrap();
    for article in articles.values() {
        writeln!(
            md,
            "- [{}](#{})",
            article.title_english,
            slugify_title(&article.title_english)
        )
        .unwrap();
    }
    writeln!(md).unwrap();

    for (url, article) in articles {
        writeln!(md, "---\n").unwrap();
        writeln!(md, "## {}\n", article.title_english).unwrap();
        writeln!(md, "<div dir=\"rtl\">\n\n### {}\n\n{}\n\n</div>\n", article.title, article.content).unwrap();
        writeln!(md, "{}\n", article.content_english).unwrap();
        writeln!(md, "[Source]({url})\n").unwrap();
    }

    if !pages.is_empty() {
        writeln!(md, "---\n").unwrap();
        writeln!(md, "## Pages crawled\n").unwrap();
        for page in pages {
            writeln!(md, "- <{page}>").unwrap();
        }
    }

    md
}

/// Write `<output_dir>/<name>.md`, returning its path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir, %name))]
pub async fn write_collection(
    articles: &ArticleCollection,
    pages: &[String],
    output_dir: &str,
    name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let md = collection_to_markdown(articles, pages);
    fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join(format!("{name}.md"));
    fs::write(&path, md).await?;
    info!(path = %path.display(), "Wrote Markdown reader");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::dummy_articles;

    #[test]
    fn test_markdown_has_both_languages_and_sources() {
        let articles = dummy_articles();
        let md = collection_to_markdown(&articles, &[]);

        for (url, article) in &articles {
            assert!(md.contains(&format!("## {}", article.title_english)));
            assert!(md.contains(&format!("### {}", article.title)));
            assert!(md.contains(&article.content));
            assert!(md.contains(&article.content_english));
            assert!(md.contains(&format!("[Source]({url})")));
        }
        assert!(md.contains("(#arabic-coffee-tradition-and-hospitality)"));
        assert!(!md.contains("## Pages crawled"));
    }

    #[test]
    fn test_markdown_lists_crawled_pages() {
        let pages = vec!["https://a.b/lessons?page=1".to_string()];
        let md = collection_to_markdown(&ArticleCollection::new(), &pages);
        assert!(md.contains("## Pages crawled"));
        assert!(md.contains("- <https://a.b/lessons?page=1>"));
    }
}
