//! Prompt templates for the three model calls made during a crawl.

use serde::Serialize;

/// Which contract a model call is held to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// List the article links on a listing page.
    Links,
    /// Find the pagination "next" link on a listing page.
    NextPage,
    /// Pull title and body out of one article and translate both.
    Article,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Links, Mode::NextPage, Mode::Article];

    /// Name of the awful_aj chat template used for this mode.
    pub fn template_name(self) -> &'static str {
        match self {
            Mode::Links => "lessons_links",
            Mode::NextPage => "lessons_next_page",
            Mode::Article => "lessons_article",
        }
    }

    /// System prompt written into the chat template for this mode.
    pub fn system_prompt(self) -> &'static str {
        match self {
            Mode::Links => {
                "You extract hyperlinks from markdown renderings of web pages. \
                 You answer with a JSON array of strings and nothing else."
            }
            Mode::NextPage => {
                "You find pagination links in markdown renderings of web pages. \
                 You answer with a single URL, or null, and nothing else."
            }
            Mode::Article => {
                "You are an Arabic teacher preparing bilingual reading material. \
                 You answer with a single JSON object and nothing else."
            }
        }
    }
}

pub fn extract_links_prompt(markdown: &str, page_url: &str) -> String {
    format!(
        "Given the following markdown content of a web page, identify and extract all relevant article links. \
         These links typically lead to individual articles or lessons. \
         Return your answer as a JSON array of full URLs. \
         If a link is relative, resolve it using the current page URL: {page_url}\n\
         Example: [\"https://example.com/article1\", \"https://example.com/article2\"]\n\n\
         Markdown Content:\n{markdown}"
    )
}

pub fn next_page_prompt(markdown: &str, page_url: &str) -> String {
    format!(
        "Given the following markdown content of a web page, identify and extract the URL for the 'next page' in a pagination sequence. \
         Return only the full URL as a string. If no next page link is found, return an empty string or null. \
         If the link is relative, resolve it using the current page URL: {page_url}\n\
         Example: 'https://example.com/page/1', 'https://example.com/page/next'\n\
         Wrong Examples: 'https://example.com/page/', 'https://example.com/level/'\n\n\
         Markdown Content:\n{markdown}"
    )
}

pub fn filter_article_prompt(markdown: &str) -> String {
    format!(
        "Given the following markdown content of an article, \
         extract only the article title and the main article content. \
         Translate the article title to English. \
         Also provide the English translation of the main article content. \
         **Ensure all Arabic text in 'title' and 'content' includes appropriate tashkeel (diacritics).** \
         Return your answer as a JSON object with keys 'title', 'title_english', 'content', and 'content_english'.\n\n\
         Markdown Content:\n{markdown}"
    )
}
