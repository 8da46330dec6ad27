//! Article sinks consuming a finished [`ArticleCollection`](crate::models::ArticleCollection).
//!
//! # Submodules
//!
//! - [`json`]: the collection and crawled page log as one JSON file
//! - [`markdown`]: a bilingual reader, one section per article
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── lessons.json
//! └── lessons.md
//! ```

pub mod json;
pub mod markdown;
