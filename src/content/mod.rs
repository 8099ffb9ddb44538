//! Content module - handles articles, front-matter and markdown rendering

mod article;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod slug;

pub use article::{ArticleDocument, ArticleSummary};
pub use error::ContentError;
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use loader::{ArticleLookup, ArticleStore};
pub use markdown::MarkdownRenderer;

/// File extension of article sources
pub const ARTICLE_EXTENSION: &str = "md";
