//! Article models

use serde::Serialize;

use super::FrontMatter;

/// One entry of the article listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    /// File name without the `.md` extension
    pub slug: String,

    /// Front-matter title, empty when absent
    pub title: String,

    /// Front-matter date as written, empty when absent
    pub date: String,
}

impl ArticleSummary {
    pub(crate) fn from_front_matter(slug: &str, fm: FrontMatter) -> Self {
        Self {
            slug: slug.to_string(),
            title: fm.title.unwrap_or_default(),
            date: fm.date.unwrap_or_default(),
        }
    }
}

/// A fully rendered article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDocument {
    pub slug: String,
    pub title: String,
    pub date: String,

    /// Rendered markdown body
    pub content_html: String,
}

/// Sort summaries newest first.
///
/// Dates compare as plain strings; equal dates fall back to slug order.
pub fn sort_by_date_desc(summaries: &mut [ArticleSummary]) {
    summaries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}
