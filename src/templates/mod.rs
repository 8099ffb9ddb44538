//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping is off so that URLs and
//! the rendered article body pass through untouched; templates escape text
//! fields explicitly with the `escape` filter.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{ArticleDocument, ArticleSummary};
use crate::helpers::{article_url, listing_url, url_for};

/// Template renderer for the article pages
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("folio/layout.html")),
            ("articles.html", include_str!("folio/articles.html")),
            ("article.html", include_str!("folio/article.html")),
            ("404.html", include_str!("folio/404.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render the article listing
    pub fn render_listing(&self, config: &SiteConfig, summaries: &[ArticleSummary]) -> Result<String> {
        let articles: Vec<ArticleLink> = summaries
            .iter()
            .map(|s| ArticleLink {
                title: s.title.clone(),
                date: s.date.clone(),
                url: article_url(config, &s.slug),
            })
            .collect();

        let mut context = base_context(config);
        context.insert("articles", &articles);
        self.render("articles.html", &context)
    }

    /// Render one article page
    pub fn render_article(&self, config: &SiteConfig, article: &ArticleDocument) -> Result<String> {
        let mut context = base_context(config);
        context.insert("article", article);
        self.render("article.html", &context)
    }

    /// Render the not-found page
    pub fn render_not_found(&self, config: &SiteConfig) -> Result<String> {
        self.render("404.html", &base_context(config))
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

fn base_context(config: &SiteConfig) -> Context {
    let site = SiteData {
        title: config.title.clone(),
        author: config.author.clone(),
        home_url: url_for(config, ""),
        listing_url: listing_url(config),
        stylesheet: url_for(config, "css/style.css"),
    };
    let mut context = Context::new();
    context.insert("site", &site);
    context
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub author: String,
    pub home_url: String,
    pub listing_url: String,
    pub stylesheet: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleLink {
    pub title: String,
    pub date: String,
    pub url: String,
}
