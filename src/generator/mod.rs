//! Generator module - exports the article pages as static HTML files

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::{ArticleLookup, ArticleStore, ArticleSummary};
use crate::helpers::{article_output_path, article_permalink, listing_output_path};
use crate::templates::PageRenderer;
use crate::Folio;

/// What an export produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Articles returned by the listing
    pub listed: usize,
    /// Article pages written
    pub written: usize,
    /// Slugs that were listed but got no page: unloadable, or their page
    /// would overwrite the listing, `404.html` or `articles.json`
    pub skipped: Vec<String>,
}

const NOT_FOUND_PAGE: &str = "404.html";
const ARTICLE_INDEX: &str = "articles.json";

/// One entry of `articles.json`
#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    slug: &'a str,
    title: &'a str,
    date: &'a str,
    url: String,
}

/// Static site exporter
pub struct Generator {
    folio: Folio,
    store: ArticleStore,
    renderer: PageRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            store: folio.store(),
            renderer: PageRenderer::new()?,
        })
    }

    /// Export the listing, one page per article, the not-found page and `articles.json`
    pub fn generate(&self) -> Result<ExportReport> {
        let public_dir = &self.folio.public_dir;
        let config = &self.folio.config;

        // Ensure public directory exists
        fs::create_dir_all(public_dir)?;

        self.copy_static_assets()?;

        let summaries = self.store.list_articles()?;
        let mut report = ExportReport {
            listed: summaries.len(),
            ..ExportReport::default()
        };

        let listing_path = listing_output_path(config);
        let reserved: [PathBuf; 3] = [
            listing_path.clone(),
            PathBuf::from(NOT_FOUND_PAGE),
            PathBuf::from(ARTICLE_INDEX),
        ];

        let listing = self.renderer.render_listing(config, &summaries)?;
        write_page(&public_dir.join(&listing_path), &listing)?;

        // Exactly the listed slugs get a page
        for summary in &summaries {
            let output_path = article_output_path(config, &summary.slug);
            if reserved.contains(&output_path) {
                tracing::warn!(
                    "Skipping article {:?}: its page {:?} is reserved",
                    summary.slug,
                    output_path
                );
                report.skipped.push(summary.slug.clone());
                continue;
            }

            match self.store.load_article(&summary.slug) {
                ArticleLookup::Found(article) => {
                    let html = self.renderer.render_article(config, &article)?;
                    write_page(&public_dir.join(&output_path), &html)?;
                    report.written += 1;
                }
                ArticleLookup::NotFound | ArticleLookup::Unreadable(_) => {
                    tracing::warn!("Skipping article {:?}: no longer loadable", summary.slug);
                    report.skipped.push(summary.slug.clone());
                }
            }
        }

        let not_found = self.renderer.render_not_found(config)?;
        write_page(&public_dir.join(NOT_FOUND_PAGE), &not_found)?;

        self.generate_article_index(&summaries)?;

        Ok(report)
    }

    /// Write the listing as JSON, with absolute article URLs
    fn generate_article_index(&self, summaries: &[ArticleSummary]) -> Result<()> {
        let config = &self.folio.config;
        let entries: Vec<IndexEntry> = summaries
            .iter()
            .map(|s| IndexEntry {
                slug: &s.slug,
                title: &s.title,
                date: &s.date,
                url: article_permalink(config, &s.slug),
            })
            .collect();

        let output_path = self.folio.public_dir.join(ARTICLE_INDEX);
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated {}", ARTICLE_INDEX);

        Ok(())
    }

    /// Copy static assets (images, stylesheets, etc.) to the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.folio.static_dir;
        if !static_dir.is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.folio.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
        }

        Ok(())
    }
}

fn write_page(output_path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(output_path, html).with_context(|| format!("Failed to write {:?}", output_path))?;
    tracing::debug!("Generated: {:?}", output_path);
    Ok(())
}
