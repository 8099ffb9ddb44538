//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,

    // URL
    pub url: String,
    pub base_path: String,
    pub articles_route: String,
    pub trailing_slash: bool,

    // Directory
    pub content_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Rendering
    #[serde(default)]
    pub markdown: MarkdownConfig,
    pub cache: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            author: "Author".to_string(),

            url: "http://localhost:3000".to_string(),
            base_path: String::new(),
            articles_route: "content/articles".to_string(),
            trailing_slash: true,

            content_dir: "content/articles".to_string(),
            static_dir: "public".to_string(),
            public_dir: "out".to_string(),

            markdown: MarkdownConfig::default(),
            cache: false,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides on top of the file values.
    ///
    /// `FOLIO_AUTHOR_NAME` sets the author. `FOLIO_BASE_PATH` sets the base
    /// path; without it, a GitHub Actions build of `owner/repo` is served
    /// under `/repo`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(author) = var("FOLIO_AUTHOR_NAME") {
            self.author = author;
        }

        if let Some(base_path) = var("FOLIO_BASE_PATH") {
            self.base_path = base_path;
        } else if var("GITHUB_ACTIONS").as_deref() == Some("true") {
            let repository = var("GITHUB_REPOSITORY").unwrap_or_default();
            if let Some(name) = repository.split('/').nth(1).filter(|n| !n.is_empty()) {
                self.base_path = format!("/{}", name);
            }
        }

        self.base_path = normalize_base_path(&self.base_path);
        tracing::debug!("Base path: {:?}", self.base_path);
    }
}

/// `repo/` and `/repo/` both become `/repo`; an empty or `/` path becomes empty
fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Markdown rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub highlight: bool,
    pub line_numbers: bool,
    pub theme: String,
    /// Escape raw HTML found in article bodies
    pub sanitize: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            line_numbers: false,
            theme: "base16-ocean.dark".to_string(),
            sanitize: true,
        }
    }
}
