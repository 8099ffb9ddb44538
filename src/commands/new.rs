//! Create a new article

use anyhow::{bail, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::content::slug::validate_slug;
use crate::content::ARTICLE_EXTENSION;
use crate::Folio;

/// Front-matter written at the top of a new article
#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    date: String,
}

/// Create `<content_dir>/<slug>.md` with a title and today's date
pub fn create_article(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    validate_slug(&slug)?;

    fs::create_dir_all(&folio.content_dir)?;
    let file_path = folio
        .content_dir
        .join(format!("{}.{}", slug, ARTICLE_EXTENSION));

    // Check if file already exists
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let scaffold = Scaffold {
        title,
        date: chrono::Local::now().format("%Y-%m-%d").to_string(),
    };
    let content = format!("---\n{}---\n", serde_yaml::to_string(&scaffold)?);

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
