//! Render a single article to stdout

use anyhow::{bail, Result};

use crate::content::ArticleLookup;
use crate::Folio;

/// Render one article, failing when it cannot be loaded
pub fn render(folio: &Folio, slug: &str) -> Result<String> {
    match folio.store().load_article(slug) {
        ArticleLookup::Found(article) => Ok(article.content_html),
        ArticleLookup::NotFound => bail!("Article not found: {}", slug),
        ArticleLookup::Unreadable(e) => bail!("Article {} could not be loaded: {}", slug, e),
    }
}

/// Print the rendered HTML of an article
pub fn run(folio: &Folio, slug: &str) -> Result<()> {
    print!("{}", render(folio, slug)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_found_and_missing() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::with_config(tmp.path(), SiteConfig::default());
        fs::create_dir_all(&folio.content_dir).unwrap();
        fs::write(folio.content_dir.join("note.md"), "Plain *note*").unwrap();
        fs::write(folio.content_dir.join("bad.md"), "---\ntitle: x\n").unwrap();

        assert!(render(&folio, "note").unwrap().contains("<em>note</em>"));

        let missing = render(&folio, "ghost").unwrap_err().to_string();
        assert!(missing.contains("not found"));

        let broken = render(&folio, "bad").unwrap_err().to_string();
        assert!(broken.contains("could not be loaded"));
    }
}
