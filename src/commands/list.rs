//! List articles

use anyhow::Result;

use crate::Folio;

/// Print the article listing, newest first
pub fn run(folio: &Folio) -> Result<()> {
    let summaries = folio.store().list_articles()?;

    for summary in summaries {
        let date = if summary.date.is_empty() {
            "----------"
        } else {
            summary.date.as_str()
        };
        println!("{}  {}  [{}]", date, summary.title, summary.slug);
    }

    Ok(())
}
