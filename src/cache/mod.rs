//! Rendered-article cache
//!
//! Keeps rendered documents keyed by slug, together with the modification
//! time of the source file they were built from. An entry is only served
//! while the file's mtime still matches, so edits show up on the next load.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::SystemTime;

use crate::content::ArticleDocument;

/// Represents a cached entry for a source file
#[derive(Debug, Clone)]
struct CacheEntry {
    mtime: SystemTime,
    document: ArticleDocument,
}

/// Cache of rendered articles shared between readers
#[derive(Debug, Default)]
pub struct ArticleCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ArticleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached document if it was built from a file with this mtime
    pub fn get(&self, slug: &str, mtime: SystemTime) -> Option<ArticleDocument> {
        let entries = self.entries.read().ok()?;
        entries
            .get(slug)
            .filter(|entry| entry.mtime == mtime)
            .map(|entry| entry.document.clone())
    }

    /// Store a freshly rendered document
    pub fn insert(&self, mtime: SystemTime, document: ArticleDocument) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(document.slug.clone(), CacheEntry { mtime, document });
            }
            Err(e) => tracing::warn!("Article cache unavailable: {}", e),
        }
    }

    /// Drop the entry for a slug
    pub fn remove(&self, slug: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(slug);
        }
    }
}
