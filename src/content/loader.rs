//! Content loader - lists and loads articles from the content directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::article::sort_by_date_desc;
use super::slug::{slug_from_path, validate_slug};
use super::{
    ArticleDocument, ArticleSummary, ContentError, FrontMatter, MarkdownRenderer,
    ARTICLE_EXTENSION,
};
use crate::cache::ArticleCache;
use crate::Folio;

/// Outcome of loading a single article
#[derive(Debug)]
pub enum ArticleLookup {
    Found(ArticleDocument),
    /// No article with this slug, or the slug is not allowed
    NotFound,
    /// The file exists but could not be read or parsed
    Unreadable(ContentError),
}

impl ArticleLookup {
    /// Collapse to the page contract: a document or nothing
    pub fn found(self) -> Option<ArticleDocument> {
        match self {
            ArticleLookup::Found(doc) => Some(doc),
            ArticleLookup::NotFound | ArticleLookup::Unreadable(_) => None,
        }
    }
}

/// Loads articles from one flat directory of markdown files
pub struct ArticleStore {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
    cache: Option<ArticleCache>,
}

impl ArticleStore {
    /// Create a store reading from `content_dir`
    pub fn new<P: Into<PathBuf>>(content_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            content_dir: content_dir.into(),
            renderer,
            cache: None,
        }
    }

    /// Create a store for a site, using its content directory and markdown options
    pub fn for_site(folio: &Folio) -> Self {
        Self::new(
            &folio.content_dir,
            MarkdownRenderer::from_config(&folio.config.markdown),
        )
    }

    /// Keep rendered documents between loads, keyed by slug and file mtime
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(ArticleCache::new());
        self
    }

    /// List all articles, newest first.
    ///
    /// A missing content directory yields an empty list. Files that cannot be
    /// read or whose front-matter is malformed are skipped with a warning.
    pub fn list_articles(&self) -> Result<Vec<ArticleSummary>, ContentError> {
        let entries = match fs::read_dir(&self.content_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ContentError::io(&self.content_dir, e)),
        };
        let root = fs::canonicalize(&self.content_dir)
            .map_err(|e| ContentError::io(&self.content_dir, e))?;

        let mut summaries = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| ContentError::io(&self.content_dir, e))?;
            let path = entry.path();

            let Some(slug) = slug_from_path(&path) else {
                continue;
            };
            if !path.is_file() {
                continue;
            }
            if !is_inside(&root, &path) {
                tracing::warn!("Skipping {:?}: resolves outside {:?}", path, root);
                continue;
            }

            match read_summary(&slug, &path) {
                Ok(summary) => summaries.push(summary),
                Err(e) => tracing::warn!("Skipping article {:?}: {}", path, e),
            }
        }

        sort_by_date_desc(&mut summaries);

        Ok(summaries)
    }

    /// Load and render one article by slug
    pub fn load_article(&self, slug: &str) -> ArticleLookup {
        if let Err(e) = validate_slug(slug) {
            tracing::debug!("Rejected article lookup: {}", e);
            return ArticleLookup::NotFound;
        }

        let lookup = self.resolve(slug);
        if !matches!(lookup, ArticleLookup::Found(_)) {
            if let Some(cache) = &self.cache {
                cache.remove(slug);
            }
        }
        lookup
    }

    /// Locate, read and render a validated slug, consulting the cache
    fn resolve(&self, slug: &str) -> ArticleLookup {
        let path = self
            .content_dir
            .join(format!("{}.{}", slug, ARTICLE_EXTENSION));

        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return ArticleLookup::NotFound,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return ArticleLookup::NotFound,
            Err(e) => return unreadable(slug, ContentError::io(&path, e)),
        };

        match fs::canonicalize(&self.content_dir) {
            Ok(root) if is_inside(&root, &path) => {}
            Ok(_) => {
                tracing::warn!("Article {:?} resolves outside the content directory", path);
                return ArticleLookup::NotFound;
            }
            Err(e) => return unreadable(slug, ContentError::io(&self.content_dir, e)),
        }

        let mtime = metadata.modified().ok();
        if let (Some(cache), Some(mtime)) = (&self.cache, mtime) {
            if let Some(doc) = cache.get(slug, mtime) {
                tracing::debug!("Article cache hit: {}", slug);
                return ArticleLookup::Found(doc);
            }
        }

        match self.read_document(slug, &path) {
            Ok(doc) => {
                if let (Some(cache), Some(mtime)) = (&self.cache, mtime) {
                    cache.insert(mtime, doc.clone());
                }
                ArticleLookup::Found(doc)
            }
            Err(e) => unreadable(slug, e),
        }
    }

    fn read_document(&self, slug: &str, path: &Path) -> Result<ArticleDocument, ContentError> {
        let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| ContentError::front_matter(path, e.to_string()))?;

        let summary = ArticleSummary::from_front_matter(slug, fm);
        let content_html = self.renderer.render(body);

        Ok(ArticleDocument {
            slug: summary.slug,
            title: summary.title,
            date: summary.date,
            content_html,
        })
    }
}

/// Read only the front-matter of an article
fn read_summary(slug: &str, path: &Path) -> Result<ArticleSummary, ContentError> {
    let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
    let (fm, _) =
        FrontMatter::parse(&content).map_err(|e| ContentError::front_matter(path, e.to_string()))?;
    Ok(ArticleSummary::from_front_matter(slug, fm))
}

/// Whether `path` resolves (through any symlinks) to a location under `root`
fn is_inside(root: &Path, path: &Path) -> bool {
    fs::canonicalize(path)
        .map(|resolved| resolved.starts_with(root))
        .unwrap_or(false)
}

fn unreadable(slug: &str, error: ContentError) -> ArticleLookup {
    tracing::error!("Failed to load article {:?}: {}", slug, error);
    ArticleLookup::Unreadable(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn article(title: &str, date: &str, body: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n{}", title, date, body)
    }

    fn store(dir: &Path) -> ArticleStore {
        ArticleStore::new(dir, MarkdownRenderer::new())
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp.path().join("does-not-exist"));
        assert!(store.list_articles().unwrap().is_empty());
    }

    #[test]
    fn test_empty_directory_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(store(tmp.path()).list_articles().unwrap().is_empty());
    }

    #[test]
    fn test_lists_one_summary_per_markdown_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "first.md", &article("First", "2024-01-01", "a"));
        write(tmp.path(), "second.md", &article("Second", "2024-02-01", "b"));
        write(tmp.path(), "notes.txt", "not an article");
        write(tmp.path(), ".draft.md", &article("Hidden", "2025-01-01", "c"));
        fs::create_dir(tmp.path().join("nested.md")).unwrap();

        let summaries = store(tmp.path()).list_articles().unwrap();
        let mut slugs: Vec<_> = summaries.iter().map(|s| s.slug.as_str()).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["first", "second"]);
    }

    #[test]
    fn test_listing_is_date_descending() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", &article("A", "2024-01-01", ""));
        write(tmp.path(), "b.md", &article("B", "2024-06-01", ""));
        write(tmp.path(), "c.md", &article("C", "2023-12-31", ""));

        let summaries = store(tmp.path()).list_articles().unwrap();
        let dates: Vec<_> = summaries.iter().map(|s| s.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2024-01-01", "2023-12-31"]);
    }

    #[test]
    fn test_missing_date_sorts_last() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "dated.md", &article("Dated", "2020-01-01", ""));
        write(tmp.path(), "undated.md", "---\ntitle: Undated\n---\nbody");

        let summaries = store(tmp.path()).list_articles().unwrap();
        assert_eq!(summaries[0].slug, "dated");
        assert_eq!(summaries[1].slug, "undated");
        assert_eq!(summaries[1].date, "");
    }

    #[test]
    fn test_file_without_front_matter_is_listed() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "plain.md", "# Just markdown\n");

        let summaries = store(tmp.path()).list_articles().unwrap();
        assert_eq!(
            summaries,
            vec![ArticleSummary {
                slug: "plain".to_string(),
                title: String::new(),
                date: String::new(),
            }]
        );
    }

    #[test]
    fn test_malformed_front_matter_is_skipped_and_unreadable() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.md", &article("Good", "2024-01-01", "ok"));
        write(tmp.path(), "broken.md", "---\ntitle: [oops\n---\nbody");

        let store = store(tmp.path());
        let summaries = store.list_articles().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].slug, "good");

        assert!(matches!(
            store.load_article("broken"),
            ArticleLookup::Unreadable(ContentError::FrontMatter { .. })
        ));
    }

    #[test]
    fn test_load_missing_article() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            store(tmp.path()).load_article("does-not-exist"),
            ArticleLookup::NotFound
        ));
    }

    #[test]
    fn test_load_renders_markdown() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "hello.md",
            &article("Hello", "2024-03-01", "# Title\n\nHello **world**."),
        );

        let doc = store(tmp.path()).load_article("hello").found().unwrap();
        assert_eq!(doc.slug, "hello");
        assert_eq!(doc.title, "Hello");
        assert_eq!(doc.date, "2024-03-01");
        assert!(doc.content_html.contains("<h1>Title</h1>"));
        assert!(doc.content_html.contains("<strong>world</strong>"));
    }

    #[test]
    fn test_load_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "post.md",
            &article("Post", "2024-01-01", "Text\n\n```rust\nfn main() {}\n```\n"),
        );

        let store = store(tmp.path());
        let first = store.load_article("post").found().unwrap();
        let second = store.load_article("post").found().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_traversal_slug_cannot_escape() {
        let tmp = TempDir::new().unwrap();
        let content_dir = tmp.path().join("articles");
        fs::create_dir(&content_dir).unwrap();
        write(tmp.path(), "secret.md", &article("Secret", "2024-01-01", "hidden"));

        let store = store(&content_dir);
        for slug in ["../secret", "..%2Fsecret", "/etc/passwd", "..", ""] {
            assert!(
                matches!(store.load_article(slug), ArticleLookup::NotFound),
                "{slug:?} should not be found"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_directory_is_not_served() {
        let tmp = TempDir::new().unwrap();
        let content_dir = tmp.path().join("articles");
        fs::create_dir(&content_dir).unwrap();
        let secret = write(tmp.path(), "secret.md", &article("Secret", "2024-01-01", "x"));
        std::os::unix::fs::symlink(&secret, content_dir.join("leak.md")).unwrap();

        let store = store(&content_dir);
        assert!(store.list_articles().unwrap().is_empty());
        assert!(matches!(store.load_article("leak"), ArticleLookup::NotFound));
    }

    #[test]
    fn test_listed_slugs_are_loadable() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "one.md", &article("One", "2024-01-01", "1"));
        write(tmp.path(), "two words.md", &article("Two", "2024-01-02", "2"));

        let store = store(tmp.path());
        for summary in store.list_articles().unwrap() {
            assert!(
                matches!(store.load_article(&summary.slug), ArticleLookup::Found(_)),
                "{} should load",
                summary.slug
            );
        }
    }

    #[test]
    fn test_cache_follows_mtime() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "post.md", &article("Post", "2024-01-01", "v1"));
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&path, t0);

        let store = store(tmp.path()).with_cache();
        let first = store.load_article("post").found().unwrap();
        assert!(first.content_html.contains("v1"));

        // Same mtime: the cached render is served
        fs::write(&path, article("Post", "2024-01-01", "v2")).unwrap();
        set_mtime(&path, t0);
        let cached = store.load_article("post").found().unwrap();
        assert!(cached.content_html.contains("v1"));

        set_mtime(&path, t0 + Duration::from_secs(60));
        let fresh = store.load_article("post").found().unwrap();
        assert!(fresh.content_html.contains("v2"));
    }

    #[test]
    fn test_cache_forgets_deleted_article() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "post.md", &article("Post", "2024-01-01", "v1"));
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&path, t0);

        let store = store(tmp.path()).with_cache();
        assert!(store.load_article("post").found().is_some());
        let cache = store.cache.as_ref().unwrap();
        assert!(cache.get("post", t0).is_some());

        fs::remove_file(&path).unwrap();
        assert!(matches!(store.load_article("post"), ArticleLookup::NotFound));
        assert!(cache.get("post", t0).is_none());

        // Restoring the file with the old mtime renders it again
        write(tmp.path(), "post.md", &article("Post", "2024-01-01", "v2"));
        set_mtime(&path, t0);
        let restored = store.load_article("post").found().unwrap();
        assert!(restored.content_html.contains("v2"));
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }
}
