//! Slug rules shared by the listing and document loaders

use std::path::Path;

use super::ContentError;

/// Check that a slug names a single file inside the content directory.
///
/// Rejects empty slugs, hidden names, path separators, drive prefixes,
/// NUL bytes and any `..` sequence.
pub fn validate_slug(slug: &str) -> Result<(), ContentError> {
    let is_valid = !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains("..")
        && !slug.chars().any(|c| matches!(c, '/' | '\\' | ':' | '\0'));

    if is_valid {
        Ok(())
    } else {
        Err(ContentError::InvalidSlug(slug.to_string()))
    }
}

/// Derive the slug of a markdown file, `None` when the file is not an article
pub fn slug_from_path(path: &Path) -> Option<String> {
    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e == super::ARTICLE_EXTENSION)
        .unwrap_or(false);
    if !is_markdown {
        return None;
    }

    let slug = path.file_stem()?.to_str()?;
    validate_slug(slug).ok()?;
    Some(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_filename_slugs() {
        for slug in ["hello-world", "2024_recap", "Café notes", "v1.2-release"] {
            assert!(validate_slug(slug).is_ok(), "{slug} should be valid");
        }
    }

    #[test]
    fn test_rejects_traversal() {
        for slug in [
            "",
            "../secret",
            "..",
            "a/../../b",
            "nested/post",
            "..\\windows",
            "C:secret",
            ".hidden",
            "nul\0byte",
        ] {
            assert!(
                matches!(validate_slug(slug), Err(ContentError::InvalidSlug(_))),
                "{slug:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(
            slug_from_path(Path::new("/tmp/posts/first-post.md")),
            Some("first-post".to_string())
        );
        assert_eq!(slug_from_path(Path::new("/tmp/posts/notes.txt")), None);
        assert_eq!(slug_from_path(Path::new("/tmp/posts/.draft.md")), None);
        assert_eq!(slug_from_path(Path::new("/tmp/posts/README")), None);
    }
}
