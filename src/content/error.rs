//! Errors raised while reading article sources

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading or parsing an article
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn front_matter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::FrontMatter {
            path: path.into(),
            message: message.into(),
        }
    }
}
