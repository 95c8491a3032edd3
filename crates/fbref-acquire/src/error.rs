use std::io;

use thiserror::Error;

/// Everything that can end a scrape run early.
///
/// A team page without a table is not an error: that team is skipped.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to start page source: {0}")]
    Launch(String),

    #[error("failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("no tables found on league page {url}")]
    LeagueTableNotFound { url: String, snippet: String },

    #[error("failed to write {path}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ScrapeError {
    pub(crate) fn navigation(url: &str, reason: impl ToString) -> Self {
        Self::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl AsRef<std::path::Path>, source: impl Into<io::Error>) -> Self {
        Self::Write {
            path: path.as_ref().display().to_string(),
            source: source.into(),
        }
    }
}
