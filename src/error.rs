//! Error taxonomy. `ScrapeError` aborts the live pipeline and is the
//! branch point where callers dispatch the CSV snapshot fallback;
//! `FallbackError` is terminal and surfaces as a server error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The discovery markup is missing or malformed. A changed layout
    /// makes the whole response untrustworthy, so this is never softened.
    #[error("page layout changed: {0}")]
    PageLayout(String),

    #[error("invalid year selector {0:?}")]
    YearToken(String),
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("snapshot {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("snapshot {path:?} has no column for year {year}")]
    MissingYear { path: PathBuf, year: i32 },

    #[error("invalid year selector {0:?}")]
    YearToken(String),
}
