//! Error types for remote retrieval.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to retrieve or parse one sitemap document.
///
/// Callers treat this as "zero URLs, not an index" and keep going.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("malformed XML: {0}")]
    Xml(String),
}

/// Reason a page title could not be extracted.
///
/// Never surfaced to the user; the page URL stands in for the title.
#[derive(Debug, Error)]
pub enum TitleError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("not an HTML page ({0})")]
    NotHtml(String),
    #[error("no <title> element")]
    MissingTitle,
}
