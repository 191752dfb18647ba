//! Run-level errors surfaced to the user.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("no sitemap URLs supplied")]
    NoInput,
    #[error("no valid sitemaps found")]
    NothingDiscovered,
    #[error("no categories selected")]
    NoCategoriesSelected,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl SitemapError {
    /// Whether this is an empty-input condition (nothing to work with)
    /// rather than a misconfiguration.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, SitemapError::NoInput | SitemapError::NothingDiscovered)
    }

    /// Remediation hint for the user, if there is one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SitemapError::NoInput => Some("Enter at least one sitemap URL, one per line."),
            SitemapError::NothingDiscovered => Some(
                "Ensure the sitemap URLs are accessible, verify the URLs are correct, \
                 and check whether the site's robots.txt lists its sitemap locations.",
            ),
            SitemapError::NoCategoriesSelected => {
                Some("Select at least one discovered category to process.")
            }
            _ => None,
        }
    }
}
