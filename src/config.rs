//! Configuration for sitemap conversion runs.
//!
//! Settings come from built-in defaults, optionally overlaid by a TOML file
//! passed explicitly with `--config`, then by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SitemapError;
use crate::scrapers::HttpClient;

/// Default number of concurrent fetch workers.
pub const DEFAULT_WORKERS: usize = 4;
/// Default timeout for sitemap XML requests, in seconds.
pub const DEFAULT_SITEMAP_TIMEOUT_SECS: u64 = 10;
/// Default timeout for page title requests, in seconds.
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 5;
/// Default number of sitemap-index expansion rounds.
pub const DEFAULT_MAX_INDEX_DEPTH: usize = 1;
/// Default number of records per category in the text preview.
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;
/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "sitemap.html";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Concurrent fetch workers per phase.
    pub workers: usize,
    /// Timeout for sitemap XML requests.
    pub sitemap_timeout_secs: u64,
    /// Timeout for page title requests.
    pub page_timeout_secs: u64,
    /// Sitemap-index expansion rounds before classification.
    ///
    /// `1` expands seed indexes once; an index found among their children
    /// is dropped during classification.
    pub max_index_depth: usize,
    /// User agent: unset for the default browser identity, "impersonate"
    /// for a random real browser, or a literal string.
    pub user_agent: Option<String>,
    /// Records per category shown in the text preview.
    pub preview_limit: usize,
    /// Where the HTML sitemap is written.
    pub output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            sitemap_timeout_secs: DEFAULT_SITEMAP_TIMEOUT_SECS,
            page_timeout_secs: DEFAULT_PAGE_TIMEOUT_SECS,
            max_index_depth: DEFAULT_MAX_INDEX_DEPTH,
            user_agent: None,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SitemapError> {
        let settings = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| SitemapError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self, SitemapError> {
        toml::from_str(text).map_err(|e| SitemapError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SitemapError> {
        if self.workers == 0 {
            return Err(SitemapError::Config("workers must be at least 1".into()));
        }
        if self.sitemap_timeout_secs == 0 || self.page_timeout_secs == 0 {
            return Err(SitemapError::Config("timeouts must be at least 1 second".into()));
        }
        if self.max_index_depth == 0 {
            return Err(SitemapError::Config(
                "max_index_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn sitemap_timeout(&self) -> Duration {
        Duration::from_secs(self.sitemap_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    /// HTTP client for sitemap XML requests.
    pub fn sitemap_client(&self) -> Result<HttpClient, SitemapError> {
        Ok(HttpClient::with_user_agent(
            self.sitemap_timeout(),
            self.user_agent.as_deref(),
        )?)
    }

    /// HTTP client for page title requests.
    pub fn page_client(&self) -> Result<HttpClient, SitemapError> {
        Ok(HttpClient::with_user_agent(
            self.page_timeout(),
            self.user_agent.as_deref(),
        )?)
    }
}
