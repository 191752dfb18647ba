//! Page title resolution.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use super::error::TitleError;
use super::http_client::HttpClient;

/// Result of resolving a page title.
///
/// `Fallback` is the degraded mode: the page URL is used as its own title.
#[derive(Debug)]
pub enum TitleOutcome {
    Resolved(String),
    Fallback { url: String, reason: TitleError },
}

impl TitleOutcome {
    pub fn into_title(self) -> String {
        match self {
            TitleOutcome::Resolved(title) => title,
            TitleOutcome::Fallback { url, .. } => url,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TitleOutcome::Fallback { .. })
    }
}

/// Something that can resolve the display title of a page.
#[async_trait]
pub trait TitleSource: Send + Sync {
    /// Resolve the title of `url`. Never fails; degraded results are
    /// reported as `TitleOutcome::Fallback`.
    async fn resolve(&self, url: &str) -> TitleOutcome;

    /// Total title lookup: the resolved title, or `url` itself.
    async fn resolve_title(&self, url: &str) -> String {
        self.resolve(url).await.into_title()
    }
}

/// Resolves titles by fetching pages over HTTP.
#[derive(Clone)]
pub struct TitleResolver {
    client: HttpClient,
}

impl TitleResolver {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    async fn try_resolve(&self, url: &str) -> Result<String, TitleError> {
        let response = self.client.get(url).await?;
        if !response.is_success() {
            return Err(TitleError::Status(response.status));
        }
        if let Some(content_type) = response.content_type() {
            if !content_type.contains("html") {
                return Err(TitleError::NotHtml(content_type.to_string()));
            }
        }
        let body = response.text().await?;
        extract_title(&body).ok_or(TitleError::MissingTitle)
    }
}

#[async_trait]
impl TitleSource for TitleResolver {
    async fn resolve(&self, url: &str) -> TitleOutcome {
        match self.try_resolve(url).await {
            Ok(title) => TitleOutcome::Resolved(title),
            Err(reason) => {
                debug!("Using URL as title for {}: {}", url, reason);
                TitleOutcome::Fallback {
                    url: url.to_string(),
                    reason,
                }
            }
        }
    }
}

/// Extract the trimmed text of the first `<title>` element.
///
/// Returns `None` when there is no title or it is blank.
pub fn extract_title(html: &str) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let document = Html::parse_document(html);
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>();
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
