//! In-memory sources for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::scrapers::{
    parse_sitemap, FetchError, SitemapDocument, SitemapSource, TitleError, TitleOutcome,
    TitleSource,
};

pub(crate) fn urlset_xml(urls: &[&str]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for url in urls {
        xml.push_str(&format!("<url><loc>{}</loc></url>", url));
    }
    xml.push_str("</urlset>");
    xml
}

pub(crate) fn index_xml(sitemaps: &[&str]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for sitemap in sitemaps {
        xml.push_str(&format!("<sitemap><loc>{}</loc></sitemap>", sitemap));
    }
    xml.push_str("</sitemapindex>");
    xml
}

/// Serves sitemap XML from memory; unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct FakeSitemaps {
    documents: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl FakeSitemaps {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: &str, xml: String) -> Self {
        self.documents.insert(url.to_string(), xml);
        self
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SitemapSource for FakeSitemaps {
    async fn fetch(&self, url: &str) -> Result<SitemapDocument, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.documents.get(url) {
            Some(xml) => parse_sitemap(xml),
            None => Err(FetchError::Status(StatusCode::NOT_FOUND)),
        }
    }
}

/// Resolves titles from memory; unknown URLs fall back to the URL.
#[derive(Default)]
pub(crate) struct FakeTitles {
    titles: HashMap<String, String>,
    slow: HashMap<String, Duration>,
    lookups: AtomicUsize,
}

impl FakeTitles {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: &str, title: &str) -> Self {
        self.titles.insert(url.to_string(), title.to_string());
        self
    }

    /// Delay the lookup of `url` by `delay`.
    pub(crate) fn slow(mut self, url: &str, delay: Duration) -> Self {
        self.slow.insert(url.to_string(), delay);
        self
    }

    pub(crate) fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TitleSource for FakeTitles {
    async fn resolve(&self, url: &str) -> TitleOutcome {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.slow.get(url) {
            tokio::time::sleep(*delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        match self.titles.get(url) {
            Some(title) => TitleOutcome::Resolved(title.clone()),
            None => TitleOutcome::Fallback {
                url: url.to_string(),
                reason: TitleError::MissingTitle,
            },
        }
    }
}
