//! Sitemap retrieval and parsing.
//!
//! A fetched document is either a sitemap index (`<sitemap><loc>` entries)
//! or a leaf sitemap (`<url><loc>` entries). Only elements in the standard
//! sitemap namespace are matched.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use serde::Serialize;
use tracing::debug;

use super::error::FetchError;
use super::http_client::HttpClient;

/// Namespace of the sitemap protocol.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Whether a sitemap document points at other sitemaps or at pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SitemapKind {
    Index,
    Leaf,
}

/// A parsed sitemap: its kind and the child locations in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    pub kind: SitemapKind,
    pub locations: Vec<String>,
}

impl SitemapDocument {
    pub fn is_index(&self) -> bool {
        self.kind == SitemapKind::Index
    }

    /// Number of page URLs, or zero for an index.
    pub fn url_count(&self) -> usize {
        match self.kind {
            SitemapKind::Index => 0,
            SitemapKind::Leaf => self.locations.len(),
        }
    }

    /// Page URLs of a non-empty leaf; `None` for an index or an empty leaf.
    pub fn into_page_urls(self) -> Option<Vec<String>> {
        match self.kind {
            SitemapKind::Leaf if !self.locations.is_empty() => Some(self.locations),
            _ => None,
        }
    }
}

/// Something that can fetch one sitemap document.
#[async_trait]
pub trait SitemapSource: Send + Sync {
    /// Fetch and classify the sitemap at `url`. No retries.
    async fn fetch(&self, url: &str) -> Result<SitemapDocument, FetchError>;
}

/// Fetches sitemaps over HTTP.
#[derive(Clone)]
pub struct SitemapFetcher {
    client: HttpClient,
}

impl SitemapFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SitemapSource for SitemapFetcher {
    async fn fetch(&self, url: &str) -> Result<SitemapDocument, FetchError> {
        let response = self.client.get(url).await?;
        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        let body = response.text().await?;
        let document = parse_sitemap(&body)?;
        debug!(
            "Parsed {} as {:?} with {} locations",
            url,
            document.kind,
            document.locations.len()
        );
        Ok(document)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Sitemap,
    Url,
    Loc,
    Other,
}

impl Tag {
    fn resolve(ns: &ResolveResult, local: &[u8]) -> Self {
        match ns {
            ResolveResult::Bound(Namespace(uri)) if *uri == SITEMAP_NS.as_bytes() => match local {
                b"sitemap" => Tag::Sitemap,
                b"url" => Tag::Url,
                b"loc" => Tag::Loc,
                _ => Tag::Other,
            },
            _ => Tag::Other,
        }
    }
}

fn xml_error(e: impl std::fmt::Display) -> FetchError {
    FetchError::Xml(e.to_string())
}

/// Parse a sitemap XML document.
///
/// Returns `Index` when any `<sitemap><loc>` entry is present, otherwise
/// `Leaf` with the `<url><loc>` entries (possibly none).
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, FetchError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Tag> = Vec::new();
    let mut saw_root = false;
    let mut loc_text: Option<String> = None;
    let mut sitemap_locs = Vec::new();
    let mut url_locs = Vec::new();

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) => {
                saw_root = true;
                let tag = Tag::resolve(&ns, e.local_name().as_ref());
                if tag == Tag::Loc && matches!(stack.last(), Some(Tag::Sitemap | Tag::Url)) {
                    loc_text = Some(String::new());
                }
                stack.push(tag);
            }
            Ok((_, Event::Empty(_))) => saw_root = true,
            Ok((_, Event::Text(e))) => {
                if let Some(text) = loc_text.as_mut() {
                    text.push_str(&e.unescape().map_err(xml_error)?);
                }
            }
            Ok((_, Event::CData(e))) => {
                if let Some(text) = loc_text.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok((_, Event::End(_))) => {
                let closed = stack.pop();
                if closed == Some(Tag::Loc) {
                    if let Some(text) = loc_text.take() {
                        let loc = text.trim();
                        if !loc.is_empty() {
                            match stack.last() {
                                Some(Tag::Sitemap) => sitemap_locs.push(loc.to_string()),
                                Some(Tag::Url) => url_locs.push(loc.to_string()),
                                _ => {}
                            }
                        }
                    }
                }
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(e)),
        }
    }

    if !saw_root {
        return Err(FetchError::Xml("document has no root element".to_string()));
    }
    if !stack.is_empty() {
        return Err(FetchError::Xml("unexpected end of document".to_string()));
    }

    if sitemap_locs.is_empty() {
        Ok(SitemapDocument {
            kind: SitemapKind::Leaf,
            locations: url_locs,
        })
    } else {
        Ok(SitemapDocument {
            kind: SitemapKind::Index,
            locations: sitemap_locs,
        })
    }
}
