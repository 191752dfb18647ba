//! Sitemap discovery: resolve seed URLs into categorized leaf sitemaps.
//!
//! Discovery never fetches page content. It runs in two passes:
//!
//! 1. **Expansion**: fetch each seed. An index contributes its child
//!    locations as candidates, a leaf contributes itself. With
//!    `max_index_depth > 1`, children are fetched and expanded again
//!    before becoming candidates.
//! 2. **Classification**: fetch every candidate once more. Non-empty
//!    leaves are categorized by filename and counted. Indexes found at this
//!    stage (nesting deeper than `max_index_depth`) and empty leaves are
//!    dropped.
//!
//! Remote content is re-read on every run; nothing is cached.

pub(crate) mod fetch;
mod input;

pub use input::parse_sitemap_input;

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::SitemapError;
use crate::models::{categorize, sitemap_filename, CategoryIndex};
use crate::pipeline::{CancelSignal, EventSink, Phase, WorkPool};
use crate::scrapers::{SitemapDocument, SitemapKind, SitemapSource};

use fetch::fetch_sitemaps;

/// Outcome of a discovery run.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub index: CategoryIndex,
    /// Leaf candidates examined in the classification pass.
    pub candidates: usize,
    /// Whether the run was cut short; `index` holds what was found so far.
    pub cancelled: bool,
}

/// Resolves sitemap-index trees into a category index.
pub struct Discoverer {
    source: Arc<dyn SitemapSource>,
    workers: usize,
    max_index_depth: usize,
    events: EventSink,
    cancel: CancelSignal,
}

impl Discoverer {
    pub fn new(source: Arc<dyn SitemapSource>) -> Self {
        let defaults = Settings::default();
        Self {
            source,
            workers: defaults.workers,
            max_index_depth: defaults.max_index_depth,
            events: EventSink::none(),
            cancel: CancelSignal::never(),
        }
    }

    /// Create a discoverer using worker count and depth from settings.
    pub fn from_settings(source: Arc<dyn SitemapSource>, settings: &Settings) -> Self {
        Self::new(source)
            .with_workers(settings.workers)
            .with_max_index_depth(settings.max_index_depth)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_max_index_depth(mut self, depth: usize) -> Self {
        self.max_index_depth = depth.max(1);
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    fn pool(&self) -> WorkPool {
        WorkPool::new(self.workers, self.cancel.clone())
    }

    /// Discover and categorize the leaf sitemaps reachable from `seeds`.
    ///
    /// Fails with `NoInput` for an empty seed list and `NothingDiscovered`
    /// when no category has a non-empty leaf sitemap. A cancelled run is
    /// never an error; it returns whatever was classified, possibly nothing.
    pub async fn discover(&self, seeds: &[String]) -> Result<Discovery, SitemapError> {
        if seeds.is_empty() {
            return Err(SitemapError::NoInput);
        }

        let candidates = self.expand(seeds).await;
        let index = self.classify(&candidates).await;
        let cancelled = self.cancel.is_cancelled();

        info!(
            "Found {} categories with {} total URLs",
            index.len(),
            index.total_urls()
        );

        if index.is_empty() && !cancelled {
            return Err(SitemapError::NothingDiscovered);
        }

        Ok(Discovery {
            index,
            candidates: candidates.len(),
            cancelled,
        })
    }

    /// Expansion pass: turn seeds into leaf candidates, in seed order with
    /// each index's children in place of the index.
    ///
    /// A seed whose fetch fails contributes no candidates.
    pub async fn expand(&self, seeds: &[String]) -> Vec<String> {
        let pool = self.pool();
        let mut frontier: Vec<(Vec<usize>, String)> = seeds
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, url)| (vec![i], url))
            .collect();
        let mut candidates: Vec<(Vec<usize>, String)> = Vec::new();

        for round in 0..self.max_index_depth {
            if frontier.is_empty() || pool.is_cancelled() {
                break;
            }
            let last_round = round + 1 == self.max_index_depth;

            let urls: Vec<String> = frontier.iter().map(|(_, url)| url.clone()).collect();
            let results = fetch_sitemaps(
                &pool,
                &self.source,
                &self.events,
                Phase::Expand,
                &urls,
                |url| url.to_string(),
                |_, doc| describe_expanded(doc),
            )
            .await;

            let mut next = Vec::new();
            for ((key, url), result) in frontier.into_iter().zip(results) {
                match result {
                    Some(Ok(doc)) if doc.is_index() => {
                        for (i, child) in doc.locations.into_iter().enumerate() {
                            let mut child_key = key.clone();
                            child_key.push(i);
                            if last_round {
                                candidates.push((child_key, child));
                            } else {
                                next.push((child_key, child));
                            }
                        }
                    }
                    Some(Ok(_)) => candidates.push((key, url)),
                    Some(Err(_)) | None => {}
                }
            }
            frontier = next;
        }

        candidates.sort_by(|a, b| a.0.cmp(&b.0));
        candidates.into_iter().map(|(_, url)| url).collect()
    }

    /// Classification pass: fetch each candidate and accumulate non-empty
    /// leaves by category. Candidate order is preserved in the index.
    pub async fn classify(&self, candidates: &[String]) -> CategoryIndex {
        let results = fetch_sitemaps(
            &self.pool(),
            &self.source,
            &self.events,
            Phase::Classify,
            candidates,
            sitemap_filename,
            describe_classified,
        )
        .await;

        let mut index = CategoryIndex::new();
        for (url, result) in candidates.iter().zip(results) {
            let Some(Ok(doc)) = result else {
                continue;
            };
            if doc.is_index() {
                debug!(
                    "Skipping nested sitemap index {} (max index depth {})",
                    url, self.max_index_depth
                );
                continue;
            }
            let count = doc.url_count();
            if count == 0 {
                debug!("Skipping empty sitemap {}", url);
                continue;
            }
            index.record(categorize(url), url.clone(), count);
        }
        index
    }
}

fn describe_expanded(doc: &SitemapDocument) -> String {
    match doc.kind {
        SitemapKind::Index => format!("Found {} sub-sitemaps in index", doc.locations.len()),
        SitemapKind::Leaf => "Regular sitemap detected".to_string(),
    }
}

fn describe_classified(url: &str, doc: &SitemapDocument) -> String {
    match doc.kind {
        SitemapKind::Index => "nested index skipped".to_string(),
        SitemapKind::Leaf if doc.locations.is_empty() => "empty sitemap skipped".to_string(),
        SitemapKind::Leaf => format!(
            "{} → {} ({} URLs)",
            sitemap_filename(url),
            categorize(url),
            doc.locations.len()
        ),
    }
}
