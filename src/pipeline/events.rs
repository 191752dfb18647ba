//! Progress events emitted by the discovery and enrichment phases.
//!
//! Items complete in worker order, not submission order. Consumers must
//! not assume `ItemCompleted` events arrive in input order.

use std::fmt;

use tokio::sync::mpsc;

use crate::models::CategoryKey;

/// Pipeline phase an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fetching seed sitemaps and expanding indexes.
    Expand,
    /// Fetching candidate leaf sitemaps to categorize and count them.
    Classify,
    /// Re-fetching the selected leaf sitemaps.
    FetchSitemaps,
    /// Fetching pages to extract titles.
    ResolveTitles,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Expand => "Discovering sitemaps",
            Phase::Classify => "Analyzing sitemaps",
            Phase::FetchSitemaps => "Fetching selected sitemaps",
            Phase::ResolveTitles => "Fetching titles",
        };
        f.write_str(name)
    }
}

/// Progress within one category during title resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProgress {
    pub category: CategoryKey,
    pub processed: usize,
    pub total: usize,
}

/// Fields are populated for every event even if a consumer ignores some.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    PhaseStarted {
        phase: Phase,
        total: usize,
    },
    ItemStarted {
        phase: Phase,
        label: String,
    },
    ItemCompleted {
        phase: Phase,
        label: String,
        detail: Option<String>,
        processed: usize,
        total: usize,
        /// Set for page titles; sitemap fetches have no single category.
        category: Option<CategoryProgress>,
    },
    ItemFailed {
        phase: Phase,
        label: String,
        error: String,
        processed: usize,
        total: usize,
    },
    /// Every URL of one selected leaf sitemap has a title.
    SitemapCompleted {
        category: CategoryKey,
        sitemap: String,
        urls: usize,
    },
    PhaseCompleted {
        phase: Phase,
        processed: usize,
        total: usize,
        cancelled: bool,
    },
}

/// Optional sink for progress events.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<PipelineEvent>>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that drops every event.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: PipelineEvent) {
        if let Some(tx) = &self.tx {
            // A closed receiver just means nobody is watching progress.
            let _ = tx.send(event);
        }
    }
}
