//! Category index built during discovery.

use serde::Serialize;

use super::category::CategoryKey;

/// Leaf sitemaps observed for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryIndexEntry {
    pub category: CategoryKey,
    /// Leaf sitemap URLs in discovery order.
    pub sitemaps: Vec<String>,
    /// Total page URLs across `sitemaps` at discovery time.
    pub url_count: usize,
}

/// Category -> leaf sitemaps, in order of first observation.
///
/// Only categories with at least one non-empty leaf sitemap appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryIndex {
    entries: Vec<CategoryIndexEntry>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a non-empty leaf sitemap under `category`.
    pub fn record(&mut self, category: CategoryKey, sitemap: String, url_count: usize) {
        match self.entries.iter_mut().find(|e| e.category == category) {
            Some(entry) => {
                entry.sitemaps.push(sitemap);
                entry.url_count += url_count;
            }
            None => self.entries.push(CategoryIndexEntry {
                category,
                sitemaps: vec![sitemap],
                url_count,
            }),
        }
    }

    pub fn get(&self, category: CategoryKey) -> Option<&CategoryIndexEntry> {
        self.entries.iter().find(|e| e.category == category)
    }

    pub fn contains(&self, category: CategoryKey) -> bool {
        self.get(category).is_some()
    }

    pub fn entries(&self) -> &[CategoryIndexEntry] {
        &self.entries
    }

    /// Discovered categories in display order.
    pub fn categories(&self) -> Vec<CategoryKey> {
        self.entries.iter().map(|e| e.category).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total URLs across all categories.
    pub fn total_urls(&self) -> usize {
        self.entries.iter().map(|e| e.url_count).sum()
    }

    /// Total leaf sitemaps across all categories.
    pub fn total_sitemaps(&self) -> usize {
        self.entries.iter().map(|e| e.sitemaps.len()).sum()
    }

    /// Sum of discovered URL counts for the selected categories.
    ///
    /// Unknown and repeated categories are counted once at most.
    pub fn selected_url_count(&self, selected: &[CategoryKey]) -> usize {
        self.entries
            .iter()
            .filter(|e| selected.contains(&e.category))
            .map(|e| e.url_count)
            .sum()
    }
}
