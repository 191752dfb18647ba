//! Page records produced by enrichment.

use serde::Serialize;

use super::category::CategoryKey;

/// A page listed in a sitemap with its display title.
///
/// `title` equals `url` when the title could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub title: String,
    pub url: String,
}

impl PageRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Records for one category, in sitemap order then URL order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySection {
    pub category: CategoryKey,
    pub records: Vec<PageRecord>,
}

/// Category -> page records, in the order categories were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategorizedResult {
    sections: Vec<CategorySection>,
}

impl CategorizedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records to `category`, creating its section if needed.
    pub fn extend(&mut self, category: CategoryKey, records: impl IntoIterator<Item = PageRecord>) {
        match self.sections.iter_mut().find(|s| s.category == category) {
            Some(section) => section.records.extend(records),
            None => self.sections.push(CategorySection {
                category,
                records: records.into_iter().collect(),
            }),
        }
    }

    pub fn get(&self, category: CategoryKey) -> Option<&[PageRecord]> {
        self.sections
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.records.as_slice())
    }

    pub fn sections(&self) -> &[CategorySection] {
        &self.sections
    }

    pub fn categories(&self) -> Vec<CategoryKey> {
        self.sections.iter().map(|s| s.category).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.sections.iter().map(|s| s.records.len()).sum()
    }

    /// Record counts for each category of `order` present in the result.
    pub fn counts(&self, order: &[CategoryKey]) -> Vec<(CategoryKey, usize)> {
        let mut seen = Vec::new();
        order
            .iter()
            .filter(|c| {
                if seen.contains(*c) {
                    false
                } else {
                    seen.push(**c);
                    true
                }
            })
            .filter_map(|c| self.get(*c).map(|records| (*c, records.len())))
            .collect()
    }
}
