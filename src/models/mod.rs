//! Data models shared by the discovery and enrichment phases.

mod category;
mod index;
mod page;

pub use category::{categorize, normalize_filename, sitemap_filename, CategoryKey};
pub use index::{CategoryIndex, CategoryIndexEntry};
pub use page::{CategorizedResult, CategorySection, PageRecord};
