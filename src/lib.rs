//! Sitemapper - convert XML sitemaps into a categorized HTML sitemap.
//!
//! A run has two phases. Discovery resolves sitemap indexes into leaf
//! sitemaps and groups them by category without touching any page.
//! Enrichment fetches every page of the selected categories to read its
//! title. The result renders to a single standalone HTML document.

pub mod config;
pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod scrapers;
mod utils;

#[cfg(test)]
mod testing;

pub use config::Settings;
pub use discovery::{parse_sitemap_input, Discoverer, Discovery};
pub use enrichment::{Enricher, Enrichment};
pub use error::SitemapError;
pub use models::{categorize, CategorizedResult, CategoryIndex, CategoryKey, PageRecord};
pub use render::{preview, render};
pub use utils::truncate_url;
