//! Sitemap categories inferred from filenames.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Semantic category of a leaf sitemap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    #[value(name = "post")]
    PostSitemap,
    #[value(name = "page")]
    PageSitemap,
    #[value(name = "category")]
    CategorySitemap,
    #[value(name = "tag")]
    TagSitemap,
    #[value(name = "author")]
    AuthorSitemap,
    #[value(name = "product")]
    ProductSitemap,
    #[value(name = "other")]
    OtherSitemap,
}

impl CategoryKey {
    /// Human-readable section name.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKey::PostSitemap => "Post Sitemap",
            CategoryKey::PageSitemap => "Page Sitemap",
            CategoryKey::CategorySitemap => "Category Sitemap",
            CategoryKey::TagSitemap => "Tag Sitemap",
            CategoryKey::AuthorSitemap => "Author Sitemap",
            CategoryKey::ProductSitemap => "Product Sitemap",
            CategoryKey::OtherSitemap => "Other Sitemap",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn digit_runs() -> &'static regex::Regex {
    static DIGITS: OnceLock<regex::Regex> = OnceLock::new();
    DIGITS.get_or_init(|| regex::Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Final path segment of a sitemap URL.
pub fn sitemap_filename(sitemap_url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(sitemap_url) {
        if let Some(segment) = parsed.path_segments().and_then(|mut s| s.next_back()) {
            return segment.to_string();
        }
    }
    sitemap_url
        .split('/')
        .next_back()
        .unwrap_or(sitemap_url)
        .to_string()
}

/// Normalize a filename for matching: lowercase, digit runs and `.xml`
/// removed, hyphens turned into spaces, trimmed.
pub fn normalize_filename(filename: &str) -> String {
    let lower = filename.to_lowercase();
    digit_runs()
        .replace_all(&lower, "")
        .replace(".xml", "")
        .replace('-', " ")
        .trim()
        .to_string()
}

/// Categorize a sitemap from its filename. First matching rule wins.
pub fn categorize(sitemap_url: &str) -> CategoryKey {
    let name = normalize_filename(&sitemap_filename(sitemap_url));

    if name.contains("post") && name.contains("sitemap") {
        CategoryKey::PostSitemap
    } else if name.contains("page") && name.contains("sitemap") {
        CategoryKey::PageSitemap
    } else if name.contains("category") {
        CategoryKey::CategorySitemap
    } else if name.contains("tag") {
        CategoryKey::TagSitemap
    } else if name.contains("author") {
        CategoryKey::AuthorSitemap
    } else if name.contains("product") {
        CategoryKey::ProductSitemap
    } else {
        CategoryKey::OtherSitemap
    }
}
