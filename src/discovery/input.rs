//! Seed URL input parsing.

/// Split free text into sitemap URLs: one per line, trimmed, blank lines
/// dropped.
pub fn parse_sitemap_input(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
