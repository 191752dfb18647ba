//! Display formatting helpers for progress output.

/// Shorten a URL for display, keeping the first `max_len` characters.
pub fn truncate_url(url: &str, max_len: usize) -> String {
    if url.chars().count() <= max_len {
        return url.to_string();
    }
    let prefix: String = url.chars().take(max_len).collect();
    format!("{}...", prefix)
}
