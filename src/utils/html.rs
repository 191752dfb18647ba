//! HTML escaping utilities.

/// Escape HTML special characters for safe rendering in text and
/// double-quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(html_escape("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(html_escape("<b>bold</b>"), "&lt;b&gt;bold&lt;/b&gt;");
        assert_eq!(html_escape("plain title"), "plain title");
    }

    #[test]
    fn escapes_attribute_quotes() {
        assert_eq!(
            html_escape(r#"https://e.com/?q="a"&r='b'"#),
            "https://e.com/?q=&quot;a&quot;&amp;r=&#39;b&#39;"
        );
    }
}
