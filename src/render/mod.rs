//! Static HTML rendering of a categorized result.
//!
//! Output depends only on the input: no timestamps, no randomness, so the
//! same result always renders to the same bytes.

use std::fmt::Write;

use crate::models::{CategorizedResult, CategoryKey, PageRecord};
use crate::utils::html_escape;

/// MIME type of the rendered document.
pub const CONTENT_TYPE: &str = "text/html";

const STYLE: &str = r#"        body {
            font-family: Arial, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 3px solid #4CAF50;
            padding-bottom: 10px;
        }
        h2 {
            color: #4CAF50;
            margin-top: 30px;
            margin-bottom: 15px;
        }
        ul {
            list-style-type: disc;
            padding-left: 20px;
        }
        li {
            margin: 8px 0;
        }
        a {
            color: #1a73e8;
            text-decoration: none;
        }
        a:hover {
            text-decoration: underline;
        }
        .section {
            margin-bottom: 40px;
        }"#;

/// Categories of `order` present in `result`, first occurrence only.
fn sections<'a>(
    result: &'a CategorizedResult,
    order: &'a [CategoryKey],
) -> impl Iterator<Item = (CategoryKey, &'a [PageRecord])> + 'a {
    order.iter().enumerate().filter_map(move |(i, &category)| {
        if order[..i].contains(&category) {
            return None;
        }
        result.get(category).map(|records| (category, records))
    })
}

/// Render `result` as a standalone HTML5 document with one section per
/// category in `order`. Categories absent from `result` are skipped.
pub fn render(result: &CategorizedResult, order: &[CategoryKey]) -> String {
    let mut body = String::new();
    for (category, records) in sections(result, order) {
        // Writing to a String cannot fail.
        let _ = writeln!(
            body,
            "<div class=\"section\">\n<h2>{}</h2>\n<ul>",
            html_escape(category.label())
        );
        for record in records {
            let _ = writeln!(
                body,
                "<li><a href=\"{}\">{}</a></li>",
                html_escape(&record.url),
                html_escape(&record.title)
            );
        }
        body.push_str("</ul>\n</div>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>HTML Sitemap</title>
    <style>
{}
    </style>
</head>
<body>
    <h1>HTML Sitemap</h1>
{}</body>
</html>
"#,
        STYLE, body
    )
}

/// Plain-text preview: the first `limit` records of each category in
/// `order`, with a count of the rest.
pub fn preview(result: &CategorizedResult, order: &[CategoryKey], limit: usize) -> String {
    let mut out = String::new();
    for (category, records) in sections(result, order) {
        let _ = writeln!(out, "{} ({} pages)", category.label(), records.len());
        for record in records.iter().take(limit) {
            let _ = writeln!(out, "  • {} ({})", record.title, record.url);
        }
        if records.len() > limit {
            let _ = writeln!(out, "  ...and {} more", records.len() - limit);
        }
    }
    out
}
