//! Discover command: categorize sitemaps without fetching pages.

use console::style;

use sitemapper::{CategoryIndex, Settings};

use crate::cli::helpers;

/// Print the per-category overview of a discovery run.
pub(super) fn print_overview(index: &CategoryIndex) {
    println!(
        "\n{} Found {} categories with {} total URLs",
        style("✓").green(),
        index.len(),
        index.total_urls()
    );
    println!("{}", "-".repeat(50));
    println!("{:<20} {:>10} {:>10}", "Category", "Sitemaps", "URLs");
    for entry in index.entries() {
        println!(
            "{:<20} {:>10} {:>10}",
            entry.category.label(),
            entry.sitemaps.len(),
            entry.url_count
        );
    }
    println!("{}", "-".repeat(50));
    println!(
        "{:<20} {:>10} {:>10}",
        "Total",
        index.total_sitemaps(),
        index.total_urls()
    );
}

pub async fn cmd_discover(settings: &Settings, seeds: &[String], json: bool) -> anyhow::Result<()> {
    let source = helpers::sitemap_source(settings)?;
    let cancel = helpers::cancel_on_ctrl_c();

    let discovery = match helpers::discover(settings, source, seeds, cancel).await {
        Ok(discovery) => discovery,
        Err(e) => return helpers::report(e),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&discovery.index)?);
    } else {
        print_overview(&discovery.index);
        if discovery.cancelled {
            println!(
                "{} Discovery was cancelled; the overview is incomplete",
                style("!").yellow()
            );
        }
    }

    Ok(())
}
