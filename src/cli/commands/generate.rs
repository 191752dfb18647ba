//! Generate command: discovery, enrichment and HTML output.

use std::sync::Arc;

use anyhow::Context;
use console::style;

use sitemapper::enrichment::Enricher;
use sitemapper::render::{self, CONTENT_TYPE};
use sitemapper::scrapers::{TitleResolver, TitleSource};
use sitemapper::{CategoryIndex, CategoryKey, Settings, SitemapError};

use super::discover::print_overview;
use crate::cli::helpers;
use crate::cli::progress;

pub struct GenerateOptions {
    pub categories: Vec<CategoryKey>,
    pub preview: bool,
    pub print_html: bool,
}

/// Resolve the requested categories against the index.
///
/// An empty request selects every discovered category. Unknown and
/// repeated categories are dropped.
fn select_categories(index: &CategoryIndex, requested: &[CategoryKey]) -> Vec<CategoryKey> {
    if requested.is_empty() {
        return index.categories();
    }

    let mut selected = Vec::new();
    for &category in requested {
        if !index.contains(category) {
            println!(
                "{} {} was not discovered, skipping",
                style("!").yellow(),
                category.label()
            );
        } else if !selected.contains(&category) {
            selected.push(category);
        }
    }
    selected
}

pub async fn cmd_generate(
    settings: &Settings,
    seeds: &[String],
    options: &GenerateOptions,
) -> anyhow::Result<()> {
    let sitemaps = helpers::sitemap_source(settings)?;
    let cancel = helpers::cancel_on_ctrl_c();

    let discovery = match helpers::discover(settings, sitemaps.clone(), seeds, cancel.clone()).await
    {
        Ok(discovery) => discovery,
        Err(e) => return helpers::report(e),
    };
    print_overview(&discovery.index);

    if discovery.cancelled {
        println!(
            "{} Discovery was cancelled; no pages were fetched",
            style("!").yellow()
        );
        return Ok(());
    }

    let selected = select_categories(&discovery.index, &options.categories);
    if selected.is_empty() {
        return helpers::report(SitemapError::NoCategoriesSelected);
    }

    println!(
        "\n{} Processing {} categories ({} URLs)",
        style("→").cyan(),
        selected.len(),
        discovery.index.selected_url_count(&selected)
    );

    let titles: Arc<dyn TitleSource> = Arc::new(TitleResolver::new(settings.page_client()?));
    let (events, display) = progress::spawn();
    let enrichment = Enricher::from_settings(sitemaps, titles, settings)
        .with_events(events)
        .with_cancel(cancel)
        .enrich(&discovery.index, &selected)
        .await;
    display.finish().await;

    let enrichment = match enrichment {
        Ok(enrichment) => enrichment,
        Err(e) => return helpers::report(e),
    };
    let result = enrichment.result;

    if enrichment.cancelled {
        println!(
            "{} Enrichment was cancelled; writing the pages collected so far",
            style("!").yellow()
        );
    }

    println!("\n{}", style("Statistics").bold());
    println!("{}", "-".repeat(50));
    for (category, count) in result.counts(&selected) {
        println!("{:<20} {:>10} pages", category.label(), count);
    }
    if enrichment.fallbacks > 0 {
        println!(
            "{} {} pages had no readable title; their URL is used instead",
            style("→").dim(),
            enrichment.fallbacks
        );
    }

    if result.is_empty() {
        println!("{} No pages were collected; nothing to write", style("!").yellow());
        return Ok(());
    }

    let html = render::render(&result, &selected);
    tokio::fs::write(&settings.output, &html)
        .await
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;
    println!(
        "\n{} Saved HTML sitemap to {} ({}, {} pages)",
        style("✓").green(),
        settings.output.display(),
        CONTENT_TYPE,
        result.total_records()
    );

    if options.preview {
        println!("\n{}", style("Preview").bold());
        print!(
            "{}",
            render::preview(&result, &selected, settings.preview_limit)
        );
    }

    if options.print_html {
        println!("\n{}", html);
    }

    Ok(())
}
