//! Shared helper functions for CLI commands.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use console::style;

use sitemapper::discovery::{Discoverer, Discovery};
use sitemapper::pipeline::{cancel_pair, CancelSignal};
use sitemapper::scrapers::{SitemapFetcher, SitemapSource};
use sitemapper::{parse_sitemap_input, Settings, SitemapError};

use super::progress::{self, progress_println};

/// Collect seed URLs from positional arguments and an optional input file.
///
/// A path of `-` reads from stdin.
pub fn read_seeds(urls: &[String], input: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let mut text = urls.join("\n");

    if let Some(path) = input {
        let contents = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read sitemap URLs from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path).map_err(|source| SitemapError::Io {
                path: path.to_path_buf(),
                source,
            })?
        };
        text.push('\n');
        text.push_str(&contents);
    }

    Ok(parse_sitemap_input(&text))
}

/// Cancel the active phase on Ctrl-C. A second Ctrl-C exits immediately.
pub fn cancel_on_ctrl_c() -> CancelSignal {
    let (handle, signal) = cancel_pair();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        handle.cancel();
        progress_println(&format!(
            "{} Cancelling, keeping results collected so far (Ctrl-C again to quit)",
            style("!").yellow()
        ));

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    signal
}

/// HTTP sitemap source configured from settings.
pub fn sitemap_source(settings: &Settings) -> Result<Arc<dyn SitemapSource>, SitemapError> {
    Ok(Arc::new(SitemapFetcher::new(settings.sitemap_client()?)))
}

/// Run discovery with live progress.
pub async fn discover(
    settings: &Settings,
    source: Arc<dyn SitemapSource>,
    seeds: &[String],
    cancel: CancelSignal,
) -> Result<Discovery, SitemapError> {
    if seeds.is_empty() {
        return Err(SitemapError::NoInput);
    }

    println!(
        "{} Discovering sitemaps from {} URL(s)",
        style("→").cyan(),
        seeds.len()
    );

    let (events, display) = progress::spawn();
    let result = Discoverer::from_settings(source, settings)
        .with_events(events)
        .with_cancel(cancel)
        .discover(seeds)
        .await;
    display.finish().await;

    result
}

/// Print a run-level error with its remediation hint.
///
/// Returns `Err` for errors that should end the process with a failure.
pub fn report(err: SitemapError) -> anyhow::Result<()> {
    match err {
        SitemapError::NoInput | SitemapError::NothingDiscovered => {
            println!("{} {}", style("✗").red(), capitalize(&err.to_string()));
        }
        SitemapError::NoCategoriesSelected => {
            println!("{} {}", style("!").yellow(), capitalize(&err.to_string()));
        }
        other => return Err(other.into()),
    }
    if let Some(hint) = err.hint() {
        println!("  {} {}", style("→").dim(), hint);
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
