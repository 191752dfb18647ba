//! Sitemapper - XML to HTML sitemap converter.
//!
//! Discovers and categorizes the leaf sitemaps behind one or more sitemap
//! URLs, then builds a browsable HTML sitemap from the selected categories.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "sitemapper=info"
    } else {
        "sitemapper=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(cli::ProgressWriter))
        .init();

    cli::run().await
}
