//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod discover;
mod generate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use sitemapper::{CategoryKey, Settings};

use super::helpers;

#[derive(Parser)]
#[command(name = "sitemapper")]
#[command(about = "Convert XML sitemaps into a categorized HTML sitemap")]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML). Built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User agent: "impersonate" for a random real browser, or a literal string
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Number of concurrent fetch workers
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Sitemap-index expansion rounds (default: 1)
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Where sitemap URLs come from.
#[derive(Args)]
struct InputArgs {
    /// Sitemap URLs (sitemap indexes or leaf sitemaps)
    urls: Vec<String>,

    /// Read sitemap URLs from a file, one per line ("-" for stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover and categorize sitemaps (does not fetch pages)
    Discover {
        #[command(flatten)]
        input: InputArgs,
        /// Output the category index as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discover sitemaps, fetch page titles and write the HTML sitemap
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Categories to include, in output order (default: all discovered)
        #[arg(short = 'C', long = "category", value_enum)]
        categories: Vec<CategoryKey>,
        /// Output file (default: sitemap.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print a text preview of each category
        #[arg(long)]
        preview: bool,
        /// Print the generated HTML to stdout
        #[arg(long)]
        print_html: bool,
    },
}

impl Cli {
    /// Settings from the config file with command-line overrides applied.
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(user_agent) = &self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(workers) = self.workers {
            settings.workers = workers;
        }
        if let Some(depth) = self.max_depth {
            settings.max_index_depth = depth;
        }
        if let Commands::Generate {
            output: Some(output),
            ..
        } = &self.command
        {
            settings.output = output.clone();
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    match cli.command {
        Commands::Discover { input, json } => {
            let seeds = helpers::read_seeds(&input.urls, input.input.as_deref())?;
            discover::cmd_discover(&settings, &seeds, json).await
        }
        Commands::Generate {
            input,
            categories,
            preview,
            print_html,
            ..
        } => {
            let seeds = helpers::read_seeds(&input.urls, input.input.as_deref())?;
            let options = generate::GenerateOptions {
                categories,
                preview,
                print_html,
            };
            generate::cmd_generate(&settings, &seeds, &options).await
        }
    }
}
