//! Live progress display for pipeline runs.
//!
//! Events arrive on a channel from the worker pool and drive one
//! `indicatif` bar per phase. Lines printed while a bar is visible must go
//! through [`progress_println`] so the bar is redrawn below them. Log
//! output does the same through [`ProgressWriter`].

use std::io::{self, Write};
use std::sync::Mutex;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;
use tracing_subscriber::fmt::MakeWriter;

use sitemapper::models::sitemap_filename;
use sitemapper::pipeline::{EventSink, Phase, PipelineEvent};

static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Print a line without corrupting the active progress bar, if any.
pub fn progress_println(msg: &str) {
    match active_bar() {
        Some(bar) => bar.println(msg),
        None => println!("{}", msg),
    }
}

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().ok().and_then(|bar| bar.clone())
}

/// Stderr log writer that hides the active bar while a line is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressWriter;

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let write = || io::stderr().lock().write_all(buf);
        match active_bar() {
            Some(bar) => bar.suspend(write)?,
            None => write()?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for ProgressWriter {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

fn set_active(bar: Option<ProgressBar>) {
    if let Ok(mut active) = ACTIVE_BAR.lock() {
        *active = bar;
    }
}

/// Background task rendering pipeline events.
pub struct ProgressDisplay {
    handle: JoinHandle<()>,
}

impl ProgressDisplay {
    /// Wait until every event has been rendered.
    ///
    /// Completes once all senders of the paired [`EventSink`] are dropped.
    pub async fn finish(self) {
        if let Err(e) = self.handle.await {
            warn!("Progress display failed: {}", e);
        }
    }
}

/// Start a progress display and return the sink that feeds it.
pub fn spawn() -> (EventSink, ProgressDisplay) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(render_events(rx));
    (EventSink::new(tx), ProgressDisplay { handle })
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-")
}

async fn render_events(mut rx: mpsc::UnboundedReceiver<PipelineEvent>) {
    let mut bar: Option<ProgressBar> = None;

    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::PhaseStarted { phase, total } => {
                if total == 0 {
                    continue;
                }
                let pb = ProgressBar::new(total as u64);
                pb.set_style(bar_style());
                pb.set_prefix(phase.to_string());
                set_active(Some(pb.clone()));
                bar = Some(pb);
            }
            PipelineEvent::ItemStarted { label, .. } => {
                if let Some(pb) = &bar {
                    pb.set_message(label);
                }
            }
            PipelineEvent::ItemCompleted {
                phase,
                label,
                detail,
                category,
                ..
            } => {
                let Some(pb) = &bar else { continue };
                pb.inc(1);
                if let Some(progress) = category {
                    pb.set_message(format!(
                        "{} {}/{}",
                        progress.category.label(),
                        progress.processed,
                        progress.total
                    ));
                }
                if let (Phase::Expand | Phase::Classify, Some(detail)) = (phase, detail) {
                    pb.println(format!("  {} {}: {}", style("✓").green(), label, detail));
                }
            }
            // Failures are already reported as warnings by the fetch layer.
            PipelineEvent::ItemFailed { .. } => {
                if let Some(pb) = &bar {
                    pb.inc(1);
                }
            }
            PipelineEvent::SitemapCompleted { sitemap, urls, .. } => {
                if let Some(pb) = &bar {
                    pb.println(format!(
                        "  {} {} ({} URLs)",
                        style("✓").green(),
                        sitemap_filename(&sitemap),
                        urls
                    ));
                }
            }
            PipelineEvent::PhaseCompleted {
                phase,
                processed,
                total,
                cancelled,
            } => {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
                set_active(None);
                if cancelled {
                    println!(
                        "{} {} cancelled after {}/{}",
                        style("!").yellow(),
                        phase,
                        processed,
                        total
                    );
                } else if total > 0 {
                    println!("{} {}: {}/{}", style("✓").green(), phase, processed, total);
                }
            }
        }
    }

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }
    set_active(None);
}
