//! Concurrent sitemap fetching with progress reporting.

use std::sync::Arc;

use tracing::warn;

use crate::pipeline::{EventSink, Phase, PipelineEvent, PoolUpdate, WorkPool};
use crate::scrapers::{FetchError, SitemapDocument, SitemapSource};

/// Outcome slot for one requested sitemap. `None` means the fetch never
/// completed because the run was cancelled.
pub(crate) type FetchSlot = Option<Result<SitemapDocument, FetchError>>;

/// Fetch every URL in `urls` on the pool.
///
/// Returned slots line up with `urls` regardless of completion order.
/// Failures are logged as one-line warnings and reported as `ItemFailed`.
pub(crate) async fn fetch_sitemaps<L, D>(
    pool: &WorkPool,
    source: &Arc<dyn SitemapSource>,
    events: &EventSink,
    phase: Phase,
    urls: &[String],
    label: L,
    describe: D,
) -> Vec<FetchSlot>
where
    L: Fn(&str) -> String,
    D: Fn(&str, &SitemapDocument) -> String,
{
    let total = urls.len();
    events.emit(PipelineEvent::PhaseStarted { phase, total });

    let mut slots: Vec<FetchSlot> = (0..total).map(|_| None).collect();
    let mut processed = 0;

    let source = source.clone();
    let summary = pool
        .run(
            urls,
            move |url: String| {
                let source = source.clone();
                async move { source.fetch(&url).await }
            },
            |update| match update {
                PoolUpdate::Started(i) => events.emit(PipelineEvent::ItemStarted {
                    phase,
                    label: label(urls[i].as_str()),
                }),
                PoolUpdate::Finished(i, result) => {
                    processed += 1;
                    match &result {
                        Ok(doc) => events.emit(PipelineEvent::ItemCompleted {
                            phase,
                            label: label(urls[i].as_str()),
                            detail: Some(describe(urls[i].as_str(), doc)),
                            processed,
                            total,
                            category: None,
                        }),
                        Err(e) => {
                            warn!("Error parsing {}: {}", urls[i], e);
                            events.emit(PipelineEvent::ItemFailed {
                                phase,
                                label: label(urls[i].as_str()),
                                error: e.to_string(),
                                processed,
                                total,
                            });
                        }
                    }
                    slots[i] = Some(result);
                }
            },
        )
        .await;

    events.emit(PipelineEvent::PhaseCompleted {
        phase,
        processed: summary.completed,
        total,
        cancelled: summary.cancelled,
    });

    slots
}
