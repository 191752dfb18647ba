//! Enrichment: fetch every page of the selected categories and resolve its
//! title.
//!
//! Selected leaf sitemaps are re-fetched rather than taken from discovery,
//! so a sitemap that changed in between is read fresh. Titles resolve
//! concurrently; records are reassembled in category, sitemap and URL
//! order once the pool is done.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Settings;
use crate::discovery::fetch::fetch_sitemaps;
use crate::error::SitemapError;
use crate::models::{sitemap_filename, CategorizedResult, CategoryIndex, CategoryKey, PageRecord};
use crate::pipeline::{
    CancelSignal, CategoryProgress, EventSink, Phase, PipelineEvent, PoolUpdate, WorkPool,
};
use crate::scrapers::{SitemapSource, TitleSource};
use crate::utils::truncate_url;

/// Maximum characters of a page URL shown in progress labels.
const LABEL_WIDTH: usize = 60;

/// Outcome of an enrichment run.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub result: CategorizedResult,
    /// Records whose title fell back to the page URL.
    pub fallbacks: usize,
    /// Whether the run was cut short; `result` holds the completed records.
    pub cancelled: bool,
}

/// A selected leaf sitemap and the category it was discovered under.
#[derive(Debug, Clone)]
struct SelectedSitemap {
    category: CategoryKey,
    url: String,
}

#[derive(Debug, Clone)]
struct TitleJob {
    category: CategoryKey,
    sitemap: usize,
    position: usize,
    url: String,
}

/// Resolves page titles for selected categories.
pub struct Enricher {
    sitemaps: Arc<dyn SitemapSource>,
    titles: Arc<dyn TitleSource>,
    workers: usize,
    events: EventSink,
    cancel: CancelSignal,
}

impl Enricher {
    pub fn new(sitemaps: Arc<dyn SitemapSource>, titles: Arc<dyn TitleSource>) -> Self {
        Self {
            sitemaps,
            titles,
            workers: Settings::default().workers,
            events: EventSink::none(),
            cancel: CancelSignal::never(),
        }
    }

    pub fn from_settings(
        sitemaps: Arc<dyn SitemapSource>,
        titles: Arc<dyn TitleSource>,
        settings: &Settings,
    ) -> Self {
        Self::new(sitemaps, titles).with_workers(settings.workers)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Build page records for `selected` categories of `index`.
    ///
    /// Categories appear in the result in selection order, and only when at
    /// least one record was produced for them. Repeated selections count
    /// once; categories missing from `index` are ignored.
    pub async fn enrich(
        &self,
        index: &CategoryIndex,
        selected: &[CategoryKey],
    ) -> Result<Enrichment, SitemapError> {
        if selected.is_empty() {
            return Err(SitemapError::NoCategoriesSelected);
        }

        let pool = WorkPool::new(self.workers, self.cancel.clone());
        let sitemaps = selected_sitemaps(index, selected);
        let urls: Vec<String> = sitemaps.iter().map(|s| s.url.clone()).collect();

        let fetched = fetch_sitemaps(
            &pool,
            &self.sitemaps,
            &self.events,
            Phase::FetchSitemaps,
            &urls,
            sitemap_filename,
            |_, doc| format!("{} URLs", doc.url_count()),
        )
        .await;

        let pages: Vec<Vec<String>> = fetched
            .into_iter()
            .zip(&sitemaps)
            .map(|(slot, sitemap)| match slot.map(|r| r.map(|doc| doc.into_page_urls())) {
                Some(Ok(Some(urls))) => urls,
                Some(Ok(None)) => {
                    debug!("Skipping {}: no longer a non-empty leaf sitemap", sitemap.url);
                    Vec::new()
                }
                _ => Vec::new(),
            })
            .collect();

        let jobs: Vec<TitleJob> = pages
            .iter()
            .enumerate()
            .flat_map(|(sitemap, urls)| {
                let category = sitemaps[sitemap].category;
                urls.iter().enumerate().map(move |(position, url)| TitleJob {
                    category,
                    sitemap,
                    position,
                    url: url.clone(),
                })
            })
            .collect();

        let (titles, fallbacks) = self.resolve_titles(&pool, &sitemaps, &pages, &jobs).await;

        let mut result = CategorizedResult::new();
        for ((sitemap, urls), titles) in sitemaps.iter().zip(&pages).zip(titles) {
            let records: Vec<PageRecord> = urls
                .iter()
                .zip(titles)
                .filter_map(|(url, title)| title.map(|t| PageRecord::new(t, url.clone())))
                .collect();
            if !records.is_empty() {
                result.extend(sitemap.category, records);
            }
        }

        let cancelled = pool.is_cancelled();
        info!(
            "Generated {} records across {} categories ({} untitled)",
            result.total_records(),
            result.sections().len(),
            fallbacks
        );

        Ok(Enrichment {
            result,
            fallbacks,
            cancelled,
        })
    }

    /// Resolve every job's title. Returns titles laid out per sitemap and
    /// position, `None` where the job never completed, plus the number of
    /// fallbacks.
    async fn resolve_titles(
        &self,
        pool: &WorkPool,
        sitemaps: &[SelectedSitemap],
        pages: &[Vec<String>],
        jobs: &[TitleJob],
    ) -> (Vec<Vec<Option<String>>>, usize) {
        let phase = Phase::ResolveTitles;
        let total = jobs.len();
        self.events.emit(PipelineEvent::PhaseStarted { phase, total });

        let mut titles: Vec<Vec<Option<String>>> =
            pages.iter().map(|urls| vec![None; urls.len()]).collect();
        let mut remaining: Vec<usize> = pages.iter().map(Vec::len).collect();
        let mut per_category = category_totals(jobs);
        let mut processed = 0;
        let mut fallbacks = 0;

        let source = self.titles.clone();
        let summary = pool
            .run(
                jobs,
                move |job: TitleJob| {
                    let source = source.clone();
                    async move { source.resolve(&job.url).await }
                },
                |update| match update {
                    PoolUpdate::Started(i) => self.events.emit(PipelineEvent::ItemStarted {
                        phase,
                        label: truncate_url(&jobs[i].url, LABEL_WIDTH),
                    }),
                    PoolUpdate::Finished(i, outcome) => {
                        let job = &jobs[i];
                        processed += 1;
                        if outcome.is_fallback() {
                            fallbacks += 1;
                        }
                        let title = outcome.into_title();

                        self.events.emit(PipelineEvent::ItemCompleted {
                            phase,
                            label: truncate_url(&job.url, LABEL_WIDTH),
                            detail: Some(title.clone()),
                            processed,
                            total,
                            category: per_category
                                .iter_mut()
                                .find(|c| c.category == job.category)
                                .map(|c| {
                                    c.processed += 1;
                                    *c
                                }),
                        });
                        titles[job.sitemap][job.position] = Some(title);

                        remaining[job.sitemap] -= 1;
                        if remaining[job.sitemap] == 0 {
                            let sitemap = &sitemaps[job.sitemap];
                            self.events.emit(PipelineEvent::SitemapCompleted {
                                category: sitemap.category,
                                sitemap: sitemap.url.clone(),
                                urls: pages[job.sitemap].len(),
                            });
                        }
                    }
                },
            )
            .await;

        self.events.emit(PipelineEvent::PhaseCompleted {
            phase,
            processed: summary.completed,
            total,
            cancelled: summary.cancelled,
        });

        (titles, fallbacks)
    }
}

/// Zeroed progress counters with each category's job count, in job order.
fn category_totals(jobs: &[TitleJob]) -> Vec<CategoryProgress> {
    let mut totals: Vec<CategoryProgress> = Vec::new();
    for job in jobs {
        match totals.iter_mut().find(|c| c.category == job.category) {
            Some(progress) => progress.total += 1,
            None => totals.push(CategoryProgress {
                category: job.category,
                processed: 0,
                total: 1,
            }),
        }
    }
    totals
}

/// Leaf sitemaps of the selected categories, grouped by category in
/// selection order with each category's sitemaps in discovery order.
fn selected_sitemaps(index: &CategoryIndex, selected: &[CategoryKey]) -> Vec<SelectedSitemap> {
    let mut seen = Vec::new();
    let mut sitemaps = Vec::new();
    for &category in selected {
        if seen.contains(&category) {
            continue;
        }
        seen.push(category);
        if let Some(entry) = index.get(category) {
            sitemaps.extend(entry.sitemaps.iter().map(|url| SelectedSitemap {
                category,
                url: url.clone(),
            }));
        }
    }
    sitemaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::sync::mpsc;

    use crate::pipeline::cancel_pair;
    use crate::testing::{urlset_xml, FakeSitemaps, FakeTitles};

    fn index() -> CategoryIndex {
        let mut index = CategoryIndex::new();
        index.record(
            CategoryKey::PostSitemap,
            "https://e.com/post-sitemap1.xml".into(),
            3,
        );
        index.record(
            CategoryKey::PageSitemap,
            "https://e.com/page-sitemap1.xml".into(),
            2,
        );
        index.record(
            CategoryKey::PostSitemap,
            "https://e.com/post-sitemap2.xml".into(),
            1,
        );
        index
    }

    fn sitemaps() -> FakeSitemaps {
        FakeSitemaps::new()
            .with(
                "https://e.com/post-sitemap1.xml",
                urlset_xml(&["https://e.com/a", "https://e.com/b", "https://e.com/c"]),
            )
            .with(
                "https://e.com/post-sitemap2.xml",
                urlset_xml(&["https://e.com/d"]),
            )
            .with(
                "https://e.com/page-sitemap1.xml",
                urlset_xml(&["https://e.com/about", "https://e.com/contact"]),
            )
    }

    fn titles() -> FakeTitles {
        FakeTitles::new()
            .with("https://e.com/a", "Post A")
            .with("https://e.com/b", "Post B")
            .with("https://e.com/c", "Post C")
            .with("https://e.com/d", "Post D")
            .with("https://e.com/about", "About")
            .with("https://e.com/contact", "Contact")
    }

    fn urls(records: &[PageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.url.as_str()).collect()
    }

    #[tokio::test]
    async fn only_selected_categories_are_enriched() {
        let enricher = Enricher::new(Arc::new(sitemaps()), Arc::new(titles()));
        let enrichment = enricher
            .enrich(&index(), &[CategoryKey::PostSitemap])
            .await
            .unwrap();

        let result = enrichment.result;
        assert_eq!(result.categories(), vec![CategoryKey::PostSitemap]);
        assert!(result.get(CategoryKey::PageSitemap).is_none());
        let posts = result.get(CategoryKey::PostSitemap).unwrap();
        assert_eq!(
            urls(posts),
            vec!["https://e.com/a", "https://e.com/b", "https://e.com/c", "https://e.com/d"]
        );
        assert_eq!(posts[0].title, "Post A");
        assert_eq!(enrichment.fallbacks, 0);
        assert!(!enrichment.cancelled);
    }

    #[tokio::test]
    async fn order_follows_selection_not_completion() {
        let titles = titles()
            .slow("https://e.com/a", Duration::from_millis(40))
            .slow("https://e.com/about", Duration::from_millis(20));
        let enricher = Enricher::new(Arc::new(sitemaps()), Arc::new(titles)).with_workers(6);

        let result = enricher
            .enrich(
                &index(),
                &[CategoryKey::PageSitemap, CategoryKey::PostSitemap],
            )
            .await
            .unwrap()
            .result;

        assert_eq!(
            result.categories(),
            vec![CategoryKey::PageSitemap, CategoryKey::PostSitemap]
        );
        assert_eq!(
            urls(result.get(CategoryKey::PageSitemap).unwrap()),
            vec!["https://e.com/about", "https://e.com/contact"]
        );
        assert_eq!(
            urls(result.get(CategoryKey::PostSitemap).unwrap()),
            vec!["https://e.com/a", "https://e.com/b", "https://e.com/c", "https://e.com/d"]
        );
    }

    #[tokio::test]
    async fn failed_title_falls_back_to_url() {
        let titles = FakeTitles::new().with("https://e.com/about", "About");
        let enricher = Enricher::new(Arc::new(sitemaps()), Arc::new(titles));
        let enrichment = enricher
            .enrich(&index(), &[CategoryKey::PageSitemap])
            .await
            .unwrap();

        let pages = enrichment.result.get(CategoryKey::PageSitemap).unwrap();
        assert_eq!(pages[0], PageRecord::new("About", "https://e.com/about"));
        assert_eq!(
            pages[1],
            PageRecord::new("https://e.com/contact", "https://e.com/contact")
        );
        assert_eq!(enrichment.fallbacks, 1);
    }

    #[tokio::test]
    async fn changed_or_missing_sitemaps_are_skipped() {
        let sitemaps = FakeSitemaps::new()
            .with("https://e.com/post-sitemap1.xml", urlset_xml(&[]))
            .with("https://e.com/post-sitemap2.xml", urlset_xml(&["https://e.com/d"]));
        let enricher = Enricher::new(Arc::new(sitemaps), Arc::new(titles()));

        let result = enricher
            .enrich(
                &index(),
                &[CategoryKey::PostSitemap, CategoryKey::PageSitemap],
            )
            .await
            .unwrap()
            .result;

        assert_eq!(result.categories(), vec![CategoryKey::PostSitemap]);
        assert_eq!(
            urls(result.get(CategoryKey::PostSitemap).unwrap()),
            vec!["https://e.com/d"]
        );
    }

    #[tokio::test]
    async fn unknown_and_repeated_categories() {
        let titles = Arc::new(titles());
        let enricher = Enricher::new(Arc::new(sitemaps()), titles.clone());
        let result = enricher
            .enrich(
                &index(),
                &[
                    CategoryKey::ProductSitemap,
                    CategoryKey::PageSitemap,
                    CategoryKey::PageSitemap,
                ],
            )
            .await
            .unwrap()
            .result;

        assert_eq!(result.categories(), vec![CategoryKey::PageSitemap]);
        assert_eq!(result.total_records(), 2);
        assert_eq!(titles.lookup_count(), 2);
    }

    #[tokio::test]
    async fn empty_selection_is_rejected() {
        let titles = Arc::new(titles());
        let enricher = Enricher::new(Arc::new(sitemaps()), titles.clone());
        let err = enricher.enrich(&index(), &[]).await.unwrap_err();
        assert!(matches!(err, SitemapError::NoCategoriesSelected));
        assert_eq!(titles.lookup_count(), 0);
    }

    #[tokio::test]
    async fn reports_progress_per_url_and_sitemap() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let enricher = Enricher::new(Arc::new(sitemaps()), Arc::new(titles()))
            .with_events(EventSink::new(tx));
        enricher
            .enrich(
                &index(),
                &[CategoryKey::PostSitemap, CategoryKey::PageSitemap],
            )
            .await
            .unwrap();
        drop(enricher);

        let mut completed_titles = 0;
        let mut completed_sitemaps = Vec::new();
        let mut last_processed = 0;
        let mut last_per_category: Vec<CategoryProgress> = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                PipelineEvent::ItemCompleted {
                    phase: Phase::ResolveTitles,
                    processed,
                    total,
                    category,
                    ..
                } => {
                    completed_titles += 1;
                    assert_eq!(total, 6);
                    assert!(processed > last_processed);
                    last_processed = processed;

                    let progress = category.unwrap();
                    let expected_total = match progress.category {
                        CategoryKey::PostSitemap => 4,
                        CategoryKey::PageSitemap => 2,
                        other => panic!("unexpected category {:?}", other),
                    };
                    assert_eq!(progress.total, expected_total);
                    match last_per_category
                        .iter_mut()
                        .find(|c| c.category == progress.category)
                    {
                        Some(last) => {
                            assert_eq!(progress.processed, last.processed + 1);
                            *last = progress;
                        }
                        None => {
                            assert_eq!(progress.processed, 1);
                            last_per_category.push(progress);
                        }
                    }
                }
                PipelineEvent::ItemCompleted {
                    phase: Phase::FetchSitemaps,
                    category,
                    ..
                } => assert!(category.is_none()),
                PipelineEvent::SitemapCompleted { sitemap, urls, .. } => {
                    completed_sitemaps.push((sitemap, urls));
                }
                _ => {}
            }
        }

        assert_eq!(completed_titles, 6);
        for progress in &last_per_category {
            assert_eq!(progress.processed, progress.total);
        }
        assert_eq!(last_per_category.len(), 2);
        completed_sitemaps.sort();
        assert_eq!(
            completed_sitemaps,
            vec![
                ("https://e.com/page-sitemap1.xml".to_string(), 2),
                ("https://e.com/post-sitemap1.xml".to_string(), 3),
                ("https://e.com/post-sitemap2.xml".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn cancellation_keeps_completed_records() {
        let (handle, signal) = cancel_pair();
        let titles = titles().slow("https://e.com/c", Duration::from_secs(30));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let enricher = Enricher::new(Arc::new(sitemaps()), Arc::new(titles))
            .with_workers(1)
            .with_events(EventSink::new(tx))
            .with_cancel(signal);

        let run = tokio::spawn(async move {
            enricher
                .enrich(&index(), &[CategoryKey::PostSitemap])
                .await
        });

        while let Some(event) = rx.recv().await {
            if let PipelineEvent::ItemStarted { label, .. } = event {
                if label == "https://e.com/c" {
                    handle.cancel();
                    break;
                }
            }
        }

        let enrichment = run.await.unwrap().unwrap();
        assert!(enrichment.cancelled);
        assert_eq!(
            urls(enrichment.result.get(CategoryKey::PostSitemap).unwrap()),
            vec!["https://e.com/a", "https://e.com/b"]
        );
    }
}
