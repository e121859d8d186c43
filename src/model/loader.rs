//! Progressive loader for paginated portal collections.
//!
//! Populates a growing in-memory record collection for one category as fast
//! as perceptible without blocking the UI: page 1 is awaited, pages 2-5 are
//! fetched as one concurrent burst, and any remaining pages trickle in as
//! concurrent batches of 10 in the background. Category switches bump a
//! generation counter; results from a superseded run are discarded at
//! commit time rather than cancelled on the wire.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Mutex;

use super::content::{ContentPage, ContentRecord};

/// Last page fetched in the initial concurrent burst.
pub const BURST_LAST_PAGE: u32 = 5;
/// Pages per background batch.
pub const BATCH_SIZE: u32 = 10;

/// Identifies the paginated collection being loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListSource {
    KoshCategory(u64),
    Quotes,
}

impl ListSource {
    fn describe(&self) -> String {
        match self {
            ListSource::KoshCategory(id) => format!("kosh category {id}"),
            ListSource::Quotes => "quotes".to_string(),
        }
    }
}

/// Seam between the loader and the gateway so list loading is testable
/// against a mock backend.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, source: &ListSource, page: u32) -> Result<ContentPage>;
}

/// In-memory state for the collection currently being loaded. Created on
/// every category switch, never persisted.
#[derive(Clone, Debug, Default)]
pub struct LoadState {
    pub source: Option<ListSource>,
    pub records: Vec<ContentRecord>,
    pub total_pages: u32,
    pub next_page: u32,
    pub background_active: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct ProgressiveLoader<F> {
    fetcher: Arc<F>,
    state: Arc<Mutex<LoadState>>,
    generation: Arc<AtomicU64>,
}

impl<F> Clone for ProgressiveLoader<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            state: self.state.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<F: PageFetcher + 'static> ProgressiveLoader<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            state: Arc::new(Mutex::new(LoadState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn snapshot(&self) -> LoadState {
        self.state.lock().await.clone()
    }

    /// Claim the generation for a new selection. Must be called at the
    /// selection point, before spawning `load`, so a later selection always
    /// outranks an earlier one even when the runtime polls the spawned
    /// tasks out of spawn order.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Load all pages of a collection under a generation claimed by
    /// [`begin`](Self::begin). Runs the three phases to completion (or until
    /// superseded); callers spawn this so the UI keeps drawing.
    pub async fn load(&self, generation: u64, source: ListSource) {
        {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            *state = LoadState {
                source: Some(source.clone()),
                is_loading: true,
                next_page: 1,
                ..Default::default()
            };
        }

        tracing::debug!(source = %source.describe(), "loading first page");
        let first = self.fetcher.fetch_page(&source, 1).await;

        let total_pages = {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            match first {
                Ok(page) => {
                    state.records = page.records;
                    state.total_pages = page.total_pages.max(1);
                    state.next_page = 2;
                    state.is_loading = false;
                    state.total_pages
                }
                Err(e) => {
                    tracing::error!(source = %source.describe(), error = %e, "first page load failed");
                    state.error = Some(e.to_string());
                    state.is_loading = false;
                    return;
                }
            }
        };

        if total_pages <= 1 {
            return;
        }

        // Burst: pages 2..=min(5, total), merged only once all have settled.
        let burst_end = total_pages.min(BURST_LAST_PAGE);
        match self.fetch_range(&source, 2..=burst_end).await {
            Ok(records) => {
                if !self.commit(generation, burst_end + 1, records).await {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(source = %source.describe(), error = %e, "burst load failed");
                return;
            }
        }

        if total_pages <= BURST_LAST_PAGE {
            return;
        }

        // Background trickle for the rest.
        {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation || state.background_active {
                return;
            }
            state.background_active = true;
        }

        let mut next = BURST_LAST_PAGE + 1;
        while next <= total_pages {
            if self.generation.load(Ordering::SeqCst) != generation {
                break;
            }
            let batch_end = total_pages.min(next + BATCH_SIZE - 1);
            match self.fetch_range(&source, next..=batch_end).await {
                Ok(records) => {
                    if !self.commit(generation, batch_end + 1, records).await {
                        break;
                    }
                }
                Err(e) => {
                    // Best-effort: already-merged pages stay, the trickle stops.
                    tracing::warn!(
                        source = %source.describe(),
                        from = next,
                        to = batch_end,
                        error = %e,
                        "background batch failed, stopping"
                    );
                    break;
                }
            }
            next = batch_end + 1;
        }

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            state.background_active = false;
        }
    }

    /// Fetch a page range concurrently and flatten in page-number order.
    /// Waits for every request to settle; any failed page fails the range.
    async fn fetch_range(
        &self,
        source: &ListSource,
        pages: RangeInclusive<u32>,
    ) -> Result<Vec<ContentRecord>> {
        let requests: Vec<_> = pages
            .map(|page| {
                let fetcher = self.fetcher.clone();
                let source = source.clone();
                async move { fetcher.fetch_page(&source, page).await }
            })
            .collect();

        let settled = join_all(requests).await;

        let mut merged = Vec::new();
        for result in settled {
            merged.extend(result?.records);
        }
        Ok(merged)
    }

    async fn commit(&self, generation: u64, next_page: u32, mut records: Vec<ContentRecord>) -> bool {
        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding stale page results");
            return false;
        }
        state.records.append(&mut records);
        state.next_page = next_page;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Semaphore;

    struct MockBackend {
        /// total pages and records-per-page, keyed by kosh category id.
        categories: HashMap<u64, (u32, usize)>,
        calls: std::sync::Mutex<Vec<(u64, u32)>>,
        /// Categories whose pages >= 2 block until permits are available.
        gate: Option<(u64, Arc<Semaphore>)>,
    }

    impl MockBackend {
        fn new(categories: &[(u64, u32, usize)]) -> Self {
            Self {
                categories: categories
                    .iter()
                    .map(|&(id, pages, per_page)| (id, (pages, per_page)))
                    .collect(),
                calls: std::sync::Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn calls(&self) -> Vec<(u64, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for MockBackend {
        async fn fetch_page(&self, source: &ListSource, page: u32) -> Result<ContentPage> {
            let ListSource::KoshCategory(id) = source else {
                anyhow::bail!("unexpected source");
            };
            if let Some((gated, sem)) = &self.gate {
                if gated == id && page >= 2 {
                    let _permit = sem.acquire().await?;
                }
            }
            self.calls.lock().unwrap().push((*id, page));
            let (total_pages, per_page) = *self
                .categories
                .get(id)
                .ok_or_else(|| anyhow::anyhow!("unknown category"))?;
            let records = (0..per_page)
                .map(|i| ContentRecord {
                    // Encodes (category, page, slot) so ordering is checkable.
                    id: id * 100_000 + u64::from(page) * 100 + i as u64,
                    name: format!("entry {page}-{i}"),
                    ..Default::default()
                })
                .collect();
            Ok(ContentPage { records, total_pages })
        }
    }

    #[tokio::test]
    async fn single_page_issues_exactly_one_request() {
        let backend = Arc::new(MockBackend::new(&[(1, 1, 4)]));
        let loader = ProgressiveLoader::new(backend.clone());

        loader.load(loader.begin(), ListSource::KoshCategory(1)).await;

        assert_eq!(backend.calls(), vec![(1, 1)]);
        let state = loader.snapshot().await;
        assert_eq!(state.records.len(), 4);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn twelve_pages_issue_one_burst_and_one_batch() {
        let backend = Arc::new(MockBackend::new(&[(1, 12, 3)]));
        let loader = ProgressiveLoader::new(backend.clone());

        loader.load(loader.begin(), ListSource::KoshCategory(1)).await;

        // 1 (first page) + 4 (burst, pages 2-5) + 7 (single batch, pages 6-12).
        let calls = backend.calls();
        assert_eq!(calls.len(), 12);
        let pages: Vec<u32> = calls.iter().map(|&(_, p)| p).collect();
        let mut sorted = pages.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=12).collect::<Vec<_>>());

        let state = loader.snapshot().await;
        assert_eq!(state.records.len(), 12 * 3);
        assert!(!state.background_active);
    }

    #[tokio::test]
    async fn merge_order_follows_page_order() {
        let backend = Arc::new(MockBackend::new(&[(2, 10, 5)]));
        let loader = ProgressiveLoader::new(backend.clone());

        loader.load(loader.begin(), ListSource::KoshCategory(2)).await;

        let state = loader.snapshot().await;
        assert_eq!(state.records.len(), 10 * 5);
        // Record ids ascend with (page, slot), so page order == id order.
        let ids: Vec<u64> = state.records.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(state.total_pages, 10);
        assert_eq!(state.next_page, 11);
    }

    #[tokio::test]
    async fn first_page_failure_sets_error_state() {
        let backend = Arc::new(MockBackend::new(&[(1, 1, 4)]));
        let loader = ProgressiveLoader::new(backend.clone());

        loader.load(loader.begin(), ListSource::KoshCategory(99)).await;

        let state = loader.snapshot().await;
        assert!(state.error.is_some());
        assert!(state.records.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn stale_results_never_merge_after_category_switch() {
        let sem = Arc::new(Semaphore::new(0));
        let mut backend = MockBackend::new(&[(1, 3, 4), (2, 1, 2)]);
        backend.gate = Some((1, sem.clone()));
        let backend = Arc::new(backend);
        let loader = ProgressiveLoader::new(backend.clone());

        // Old category: page 1 lands, burst blocks on the gate.
        let old_loader = loader.clone();
        let old_generation = loader.begin();
        let old_run = tokio::spawn(async move {
            old_loader.load(old_generation, ListSource::KoshCategory(1)).await;
        });
        loop {
            let state = loader.snapshot().await;
            if state.total_pages == 3 && !state.records.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }

        // User switches category before the old burst settles.
        loader.load(loader.begin(), ListSource::KoshCategory(2)).await;

        // Release the old burst; its results must be discarded silently.
        sem.add_permits(16);
        old_run.await.unwrap();

        let state = loader.snapshot().await;
        assert_eq!(state.source, Some(ListSource::KoshCategory(2)));
        assert_eq!(state.records.len(), 2);
        assert!(state.records.iter().all(|r| r.id / 100_000 == 2));
    }

    #[tokio::test]
    async fn later_selection_wins_even_when_its_task_runs_first() {
        let backend = Arc::new(MockBackend::new(&[(1, 1, 4), (2, 1, 2)]));
        let loader = ProgressiveLoader::new(backend.clone());

        // Selections happen in order 1 then 2, but the runtime polls the
        // second run to completion before the first run ever starts.
        let first = loader.load(loader.begin(), ListSource::KoshCategory(1));
        loader.load(loader.begin(), ListSource::KoshCategory(2)).await;
        first.await;

        let state = loader.snapshot().await;
        assert_eq!(state.source, Some(ListSource::KoshCategory(2)));
        assert!(state.records.iter().all(|r| r.id / 100_000 == 2));
        assert_eq!(state.records.len(), 2);
    }
}
