use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::app::{PostdeckError, Result};
use crate::domain::Item;
use crate::paging::PagingConfig;
use crate::store::{run_blocking, ItemStore};
use crate::sync::{MediatorOutcome, SyncMediator};

#[derive(Debug, Clone)]
pub enum LoadState {
    NotLoading { end_reached: bool },
    Loading,
    Error(Arc<PostdeckError>),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&Arc<PostdeckError>> {
        match self {
            LoadState::Error(cause) => Some(cause),
            LoadState::NotLoading { .. } | LoadState::Loading => None,
        }
    }
}

/// What a consumer of a [`PagedView`] sees at one point in time.
#[derive(Debug, Clone)]
pub struct PagingSnapshot {
    pub items: Arc<Vec<Item>>,
    pub refresh: LoadState,
    pub append: LoadState,
    /// Total cached items; only filled when placeholders are enabled.
    pub total_count: Option<usize>,
}

impl Default for PagingSnapshot {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            refresh: LoadState::NotLoading { end_reached: false },
            append: LoadState::NotLoading { end_reached: false },
            total_count: None,
        }
    }
}

struct Cursor {
    items: Arc<Vec<Item>>,
    refresh: LoadState,
    append: LoadState,
    total_count: Option<usize>,
    /// Store generation the loaded pages were read from.
    generation: Option<u64>,
    exhausted: bool,
    reconciled: bool,
}

struct Shared {
    store: Arc<dyn ItemStore>,
    mediator: Arc<SyncMediator>,
    config: PagingConfig,
    cursor: Mutex<Cursor>,
    snapshot: watch::Sender<PagingSnapshot>,
}

/// Lazily loaded, position-stable sequence of cached items.
///
/// The first access reconciles the cache with the remote source once and
/// then serves pages from the store only. Every call that loads takes the
/// cursor lock, so loads never interleave and concurrent first accesses
/// still reconcile exactly once.
#[derive(Clone)]
pub struct PagedView {
    shared: Arc<Shared>,
}

impl PagedView {
    pub fn new(store: Arc<dyn ItemStore>, mediator: Arc<SyncMediator>, config: PagingConfig) -> Self {
        let (snapshot, _) = watch::channel(PagingSnapshot::default());
        let cursor = Cursor {
            items: Arc::new(Vec::new()),
            refresh: LoadState::NotLoading { end_reached: false },
            append: LoadState::NotLoading { end_reached: false },
            total_count: None,
            generation: None,
            exhausted: false,
            reconciled: false,
        };

        Self {
            shared: Arc::new(Shared {
                store,
                mediator,
                config,
                cursor: Mutex::new(cursor),
                snapshot,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PagingSnapshot> {
        self.shared.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> PagingSnapshot {
        self.shared.snapshot.borrow().clone()
    }

    pub fn invalidations(&self) -> watch::Receiver<u64> {
        self.shared.store.invalidations()
    }

    /// Make sure position `index` is loaded, prefetching ahead of it.
    pub async fn access(&self, index: usize) {
        let mut cursor = self.shared.cursor.lock().await;

        if !cursor.reconciled {
            self.refresh_locked(&mut cursor).await;
        } else if self.is_stale(&cursor) {
            self.reload_locked(&mut cursor).await;
        }

        let prefetch = self.shared.config.prefetch_distance;
        while !cursor.exhausted
            && cursor.append.error().is_none()
            && index.saturating_add(prefetch) >= cursor.items.len()
        {
            if !self.append_locked(&mut cursor).await {
                break;
            }
        }
    }

    /// Reconcile again and restart from the first page.
    pub async fn refresh(&self) {
        let mut cursor = self.shared.cursor.lock().await;
        self.refresh_locked(&mut cursor).await;
    }

    /// Re-run whatever failed last: the refresh, or the failed page.
    pub async fn retry(&self) {
        let mut cursor = self.shared.cursor.lock().await;

        if !cursor.reconciled || cursor.refresh.error().is_some() {
            self.refresh_locked(&mut cursor).await;
        } else if cursor.append.error().is_some() {
            self.append_locked(&mut cursor).await;
        }
    }

    /// Restart from the first page if the store was written since the
    /// pages were read. Returns whether a reload happened.
    pub async fn reload_if_stale(&self) -> bool {
        let mut cursor = self.shared.cursor.lock().await;
        if !cursor.reconciled || !self.is_stale(&cursor) {
            return false;
        }
        self.reload_locked(&mut cursor).await;
        true
    }

    fn current_generation(&self) -> u64 {
        *self.shared.store.invalidations().borrow()
    }

    fn is_stale(&self, cursor: &Cursor) -> bool {
        cursor.generation != Some(self.current_generation())
    }

    fn page_size(&self) -> usize {
        self.shared.config.page_size.max(1)
    }

    async fn refresh_locked(&self, cursor: &mut Cursor) {
        cursor.refresh = LoadState::Loading;
        self.publish(cursor);

        cursor.refresh = match self.shared.mediator.reconcile().await {
            MediatorOutcome::Success { end_reached } => LoadState::NotLoading { end_reached },
            MediatorOutcome::Failure(cause) => LoadState::Error(cause),
        };
        cursor.reconciled = true;

        // Whatever the cache holds stays visible, even after a failure.
        self.reload_locked(cursor).await;
    }

    async fn reload_locked(&self, cursor: &mut Cursor) {
        let generation = self.current_generation();

        match self.load_page(0).await {
            Ok(page) => {
                debug!("Loaded first page: {} items (generation {})", page.len(), generation);
                cursor.exhausted = page.len() < self.page_size();
                cursor.items = Arc::new(page);
                cursor.generation = Some(generation);
                cursor.append = LoadState::NotLoading {
                    end_reached: cursor.exhausted,
                };
            }
            Err(e) => {
                cursor.refresh = LoadState::Error(Arc::new(e));
            }
        }

        self.update_total_count(cursor).await;
        self.publish(cursor);
    }

    async fn append_locked(&self, cursor: &mut Cursor) -> bool {
        // Appending to pages read from an older generation would mix
        // snapshots; start over instead and let the next access continue.
        if self.is_stale(cursor) {
            self.reload_locked(cursor).await;
            return false;
        }

        cursor.append = LoadState::Loading;
        self.publish(cursor);

        let offset = cursor.items.len();
        let loaded = match self.load_page(offset).await {
            Ok(page) => {
                debug!("Loaded page at offset {}: {} items", offset, page.len());
                cursor.exhausted = page.len() < self.page_size();
                Arc::make_mut(&mut cursor.items).extend(page);
                cursor.append = LoadState::NotLoading {
                    end_reached: cursor.exhausted,
                };
                true
            }
            Err(e) => {
                cursor.append = LoadState::Error(Arc::new(e));
                false
            }
        };

        self.update_total_count(cursor).await;
        self.publish(cursor);
        loaded
    }

    async fn load_page(&self, offset: usize) -> Result<Vec<Item>> {
        let limit = self.page_size();
        run_blocking(&self.shared.store, move |store| store.query_page(offset, limit)).await
    }

    async fn update_total_count(&self, cursor: &mut Cursor) {
        if !self.shared.config.enable_placeholders {
            return;
        }
        // A failed count only loses the placeholder hint.
        cursor.total_count = run_blocking(&self.shared.store, |store| store.count())
            .await
            .ok();
    }

    fn publish(&self, cursor: &Cursor) {
        self.shared.snapshot.send_replace(PagingSnapshot {
            items: Arc::clone(&cursor.items),
            refresh: cursor.refresh.clone(),
            append: cursor.append.clone(),
            total_count: cursor.total_count,
        });
    }
}
