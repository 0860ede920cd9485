//! List screen: the paged item feed.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error_text;
use crate::app::PostdeckError;
use crate::domain::Item;
use crate::mvi::{EffectQueue, Intent, Reducer, ScreenScope, StateCell, UiState};
use crate::paging::{LoadState, PagedView, PagingSnapshot};
use crate::repository::ItemRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub items: Arc<Vec<Item>>,
    pub is_loading: bool,
    pub is_appending: bool,
    pub end_reached: bool,
    pub error_message: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            is_loading: true,
            is_appending: false,
            end_reached: false,
            error_message: None,
        }
    }
}

impl UiState for ListState {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListIntent {
    ClickItem(i64),
    /// The row at this position was drawn.
    ItemVisible(usize),
    Retry,
    Refresh,
}

impl Intent for ListIntent {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEffect {
    NavigateToDetails(i64),
    ShowErrorMessage(String),
}

struct ListReducer;

impl Reducer for ListReducer {
    type State = ListState;
    type Mutation = PagingSnapshot;

    fn reduce(_state: &ListState, snapshot: PagingSnapshot) -> ListState {
        let error = snapshot.refresh.error().or_else(|| snapshot.append.error());
        ListState {
            items: snapshot.items,
            is_loading: snapshot.refresh.is_loading(),
            is_appending: snapshot.append.is_loading(),
            end_reached: matches!(snapshot.append, LoadState::NotLoading { end_reached: true }),
            error_message: error.map(|cause| error_text(cause)),
        }
    }
}

/// Failures already shown to the user, so each one surfaces once.
#[derive(Default)]
struct ReportedErrors {
    refresh: Option<Arc<PostdeckError>>,
    append: Option<Arc<PostdeckError>>,
}

impl ReportedErrors {
    fn unseen(&mut self, snapshot: &PagingSnapshot) -> Vec<String> {
        let mut fresh = Vec::new();
        for (load, seen) in [
            (&snapshot.refresh, &mut self.refresh),
            (&snapshot.append, &mut self.append),
        ] {
            if let Some(cause) = load.error() {
                let known = seen.as_ref().is_some_and(|prev| Arc::ptr_eq(prev, cause));
                if !known {
                    fresh.push(error_text(cause));
                    *seen = Some(Arc::clone(cause));
                }
            }
        }
        fresh
    }
}

pub struct ListScreen {
    view: PagedView,
    state: Arc<StateCell<ListState>>,
    effects: Arc<EffectQueue<ListEffect>>,
    scope: ScreenScope,
}

impl ListScreen {
    /// Binds to a fresh paged view and requests its first page.
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self {
        let screen = Self {
            view: repo.paged_items(),
            state: Arc::new(StateCell::new(ListState::default())),
            effects: Arc::new(EffectQueue::new()),
            scope: ScreenScope::new("list"),
        };

        // Subscribe before anything loads so no snapshot is missed.
        let snapshots = screen.view.subscribe();
        let invalidations = screen.view.invalidations();
        screen.scope.launch(bind(
            screen.view.clone(),
            snapshots,
            invalidations,
            Arc::clone(&screen.state),
            Arc::clone(&screen.effects),
            screen.scope.token(),
        ));

        let view = screen.view.clone();
        screen.scope.launch(async move { view.access(0).await });
        screen
    }

    pub fn state(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ListState {
        self.state.current()
    }

    pub fn post_intent(&self, intent: ListIntent) {
        let view = self.view.clone();
        match intent {
            ListIntent::ClickItem(id) => {
                self.effects.emit(ListEffect::NavigateToDetails(id));
            }
            ListIntent::ItemVisible(index) => {
                self.scope.launch(async move { view.access(index).await });
            }
            ListIntent::Retry => {
                self.scope.launch(async move { view.retry().await });
            }
            ListIntent::Refresh => {
                self.scope.launch(async move { view.refresh().await });
            }
        }
    }

    pub async fn next_effect(&self) -> Option<ListEffect> {
        tokio::select! {
            effect = self.effects.next() => Some(effect),
            _ = self.scope.closed() => self.effects.try_next(),
        }
    }

    pub fn try_next_effect(&self) -> Option<ListEffect> {
        self.effects.try_next()
    }

    pub fn close(&self) {
        self.scope.close();
    }
}

/// Folds paging snapshots into list state and restarts the view when the
/// store changes underneath it.
async fn bind(
    view: PagedView,
    mut snapshots: watch::Receiver<PagingSnapshot>,
    mut invalidations: watch::Receiver<u64>,
    state: Arc<StateCell<ListState>>,
    effects: Arc<EffectQueue<ListEffect>>,
    token: CancellationToken,
) {
    let mut reported = ReportedErrors::default();
    invalidations.mark_unchanged();

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if token.is_cancelled() {
                    break;
                }
                for message in reported.unseen(&snapshot) {
                    effects.emit(ListEffect::ShowErrorMessage(message));
                }
                state.apply::<ListReducer>(snapshot);
            }
            changed = invalidations.changed() => {
                if changed.is_err() {
                    break;
                }
                invalidations.mark_unchanged();
                if view.reload_if_stale().await {
                    debug!("Store changed, list restarted from the first page");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::NewItem;
    use crate::paging::PagingConfig;
    use crate::repository::CachedItemRepository;
    use crate::screens::testing::wait_for;
    use crate::store::{ItemStore, SqliteStore};
    use crate::sync::testing::{records, ScriptedRemote};
    use crate::sync::SyncMediator;

    type Script = Vec<std::result::Result<Vec<crate::domain::RemoteRecord>, String>>;

    struct Fixture {
        store: Arc<dyn ItemStore>,
        remote: Arc<ScriptedRemote>,
        screen: ListScreen,
    }

    fn fixture(remote: ScriptedRemote) -> Fixture {
        let store: Arc<dyn ItemStore> = Arc::new(SqliteStore::in_memory().unwrap());
        let remote = Arc::new(remote);
        let mediator = Arc::new(SyncMediator::new(remote.clone(), store.clone(), 1, 20));
        let repo = Arc::new(CachedItemRepository::new(
            store.clone(),
            mediator,
            PagingConfig::default(),
        ));
        Fixture {
            store,
            remote,
            screen: ListScreen::new(repo),
        }
    }

    fn scripted(script: Script) -> Fixture {
        fixture(ScriptedRemote::new(script))
    }

    fn titles(state: &ListState) -> Vec<String> {
        state.items.iter().map(|i| i.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_first_page_loads_without_explicit_fetch() {
        let f = scripted(vec![Ok(records("p", 3))]);
        let state = wait_for(&mut f.screen.state(), |s| !s.is_loading).await;

        assert_eq!(titles(&state), vec!["p-0", "p-1", "p-2"]);
        assert!(state.end_reached);
        assert_eq!(state.error_message, None);
        assert_eq!(f.remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_reports_one_error_effect() {
        let f = scripted(vec![Err("network down".into())]);
        let state = wait_for(&mut f.screen.state(), |s| s.error_message.is_some()).await;

        assert!(!state.is_loading);
        assert!(state.items.is_empty());
        assert_eq!(state.error_message.as_deref(), Some("network down"));
        assert_eq!(
            f.screen.next_effect().await,
            Some(ListEffect::ShowErrorMessage("network down".into()))
        );

        // Later snapshots carrying the same failure stay quiet.
        f.screen.post_intent(ListIntent::ItemVisible(0));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(f.screen.try_next_effect(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_goes_loading_then_success() {
        let f = fixture(
            ScriptedRemote::new(vec![Err("network down".into()), Ok(records("second", 2))])
                .with_delay(Duration::from_millis(100)),
        );
        let mut rx = f.screen.state();

        wait_for(&mut rx, |s| s.error_message.is_some()).await;
        assert_eq!(
            f.screen.next_effect().await,
            Some(ListEffect::ShowErrorMessage("network down".into()))
        );

        f.screen.post_intent(ListIntent::Retry);

        rx.changed().await.unwrap();
        let loading = rx.borrow_and_update().clone();
        assert!(loading.is_loading);
        assert_eq!(loading.error_message, None);

        rx.changed().await.unwrap();
        let done = rx.borrow_and_update().clone();
        assert!(!done.is_loading);
        assert_eq!(done.error_message, None);
        assert_eq!(titles(&done), vec!["second-0", "second-1"]);
        assert_eq!(f.remote.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_cached_rows() {
        let f = scripted(vec![Ok(records("kept", 4)), Err("offline".into())]);
        let mut rx = f.screen.state();
        wait_for(&mut rx, |s| s.items.len() == 4).await;

        f.screen.post_intent(ListIntent::Refresh);
        let state = wait_for(&mut rx, |s| s.error_message.is_some()).await;

        assert_eq!(state.items.len(), 4);
        assert_eq!(state.error_message.as_deref(), Some("offline"));
    }

    #[tokio::test]
    async fn test_scrolling_appends_cached_pages() {
        let f = scripted(vec![Ok(records("p", 50))]);
        let mut rx = f.screen.state();
        let first = wait_for(&mut rx, |s| !s.is_loading && !s.items.is_empty()).await;
        assert_eq!(first.items.len(), 20);
        assert!(!first.end_reached);

        f.screen.post_intent(ListIntent::ItemVisible(16));
        let more = wait_for(&mut rx, |s| s.items.len() == 40).await;
        assert_eq!(more.items[39].title, "p-39");

        f.screen.post_intent(ListIntent::ItemVisible(36));
        let all = wait_for(&mut rx, |s| s.end_reached).await;
        assert_eq!(all.items.len(), 50);
        assert_eq!(f.remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_outside_write_restarts_list() {
        let f = scripted(vec![Ok(records("p", 2))]);
        let mut rx = f.screen.state();
        wait_for(&mut rx, |s| s.items.len() == 2).await;

        f.store
            .insert_all(&[NewItem::new("late", "https://img/late")])
            .unwrap();

        let state = wait_for(&mut rx, |s| s.items.len() == 3).await;
        assert_eq!(state.items[2].title, "late");
    }

    #[tokio::test]
    async fn test_click_item_navigates() {
        let f = scripted(vec![Ok(records("p", 3))]);
        wait_for(&mut f.screen.state(), |s| !s.is_loading).await;

        f.screen.post_intent(ListIntent::ClickItem(2));
        assert_eq!(f.screen.try_next_effect(), Some(ListEffect::NavigateToDetails(2)));
    }

    #[tokio::test]
    async fn test_unconsumed_effect_is_replaced() {
        let f = scripted(vec![Ok(records("p", 3))]);
        wait_for(&mut f.screen.state(), |s| !s.is_loading).await;

        f.screen.post_intent(ListIntent::ClickItem(1));
        f.screen.post_intent(ListIntent::ClickItem(2));

        assert_eq!(f.screen.next_effect().await, Some(ListEffect::NavigateToDetails(2)));
        assert_eq!(f.screen.try_next_effect(), None);
    }

    #[tokio::test]
    async fn test_closed_screen_stops_loading() {
        let f = scripted(vec![Ok(records("p", 3))]);
        wait_for(&mut f.screen.state(), |s| !s.is_loading).await;

        f.screen.close();
        f.screen.post_intent(ListIntent::Refresh);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(f.remote.calls(), 1);
        assert_eq!(f.screen.next_effect().await, None);
    }
}
