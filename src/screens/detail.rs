//! Detail screen: one cached item, looked up by id.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::error_text;
use crate::domain::{Item, Outcome};
use crate::mvi::{EffectQueue, Intent, Reducer, ScreenScope, StateCell, UiState};
use crate::repository::ItemRepository;

/// Navigation arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailArgs {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState {
    pub id: i64,
    pub item: Option<Item>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl DetailState {
    fn loading(id: i64) -> Self {
        Self {
            id,
            item: None,
            is_loading: true,
            error_message: None,
        }
    }
}

impl UiState for DetailState {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailIntent {
    ClickBack,
    Retry,
}

impl Intent for DetailIntent {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEffect {
    NavigateBack,
    ShowErrorMessage(String),
}

enum DetailMutation {
    Loading,
    Loaded(Outcome<Item>),
}

struct DetailReducer;

impl Reducer for DetailReducer {
    type State = DetailState;
    type Mutation = DetailMutation;

    fn reduce(state: &DetailState, mutation: DetailMutation) -> DetailState {
        match mutation {
            DetailMutation::Loading | DetailMutation::Loaded(Outcome::Loading) => DetailState {
                is_loading: true,
                error_message: None,
                ..state.clone()
            },
            DetailMutation::Loaded(Outcome::Success(item)) => DetailState {
                id: state.id,
                item: Some(item),
                is_loading: false,
                error_message: None,
            },
            // A failed load drops whatever was shown before.
            DetailMutation::Loaded(Outcome::Error(cause)) => DetailState {
                id: state.id,
                item: None,
                is_loading: false,
                error_message: Some(error_text(&cause)),
            },
        }
    }
}

pub struct DetailScreen {
    repo: Arc<dyn ItemRepository>,
    state: Arc<StateCell<DetailState>>,
    effects: Arc<EffectQueue<DetailEffect>>,
    scope: ScreenScope,
}

impl DetailScreen {
    /// Publishes `{id, is_loading: true}` and starts the lookup right away.
    pub fn new(repo: Arc<dyn ItemRepository>, args: DetailArgs) -> Self {
        let screen = Self {
            repo,
            state: Arc::new(StateCell::new(DetailState::loading(args.id))),
            effects: Arc::new(EffectQueue::new()),
            scope: ScreenScope::new("detail"),
        };
        screen.launch_fetch();
        screen
    }

    pub fn state(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> DetailState {
        self.state.current()
    }

    pub fn post_intent(&self, intent: DetailIntent) {
        match intent {
            DetailIntent::ClickBack => {
                self.effects.emit(DetailEffect::NavigateBack);
            }
            DetailIntent::Retry => {
                if !self.scope.is_open() {
                    debug!("Retry ignored, detail screen closed");
                    return;
                }
                if self.state.current().is_loading {
                    debug!("Retry ignored, lookup already in flight");
                    return;
                }
                self.state.apply::<DetailReducer>(DetailMutation::Loading);
                self.launch_fetch();
            }
        }
    }

    pub async fn next_effect(&self) -> Option<DetailEffect> {
        tokio::select! {
            effect = self.effects.next() => Some(effect),
            _ = self.scope.closed() => self.effects.try_next(),
        }
    }

    pub fn try_next_effect(&self) -> Option<DetailEffect> {
        self.effects.try_next()
    }

    pub fn close(&self) {
        self.scope.close();
    }

    fn launch_fetch(&self) {
        let repo = Arc::clone(&self.repo);
        let state = Arc::clone(&self.state);
        let effects = Arc::clone(&self.effects);
        let token = self.scope.token();
        let id = state.current().id;

        self.scope.launch(async move {
            let outcome = repo.item(id).await;
            if token.is_cancelled() {
                debug!(id, "Discarding lookup for a closed detail screen");
                return;
            }

            let message = match &outcome {
                Outcome::Error(cause) => Some(error_text(cause)),
                Outcome::Loading | Outcome::Success(_) => None,
            };
            state.apply::<DetailReducer>(DetailMutation::Loaded(outcome));
            if let Some(message) = message {
                effects.emit(DetailEffect::ShowErrorMessage(message));
            }
        });
    }
}
