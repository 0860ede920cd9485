//! UI state and the latest-value cell that publishes it.

use tokio::sync::watch;

use super::reducer::Reducer;

/// Marker trait for UI state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data needed to render the view)
/// - Comparable (PartialEq so unchanged states are not republished)
pub trait UiState: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {}

/// Latest-value broadcast cell.
///
/// New subscribers see the current state immediately. Values are published
/// in production order; a slow subscriber may skip intermediate values but
/// never observes an older value after a newer one.
pub struct StateCell<S: UiState> {
    tx: watch::Sender<S>,
}

impl<S: UiState> StateCell<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Fold `mutation` into the current state with reducer `R`.
    ///
    /// Returns whether a new value was published.
    pub fn apply<R>(&self, mutation: R::Mutation) -> bool
    where
        R: Reducer<State = S>,
    {
        self.tx.send_if_modified(|state| {
            let next = R::reduce(state, mutation);
            if next == *state {
                return false;
            }
            *state = next;
            true
        })
    }
}
