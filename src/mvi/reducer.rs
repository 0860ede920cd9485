//! Reducer trait for MVI state transitions.

use super::state::UiState;

/// The only place where state transitions happen.
///
/// `reduce` must be pure: no I/O, no effects, no suspension.
pub trait Reducer {
    type State: UiState;

    /// Internal event the reducer folds into state (fetch started, fetch
    /// resolved, snapshot arrived...).
    type Mutation;

    fn reduce(state: &Self::State, mutation: Self::Mutation) -> Self::State;
}
