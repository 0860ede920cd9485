use std::sync::Arc;

use crate::app::{PostdeckError, Result};

/// Result of a single-shot read: exactly one of loading, success or error.
///
/// The error cause is shared so outcomes stay cheap to clone into state.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Loading,
    Success(T),
    Error(Arc<PostdeckError>),
}

impl<T> Outcome<T> {
    pub fn error(err: PostdeckError) -> Self {
        Outcome::Error(Arc::new(err))
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Loading => Outcome::Loading,
            Outcome::Success(data) => Outcome::Success(f(data)),
            Outcome::Error(cause) => Outcome::Error(cause),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Outcome::Loading)
    }

    /// Message for display, or `None` unless this is an error.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Outcome::Error(cause) => Some(cause.to_string()),
            Outcome::Loading | Outcome::Success(_) => None,
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Outcome::Success(data),
            Err(err) => Outcome::error(err),
        }
    }
}
