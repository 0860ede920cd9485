//! Base trait for intents (user actions) posted to a screen.

/// Marker trait for intent objects.
///
/// Intents are dispatched synchronously; any suspending work they start is
/// launched in the screen's scope.
pub trait Intent: Send + 'static {}
