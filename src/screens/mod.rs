//! Screen state machines driven by the TUI.

pub mod detail;
pub mod list;

use crate::app::PostdeckError;

pub use detail::{DetailArgs, DetailEffect, DetailIntent, DetailScreen, DetailState};
pub use list::{ListEffect, ListIntent, ListScreen, ListState};

/// Text shown to the user for a failed load.
pub(crate) fn error_text(cause: &PostdeckError) -> String {
    let message = cause.to_string();
    if message.trim().is_empty() {
        "Something went wrong".to_string()
    } else {
        message
    }
}
