//! Paged reads over the local item cache.

pub mod view;

use serde::Deserialize;

pub use view::{LoadState, PagedView, PagingSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub page_size: usize,
    /// Load the next page once the reader is this many items from the end.
    pub prefetch_distance: usize,
    /// Carry the total cached count in snapshots.
    pub enable_placeholders: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            prefetch_distance: 5,
            enable_placeholders: false,
        }
    }
}
