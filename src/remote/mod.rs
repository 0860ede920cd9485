pub mod http_source;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::RemoteRecord;

pub use http_source::HttpRemoteSource;

/// Network source of item records.
///
/// The upstream endpoint is not truly paginated: one call returns the
/// whole collection and `page`/`limit` are passed through as-is.
#[async_trait]
pub trait RemoteSource {
    async fn list_items(&self, page: u32, limit: u32) -> Result<Vec<RemoteRecord>>;
}
