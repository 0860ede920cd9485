pub mod sqlite;

use std::sync::Arc;

use tokio::sync::watch;

use crate::app::Result;
use crate::domain::{Item, NewItem};

pub use sqlite::SqliteStore;

/// Write half of the store, handed out inside a transaction.
pub trait ItemWriter {
    fn clear_all(&self) -> Result<()>;
    /// Upsert: a row with an identical id is overwritten.
    fn insert_all(&self, items: &[NewItem]) -> Result<usize>;
}

pub trait ItemStore: Send + Sync {
    /// One page of items in insertion order.
    fn query_page(&self, offset: usize, limit: usize) -> Result<Vec<Item>>;
    fn count(&self) -> Result<usize>;
    fn get_by_id(&self, id: i64) -> Result<Option<Item>>;

    fn clear_all(&self) -> Result<()>;
    fn insert_all(&self, items: &[NewItem]) -> Result<usize>;

    /// Runs `f` as one atomic unit. Nothing `f` wrote survives if it
    /// returns an error.
    fn with_transaction(&self, f: &mut dyn FnMut(&dyn ItemWriter) -> Result<()>) -> Result<()>;

    /// Generation counter bumped after every committed write.
    fn invalidations(&self) -> watch::Receiver<u64>;
}

/// Run a store call on the blocking pool.
pub async fn run_blocking<T, F>(store: &Arc<dyn ItemStore>, f: F) -> Result<T>
where
    F: FnOnce(&dyn ItemStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(store.as_ref())).await?
}
