//! Remote-to-local reconciliation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::PostdeckError;
use crate::domain::NewItem;
use crate::remote::RemoteSource;
use crate::store::{run_blocking, ItemStore};

/// Outcome of one reconcile pass.
#[derive(Debug, Clone)]
pub enum MediatorOutcome {
    Success { end_reached: bool },
    Failure(Arc<PostdeckError>),
}

/// Replaces the local cache with the remote collection.
///
/// The remote returns everything in one call, so a successful pass always
/// reports the end of pagination and nothing ever asks for a further page.
pub struct SyncMediator {
    remote: Arc<dyn RemoteSource + Send + Sync>,
    store: Arc<dyn ItemStore>,
    page: u32,
    limit: u32,
}

impl SyncMediator {
    pub fn new(
        remote: Arc<dyn RemoteSource + Send + Sync>,
        store: Arc<dyn ItemStore>,
        page: u32,
        limit: u32,
    ) -> Self {
        Self {
            remote,
            store,
            page,
            limit,
        }
    }

    pub async fn reconcile(&self) -> MediatorOutcome {
        let records = match self.remote.list_items(self.page, self.limit).await {
            Ok(records) => records,
            Err(e) => {
                warn!(remote = e.is_remote(), "Fetch failed, cache left untouched: {}", e);
                return MediatorOutcome::Failure(Arc::new(e));
            }
        };

        let items: Vec<NewItem> = records.into_iter().map(NewItem::from).collect();

        let replaced = run_blocking(&self.store, move |store| {
            let mut count = 0;
            store.with_transaction(&mut |tx| {
                tx.clear_all()?;
                count = tx.insert_all(&items)?;
                Ok(())
            })?;
            Ok(count)
        })
        .await;

        match replaced {
            Ok(count) => {
                info!("Replaced cache with {} items", count);
                MediatorOutcome::Success { end_reached: true }
            }
            Err(e) => {
                warn!("Cache replace rolled back: {}", e);
                MediatorOutcome::Failure(Arc::new(e))
            }
        }
    }
}
