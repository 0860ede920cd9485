//! Repository glue between the screens and the data layer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::PostdeckError;
use crate::domain::{Item, Outcome};
use crate::paging::{PagedView, PagingConfig};
use crate::store::{run_blocking, ItemStore};
use crate::sync::SyncMediator;

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// A fresh paged view; its first access reconciles with the remote.
    fn paged_items(&self) -> PagedView;

    /// Cache-only point read. Never touches the network or the store's
    /// contents.
    async fn item(&self, id: i64) -> Outcome<Item>;
}

pub struct CachedItemRepository {
    store: Arc<dyn ItemStore>,
    mediator: Arc<SyncMediator>,
    paging: PagingConfig,
}

impl CachedItemRepository {
    pub fn new(store: Arc<dyn ItemStore>, mediator: Arc<SyncMediator>, paging: PagingConfig) -> Self {
        Self {
            store,
            mediator,
            paging,
        }
    }
}

#[async_trait]
impl ItemRepository for CachedItemRepository {
    fn paged_items(&self) -> PagedView {
        PagedView::new(
            Arc::clone(&self.store),
            Arc::clone(&self.mediator),
            self.paging,
        )
    }

    async fn item(&self, id: i64) -> Outcome<Item> {
        run_blocking(&self.store, move |store| {
            store.get_by_id(id)?.ok_or(PostdeckError::ItemNotFound(id))
        })
        .await
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewItem;
    use crate::store::{ItemWriter, SqliteStore};
    use crate::sync::testing::{records, ScriptedRemote};
    use tokio::sync::watch;

    fn repository(store: Arc<dyn ItemStore>) -> CachedItemRepository {
        let remote = Arc::new(ScriptedRemote::new(vec![Ok(records("r", 3))]));
        let mediator = Arc::new(SyncMediator::new(remote, store.clone(), 1, 20));
        CachedItemRepository::new(store, mediator, PagingConfig::default())
    }

    #[tokio::test]
    async fn test_item_found() {
        let store: Arc<dyn ItemStore> = Arc::new(SqliteStore::in_memory().unwrap());
        store
            .insert_all(&[NewItem::new("Test Title", "https://example.com/image.jpg").with_id(1)])
            .unwrap();

        match repository(store).item(1).await {
            Outcome::Success(item) => {
                assert_eq!(
                    item,
                    Item {
                        id: 1,
                        title: "Test Title".into(),
                        image_url: "https://example.com/image.jpg".into(),
                    }
                );
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_absent_ids_are_not_found() {
        let store: Arc<dyn ItemStore> = Arc::new(SqliteStore::in_memory().unwrap());
        store.insert_all(&[NewItem::new("only", "https://img").with_id(5)]).unwrap();
        let repo = repository(store.clone());

        for id in [0, 1, 4, 6, -1, i64::MAX] {
            match repo.item(id).await {
                Outcome::Error(cause) => {
                    assert!(matches!(cause.as_ref(), PostdeckError::ItemNotFound(got) if *got == id));
                    assert_eq!(cause.to_string(), "not found");
                }
                other => panic!("id {} should be absent, got {:?}", id, other),
            }
        }
        // Pure read: nothing changed.
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(*store.invalidations().borrow(), 1);
    }

    struct FailingStore {
        generation: watch::Sender<u64>,
    }

    impl ItemStore for FailingStore {
        fn query_page(&self, _offset: usize, _limit: usize) -> crate::app::Result<Vec<Item>> {
            Err(PostdeckError::Other("Database error".into()))
        }
        fn count(&self) -> crate::app::Result<usize> {
            Err(PostdeckError::Other("Database error".into()))
        }
        fn get_by_id(&self, _id: i64) -> crate::app::Result<Option<Item>> {
            Err(PostdeckError::Other("Database error".into()))
        }
        fn clear_all(&self) -> crate::app::Result<()> {
            Err(PostdeckError::Other("Database error".into()))
        }
        fn insert_all(&self, _items: &[NewItem]) -> crate::app::Result<usize> {
            Err(PostdeckError::Other("Database error".into()))
        }
        fn with_transaction(
            &self,
            _f: &mut dyn FnMut(&dyn ItemWriter) -> crate::app::Result<()>,
        ) -> crate::app::Result<()> {
            Err(PostdeckError::Other("Database error".into()))
        }
        fn invalidations(&self) -> watch::Receiver<u64> {
            self.generation.subscribe()
        }
    }

    #[tokio::test]
    async fn test_storage_fault_surfaces_as_error() {
        let (generation, _) = watch::channel(0);
        let store: Arc<dyn ItemStore> = Arc::new(FailingStore { generation });

        let outcome = repository(store).item(1).await;
        assert_eq!(outcome.error_message().as_deref(), Some("Database error"));
    }

    #[tokio::test]
    async fn test_paged_items_are_independent_views() {
        let store: Arc<dyn ItemStore> = Arc::new(SqliteStore::in_memory().unwrap());
        let repo = repository(store);

        let first = repo.paged_items();
        first.access(0).await;
        let second = repo.paged_items();

        assert_eq!(first.snapshot().items.len(), 3);
        assert!(second.snapshot().items.is_empty());
    }
}
