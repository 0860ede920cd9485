use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{PostdeckError, Result};
use crate::config::Config;
use crate::remote::{HttpRemoteSource, RemoteSource};
use crate::repository::CachedItemRepository;
use crate::store::{ItemStore, SqliteStore};
use crate::sync::SyncMediator;

/// Wires the data layer together for one process.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub mediator: Arc<SyncMediator>,
    pub repository: Arc<CachedItemRepository>,
}

impl AppContext {
    /// `db_path` overrides the configured database location.
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path.or_else(|| config.store.db_path.clone()) {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let remote: Arc<dyn RemoteSource + Send + Sync> =
            Arc::new(HttpRemoteSource::new(&config.remote)?);
        let dyn_store: Arc<dyn ItemStore> = store.clone();
        let mediator = Arc::new(SyncMediator::new(
            remote,
            dyn_store.clone(),
            config.remote.page,
            config.remote.limit,
        ));
        let repository = Arc::new(CachedItemRepository::new(
            dyn_store,
            mediator.clone(),
            config.paging,
        ));

        Ok(Self {
            config,
            store,
            mediator,
            repository,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| PostdeckError::Config("Could not find data directory".into()))?;
        let postdeck_dir = data_dir.join("postdeck");
        std::fs::create_dir_all(&postdeck_dir)?;
        Ok(postdeck_dir.join("postdeck.db"))
    }
}
