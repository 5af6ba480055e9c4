//! Application state wiring the hub to its concrete store.
//!
//! The hub is generic over the repository trait; AppState pins it to
//! the SQLite implementation from `chathub-infra`.

use std::sync::Arc;

use chathub_core::hub::RelayHub;
use chathub_infra::config::HubConfig;
use chathub_infra::sqlite::{DatabasePool, SqliteMessageRepository};

/// The hub pinned to its concrete SQLite store.
pub type ConcreteHub = RelayHub<SqliteMessageRepository>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<ConcreteHub>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the database (runs
    /// migrations), wire the repository into a fresh hub.
    pub async fn init(config: &HubConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url).await?;
        let repository = SqliteMessageRepository::new(db_pool.clone());
        let hub = Arc::new(RelayHub::new(Arc::new(repository)));

        Ok(Self { hub, db_pool })
    }
}
