//! Learner item store backends.

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use sqlite::SqliteItemStore;

use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::KarteiResult;
use crate::traits::ItemStore;

/// Build the store described by `config`.
pub fn create_store(config: &StoreConfig) -> KarteiResult<Arc<dyn ItemStore>> {
    let store: Arc<dyn ItemStore> = match config.backend {
        StoreBackend::Json => Arc::new(JsonFileStore::new(&config.path)),
        StoreBackend::Sqlite => Arc::new(SqliteItemStore::new(&config.path)?),
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
    };
    Ok(store)
}
