//! Factory for creating a Scheduler from configuration.

use std::sync::Arc;

use kartei_core::config::{KarteiConfig, StoreBackend};
use kartei_core::error::KarteiResult;
use kartei_core::scheduler::Scheduler;
use tracing::{info, warn};

/// Create a Scheduler and its store from configuration.
pub fn create_scheduler(config: &KarteiConfig) -> KarteiResult<Arc<Scheduler>> {
    if config.store.backend == StoreBackend::Memory {
        warn!("Using the in-memory store; items are lost on shutdown");
    }

    let scheduler = Scheduler::from_config(config)?;
    info!(
        store = scheduler.store_name(),
        path = %config.store.path.display(),
        selection = ?config.selection,
        "Scheduler ready"
    );
    Ok(Arc::new(scheduler))
}
