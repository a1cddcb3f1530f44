//! Server state management.

use std::sync::Arc;

use kartei_core::config::KarteiConfig;
use kartei_core::error::{KarteiError, KarteiResult};
use kartei_core::scheduler::Scheduler;

use crate::error::{ApiError, ApiResult};
use crate::factory::create_scheduler;
use crate::rate_limit::RateLimiter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Create state around an existing scheduler and limiter.
    pub fn new(scheduler: Arc<Scheduler>, limiter: RateLimiter) -> Self {
        Self {
            scheduler,
            limiter: Arc::new(limiter),
        }
    }

    /// Build scheduler, store and limiter from configuration.
    pub fn from_config(config: &KarteiConfig) -> KarteiResult<Self> {
        let scheduler = create_scheduler(config)?;
        Ok(Self::new(scheduler, RateLimiter::from_config(&config.rate_limit)))
    }

    /// Run a scheduler call off the async runtime.
    ///
    /// Store access is blocking file or database I/O.
    pub async fn with_scheduler<F, T>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&Scheduler) -> Result<T, KarteiError> + Send + 'static,
        T: Send + 'static,
    {
        let scheduler = Arc::clone(&self.scheduler);
        tokio::task::spawn_blocking(move || f(&scheduler))
            .await
            .map_err(|e| ApiError::internal(format!("Scheduler task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}
