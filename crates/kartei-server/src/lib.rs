//! kartei-server - REST API server for kartei.
//!
//! This crate exposes the kartei review scheduler over HTTP.
//!
//! # Example
//!
//! ```ignore
//! use kartei_core::KarteiConfig;
//! use kartei_server::{create_server, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = AppState::from_config(&KarteiConfig::default())?;
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod factory;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use factory::create_scheduler;
pub use rate_limit::RateLimiter;
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
