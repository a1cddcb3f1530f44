//! Route definitions for the REST API.

mod cards;
mod health;
mod items;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::state::AppState;

/// Query string naming the learner.
#[derive(Debug, Deserialize)]
pub struct LearnerQuery {
    #[serde(default)]
    pub email: String,
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Review loop
        .route("/show_card", get(cards::show_card))
        .route("/update_card", post(cards::update_card))
        // Collection
        .route("/items", get(items::list_items).post(items::add_items))
        .route("/items/titles", get(items::known_titles))
        .route("/items/summary", get(items::summary))
        // Attach state
        .with_state(state)
}

pub use cards::*;
pub use health::*;
pub use items::*;
