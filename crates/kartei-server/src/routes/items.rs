//! Item collection endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use kartei_core::scheduler::{DeckSummary, KnownTitles};
use kartei_core::types::{Item, NewItem};

use super::LearnerQuery;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

/// List every item of a learner.
/// GET /items?email=
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<LearnerQuery>,
) -> ApiResult<Json<ItemsResponse>> {
    let items = state
        .with_scheduler(move |scheduler| scheduler.list_items(&query.email))
        .await?;
    Ok(Json(ItemsResponse { items }))
}

/// Request body for appending generated cards.
#[derive(Debug, Deserialize)]
pub struct AddItemsRequest {
    pub email: String,
    pub items: Vec<NewItem>,
}

#[derive(Debug, Serialize)]
pub struct AddItemsResponse {
    pub added: usize,
    pub skipped: Vec<String>,
}

/// Append newly generated cards.
/// POST /items
pub async fn add_items(
    State(state): State<AppState>,
    Json(request): Json<AddItemsRequest>,
) -> ApiResult<Json<AddItemsResponse>> {
    if request.email.trim().is_empty() {
        return Err(ApiError::validation("Missing required field: email"));
    }
    state.limiter.acquire(&request.email).await?;

    let report = state
        .with_scheduler(move |scheduler| scheduler.add_items(&request.email, request.items))
        .await?;

    Ok(Json(AddItemsResponse {
        added: report.added.len(),
        skipped: report.skipped,
    }))
}

/// Titles the learner already has, split by kind.
/// GET /items/titles?email=
pub async fn known_titles(
    State(state): State<AppState>,
    Query(query): Query<LearnerQuery>,
) -> ApiResult<Json<KnownTitles>> {
    let titles = state
        .with_scheduler(move |scheduler| scheduler.known_titles(&query.email))
        .await?;
    Ok(Json(titles))
}

/// Collection statistics for the learner.
/// GET /items/summary?email=
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<LearnerQuery>,
) -> ApiResult<Json<DeckSummary>> {
    let summary = state
        .with_scheduler(move |scheduler| scheduler.summary(&query.email))
        .await?;
    Ok(Json(summary))
}
