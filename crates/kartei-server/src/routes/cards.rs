//! Review loop endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use kartei_core::scheduler::{NextCard, Review, UpdateOutcome};
use kartei_core::types::Item;

use super::LearnerQuery;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for the next card.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShowCardResponse {
    Due { card: Item },
    NoLearnedData,
    NoAvailableCards,
}

impl From<NextCard> for ShowCardResponse {
    fn from(next: NextCard) -> Self {
        match next {
            NextCard::Due(card) => ShowCardResponse::Due { card },
            NextCard::NoLearnedData => ShowCardResponse::NoLearnedData,
            NextCard::NoAvailableCards => ShowCardResponse::NoAvailableCards,
        }
    }
}

/// Show the learner's next due card.
/// GET /show_card?email=
pub async fn show_card(
    State(state): State<AppState>,
    Query(query): Query<LearnerQuery>,
) -> ApiResult<Json<ShowCardResponse>> {
    let next = state
        .with_scheduler(move |scheduler| scheduler.next_card(&query.email))
        .await?;
    Ok(Json(next.into()))
}

/// Request body for recording a review.
#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    pub email: String,
    pub title: String,
    /// Judgment label: AGAIN, HARD, GOOD or EASY. Anything else counts as AGAIN.
    #[serde(default)]
    pub option_selected: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateCardResponse {
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
}

/// Record the learner's judgment for a card.
/// POST /update_card
pub async fn update_card(
    State(state): State<AppState>,
    Json(request): Json<UpdateCardRequest>,
) -> ApiResult<Json<UpdateCardResponse>> {
    let title = request.title.clone();
    let outcome = state
        .with_scheduler(move |scheduler| {
            scheduler.update_item_schedule(
                &request.email,
                &request.title,
                &request.option_selected,
            )
        })
        .await?;

    match outcome {
        UpdateOutcome::Success(review) => Ok(Json(UpdateCardResponse {
            result: "SUCCESS".to_string(),
            review: Some(review),
        })),
        UpdateOutcome::NoLearnedData => Ok(Json(UpdateCardResponse {
            result: "NO_LEARNED_DATA".to_string(),
            review: None,
        })),
        UpdateOutcome::ItemNotFound => Err(ApiError::item_not_found(&title)),
    }
}
