use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    auth::AuthUser,
    errors::{ApiError, AppError},
    models::PlaceRating,
    rating::PlaceRatingAggregate,
    service,
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRatingResponse {
    pub status: &'static str,
    pub place_rating: PlaceRatingAggregate,
}

#[axum::debug_handler]
pub async fn add_rating_handler(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AddRatingResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        tracing::warn!("Rejected rating body: {}", e);
        AppError::BadRequest(e.body_text()).to_response()
    })?;

    let place_rating = service::submit_rating(state.store.as_ref(), &user_id, &body)
        .await
        .map_err(|e| {
            match &e {
                AppError::Rating(_) => tracing::warn!("Rating from {} rejected: {}", user_id, e),
                _ => tracing::error!("Error storing rating from {}: {}", user_id, e),
            }
            e.to_response()
        })?;

    Ok(Json(AddRatingResponse {
        status: "ok",
        place_rating,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRatingQuery {
    pub place_id: Option<String>,
    pub place_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaceRatingResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub rating: PlaceRating,
}

pub async fn get_place_rating_handler(
    State(state): State<AppState>,
    Query(query): Query<PlaceRatingQuery>,
) -> Result<Json<PlaceRatingResponse>, ApiError> {
    let (Some(place_id), Some(place_type)) = (query.place_id, query.place_type) else {
        return Err(AppError::BadRequest("placeId and placeType are required".into()).to_response());
    };

    let rating = service::get_place_rating(state.store.as_ref(), &place_id, &place_type)
        .await
        .map_err(|e| {
            if !matches!(e, AppError::NotFound(_) | AppError::BadRequest(_)) {
                tracing::error!("Error retrieving rating for place {}: {}", place_id, e);
            }
            e.to_response()
        })?;

    Ok(Json(PlaceRatingResponse {
        status: "ok",
        rating,
    }))
}
