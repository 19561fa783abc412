use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    auth::AdminAccess,
    errors::{ApiError, AppError},
    models::SchemaWriteMode,
    service,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaPayload {
    pub place_type: Option<String>,
    pub schema: Option<Value>,
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub status: &'static str,
    pub message: String,
}

fn read_payload(
    payload: Result<Json<SchemaPayload>, JsonRejection>,
) -> Result<(String, Value, Option<String>), ApiError> {
    let invalid = || AppError::BadRequest("Invalid request".into()).to_response();

    let Json(payload) = payload.map_err(|_| invalid())?;
    match (payload.place_type, payload.schema) {
        (Some(place_type), Some(schema)) if !place_type.trim().is_empty() => {
            Ok((place_type, schema, payload.mode))
        }
        _ => Err(invalid()),
    }
}

fn log_failure(place_type: &str, action: &str, e: &AppError) {
    match e {
        AppError::Rating(_) | AppError::BadRequest(_) | AppError::Conflict(_) => {
            tracing::warn!("Schema {} for {} rejected: {}", action, place_type, e)
        }
        _ => tracing::error!("Error during schema {} for {}: {}", action, place_type, e),
    }
}

fn written(place_type: &str, action: &str) -> Json<SchemaResponse> {
    Json(SchemaResponse {
        status: "ok",
        message: format!(
            "Rating schema for placeType: {} {} at {}",
            place_type.trim(),
            action,
            Utc::now().format("%H:%M:%S UTC")
        ),
    })
}

pub async fn create_schema_handler(
    State(state): State<AppState>,
    _admin: AdminAccess,
    payload: Result<Json<SchemaPayload>, JsonRejection>,
) -> Result<Json<SchemaResponse>, ApiError> {
    let (place_type, schema, _) = read_payload(payload)?;

    service::create_schema(state.store.as_ref(), &place_type, &schema)
        .await
        .map_err(|e| {
            log_failure(&place_type, "create", &e);
            e.to_response()
        })?;

    tracing::info!("Created rating schema for {}", place_type);
    Ok(written(&place_type, "created"))
}

pub async fn update_schema_handler(
    State(state): State<AppState>,
    _admin: AdminAccess,
    payload: Result<Json<SchemaPayload>, JsonRejection>,
) -> Result<Json<SchemaResponse>, ApiError> {
    let (place_type, schema, mode) = read_payload(payload)?;

    let mode = match mode.as_deref() {
        Some("merge") => SchemaWriteMode::Merge,
        Some("replace") => SchemaWriteMode::Replace,
        _ => return Err(AppError::BadRequest("Invalid request".into()).to_response()),
    };

    service::update_schema(state.store.as_ref(), &place_type, &schema, mode)
        .await
        .map_err(|e| {
            log_failure(&place_type, "update", &e);
            e.to_response()
        })?;

    tracing::info!("Updated rating schema for {} ({:?})", place_type, mode);
    Ok(written(&place_type, "updated"))
}
