use axum::{Json, http::StatusCode};
use redis::RedisError;
use serde::Serialize;
use thiserror::Error;

/// Rejections produced by the rating engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("Invalid schema")]
    InvalidSchema,

    #[error("Invalid rating submission")]
    InvalidSubmission,

    #[error("Rating does not match the schema for this place type")]
    SchemaMismatch,

    #[error("Unknown place type: {0}")]
    UnknownPlaceType(String),

    #[error("Rating rules differ from the rules already aggregated for this place")]
    RuleSetMismatch,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error("Redis pool error: {0}")]
    RedisPoolError(String),

    #[error("Redis command error: {0}")]
    RedisCommandError(#[from] RedisError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Env error: {0}")]
    EnvError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    InternalError,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

impl AppError {
    pub fn status(&self) -> &'static str {
        match self {
            AppError::Rating(RatingError::InvalidSchema) => "invalid_schema",
            AppError::Rating(RatingError::InvalidSubmission) => "invalid_request",
            AppError::Rating(RatingError::SchemaMismatch) => "invalid_rating",
            AppError::Rating(RatingError::UnknownPlaceType(_)) => "invalid_place_type",
            AppError::Rating(RatingError::RuleSetMismatch) => "schema_changed",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::BadRequest(_) => "invalid_request",
            AppError::NotFound(_) => "no_past_rating",
            AppError::Conflict(_) => "conflict",
            AppError::RedisPoolError(_)
            | AppError::RedisCommandError(_)
            | AppError::Serialization(_)
            | AppError::EnvError(_)
            | AppError::InternalError => "error",
        }
    }

    pub fn to_response(&self) -> ApiError {
        let code = match self {
            AppError::Rating(RatingError::InvalidSubmission) => StatusCode::BAD_REQUEST,
            AppError::Rating(RatingError::UnknownPlaceType(_)) => StatusCode::NOT_FOUND,
            AppError::Rating(RatingError::RuleSetMismatch) => StatusCode::CONFLICT,
            AppError::Rating(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RedisPoolError(_)
            | AppError::RedisCommandError(_)
            | AppError::Serialization(_)
            | AppError::EnvError(_)
            | AppError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details stay in the logs.
        let message = match code {
            StatusCode::INTERNAL_SERVER_ERROR => "An error occurred while processing your request".into(),
            _ => self.to_string(),
        };

        (
            code,
            Json(ErrorBody {
                status: self.status(),
                message,
            }),
        )
    }
}

impl From<bb8::RunError<RedisError>> for AppError {
    fn from(e: bb8::RunError<RedisError>) -> Self {
        match e {
            bb8::RunError::User(err) => AppError::RedisCommandError(err),
            bb8::RunError::TimedOut => AppError::RedisPoolError("Redis connection timed out".into()),
        }
    }
}
