use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::{
    errors::{ApiError, AppError},
    state::AppState,
};

async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<String, ApiError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                AppError::Unauthorized("Missing or invalid Authorization header".into())
                    .to_response()
            })?;

    Ok(bearer.token().trim().to_string())
}

/// Identity of the signed-in user, taken from the bearer token as is.
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = bearer_token(parts, state).await?;
        if user_id.is_empty() {
            return Err(AppError::Unauthorized(
                "You need to be signed in to add a rating".into(),
            )
            .to_response());
        }

        Ok(AuthUser(user_id))
    }
}

/// Proof that the request carries the admin secret.
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        if !state.admin_secret.verify(&token) {
            tracing::warn!("Rejected schema admin request with an invalid credential");
            return Err(AppError::Unauthorized("Invalid admin credential".into()).to_response());
        }

        Ok(AdminAccess)
    }
}
