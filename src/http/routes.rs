use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    http::handlers::{
        add_rating_handler, create_schema_handler, get_place_rating_handler,
        update_schema_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/ratings", post(add_rating_handler))
        .route("/place-rating", get(get_place_rating_handler))
        .route(
            "/schemas",
            post(create_schema_handler).put(update_schema_handler),
        )
        .with_state(state)
}
