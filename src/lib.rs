pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
mod middleware;
pub mod models;
pub mod rating;
pub mod service;
pub mod state;

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, middleware as axum_middleware};
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use middleware::{cors_layer, create_rate_limiter, rate_limit_middleware};
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    db::{InMemoryStore, RatingStore, RedisStore},
    errors::AppError,
    state::AppState,
};

pub fn create_app(state: AppState, config: &Config) -> Router {
    let rate_limiter = create_rate_limiter(config.rate_limit_per_minute);

    Router::new()
        .merge(http::create_http_routes(state))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(rate_limiter.clone(), req, next)
        }))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .fallback(|| async { "404 Not Found" })
}

async fn create_store(config: &Config) -> Result<Arc<dyn RatingStore>, AppError> {
    let Some(redis_url) = config.redis_url.as_deref() else {
        tracing::warn!("REDIS_URL not set, ratings are kept in memory only");
        return Ok(Arc::new(InMemoryStore::new()));
    };

    let manager = RedisConnectionManager::new(redis_url)?;
    let redis_pool = Pool::builder().build(manager).await?;
    tracing::info!("Connected to Redis");

    Ok(Arc::new(RedisStore::new(redis_pool)))
}

pub async fn start_server() -> Result<(), AppError> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let store = create_store(&config).await?;
    let state = AppState::new(store, config.admin_secret.clone());
    let app = create_app(state, &config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(|e| AppError::EnvError(format!("Failed to bind port {}: {e}", config.port)))?;

    tracing::info!("Place ratings server running on port {}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Server error: {}", e);
        AppError::InternalError
    })
}
