use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    errors::{AppError, RatingError},
    models::{SchemaWriteMode, UserRating},
    rating::{PlaceRatingAggregate, RatingRulesSchema},
};

pub mod memory;
pub mod place_rating;
pub mod schema;
pub mod store;

pub use memory::InMemoryStore;
pub use store::RedisStore;

/// Attempts at an optimistic transaction before giving up on a contended key.
pub const MAX_TX_ATTEMPTS: usize = 8;

/// Computes the next aggregate from the one currently stored, if any.
pub type FoldFn<'a> = dyn Fn(Option<&PlaceRatingAggregate>) -> Result<PlaceRatingAggregate, RatingError>
    + Send
    + Sync
    + 'a;

/// Document store behind the rating service.
#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn get_schema(&self, place_type: &str) -> Result<Option<RatingRulesSchema>, AppError>;

    /// Fails with [`AppError::Conflict`] when the place type already has a schema.
    async fn create_schema(
        &self,
        place_type: &str,
        schema: RatingRulesSchema,
    ) -> Result<(), AppError>;

    /// Upserts a schema, merging into or replacing any existing one.
    async fn write_schema(
        &self,
        place_type: &str,
        schema: RatingRulesSchema,
        mode: SchemaWriteMode,
    ) -> Result<(), AppError>;

    async fn get_place_rating(
        &self,
        place_id: &str,
    ) -> Result<Option<PlaceRatingAggregate>, AppError>;

    /// Stores `record` and the aggregate `fold` derives from the current one,
    /// both or neither.
    async fn commit_rating(
        &self,
        record: UserRating,
        fold: &FoldFn<'_>,
    ) -> Result<PlaceRatingAggregate, AppError>;
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|e| AppError::Serialization(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(json: &str) -> Result<T, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::Serialization(e.to_string()))
}

pub(crate) async fn unwatch(conn: &mut redis::aio::MultiplexedConnection) {
    let result: redis::RedisResult<()> = redis::cmd("UNWATCH").query_async(conn).await;
    if let Err(e) = result {
        tracing::warn!("Failed to release watched keys: {}", e);
    }
}
