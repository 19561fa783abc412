use async_trait::async_trait;

use crate::{
    db::{FoldFn, RatingStore, place_rating, schema},
    errors::AppError,
    models::{SchemaWriteMode, UserRating},
    rating::{PlaceRatingAggregate, RatingRulesSchema},
    state::RedisClient,
};

#[derive(Clone)]
pub struct RedisStore {
    redis: RedisClient,
}

impl RedisStore {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl RatingStore for RedisStore {
    async fn get_schema(&self, place_type: &str) -> Result<Option<RatingRulesSchema>, AppError> {
        schema::get_rating_schema(place_type, self.redis.clone()).await
    }

    async fn create_schema(
        &self,
        place_type: &str,
        schema: RatingRulesSchema,
    ) -> Result<(), AppError> {
        schema::create_rating_schema(place_type, &schema, self.redis.clone()).await
    }

    async fn write_schema(
        &self,
        place_type: &str,
        schema: RatingRulesSchema,
        mode: SchemaWriteMode,
    ) -> Result<(), AppError> {
        match mode {
            SchemaWriteMode::Merge => {
                schema::merge_rating_schema(place_type, schema, self.redis.clone()).await
            }
            SchemaWriteMode::Replace => {
                schema::replace_rating_schema(place_type, &schema, self.redis.clone()).await
            }
        }
    }

    async fn get_place_rating(
        &self,
        place_id: &str,
    ) -> Result<Option<PlaceRatingAggregate>, AppError> {
        place_rating::get_place_rating(place_id, self.redis.clone()).await
    }

    async fn commit_rating(
        &self,
        record: UserRating,
        fold: &FoldFn<'_>,
    ) -> Result<PlaceRatingAggregate, AppError> {
        place_rating::commit_rating(record, fold, self.redis.clone()).await
    }
}
