use redis::AsyncCommands;

use crate::{
    db::encode, errors::AppError, models::redis::RedisKey, rating::RatingRulesSchema,
    state::RedisClient,
};

pub async fn create_rating_schema(
    place_type: &str,
    schema: &RatingRulesSchema,
    redis: RedisClient,
) -> Result<(), AppError> {
    let mut conn = redis.get().await?;

    let key = RedisKey::rating_schema(place_type);
    let created: bool = conn
        .set_nx(&key, encode(schema)?)
        .await
        .map_err(AppError::RedisCommandError)?;

    if !created {
        return Err(AppError::Conflict(format!(
            "Rating schema for placeType: {place_type} already exists"
        )));
    }

    Ok(())
}
