use redis::AsyncCommands;

use crate::{
    db::decode, errors::AppError, models::redis::RedisKey, rating::RatingRulesSchema,
    state::RedisClient,
};

pub async fn get_rating_schema(
    place_type: &str,
    redis: RedisClient,
) -> Result<Option<RatingRulesSchema>, AppError> {
    let mut conn = redis.get().await?;

    let key = RedisKey::rating_schema(place_type);
    let json: Option<String> = conn.get(&key).await.map_err(AppError::RedisCommandError)?;

    json.as_deref().map(decode).transpose()
}
