use redis::AsyncCommands;

use crate::{
    db::decode, errors::AppError, models::redis::RedisKey, rating::PlaceRatingAggregate,
    state::RedisClient,
};

pub async fn get_place_rating(
    place_id: &str,
    redis: RedisClient,
) -> Result<Option<PlaceRatingAggregate>, AppError> {
    let mut conn = redis.get().await?;

    let key = RedisKey::place_rating(place_id);
    let json: Option<String> = conn.get(&key).await.map_err(AppError::RedisCommandError)?;

    json.as_deref().map(decode).transpose()
}
