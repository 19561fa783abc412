use redis::AsyncCommands;

use crate::{
    db::{MAX_TX_ATTEMPTS, decode, encode, unwatch},
    errors::AppError,
    models::redis::RedisKey,
    rating::RatingRulesSchema,
    state::RedisClient,
};

pub async fn replace_rating_schema(
    place_type: &str,
    schema: &RatingRulesSchema,
    redis: RedisClient,
) -> Result<(), AppError> {
    let mut conn = redis.get().await?;

    let key = RedisKey::rating_schema(place_type);
    let _: () = conn
        .set(&key, encode(schema)?)
        .await
        .map_err(AppError::RedisCommandError)?;

    Ok(())
}

pub async fn merge_rating_schema(
    place_type: &str,
    schema: RatingRulesSchema,
    redis: RedisClient,
) -> Result<(), AppError> {
    let mut conn = redis.get().await?;
    let key = RedisKey::rating_schema(place_type);

    for attempt in 1..=MAX_TX_ATTEMPTS {
        let _: () = redis::cmd("WATCH").arg(&key).query_async(&mut *conn).await?;

        let current: Result<Option<String>, AppError> =
            conn.get(&key).await.map_err(AppError::RedisCommandError);
        let merged = current.and_then(|current| {
            let mut merged = current
                .as_deref()
                .map(decode::<RatingRulesSchema>)
                .transpose()?
                .unwrap_or_default();
            merged.merge(schema.clone());
            encode(&merged)
        });
        let merged = match merged {
            Ok(json) => json,
            Err(e) => {
                unwatch(&mut conn).await;
                return Err(e);
            }
        };

        let mut pipe = redis::pipe();
        pipe.atomic().set(&key, merged).ignore();

        let committed: Option<()> = pipe.query_async(&mut *conn).await?;
        if committed.is_some() {
            return Ok(());
        }

        tracing::warn!("Schema merge for {place_type} raced another writer (attempt {attempt})");
    }

    Err(AppError::Conflict(format!(
        "Rating schema for placeType: {place_type} is being updated concurrently"
    )))
}
