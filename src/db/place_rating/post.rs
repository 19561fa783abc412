use redis::AsyncCommands;

use crate::{
    db::{FoldFn, MAX_TX_ATTEMPTS, decode, encode, unwatch},
    errors::AppError,
    models::{UserRating, redis::RedisKey},
    rating::PlaceRatingAggregate,
    state::RedisClient,
};

fn next_aggregate(
    current: Option<&str>,
    fold: &FoldFn<'_>,
) -> Result<(PlaceRatingAggregate, String), AppError> {
    let current = current.map(decode::<PlaceRatingAggregate>).transpose()?;
    let next = fold(current.as_ref())?;
    let json = encode(&next)?;
    Ok((next, json))
}

/// Current aggregate JSON and whether the record key is already taken.
async fn current_state(
    conn: &mut redis::aio::MultiplexedConnection,
    key: &str,
    record_key: &str,
) -> Result<(Option<String>, bool), AppError> {
    let current: Option<String> = conn.get(key).await?;
    let taken: bool = conn.exists(record_key).await?;
    Ok((current, taken))
}

/// Writes the rating record and the refolded aggregate in one `MULTI`/`EXEC`,
/// guarded by a `WATCH` on the aggregate key. A concurrent write to the same
/// place aborts the transaction and the fold is recomputed from fresh state.
pub async fn commit_rating(
    record: UserRating,
    fold: &FoldFn<'_>,
    redis: RedisClient,
) -> Result<PlaceRatingAggregate, AppError> {
    let mut conn = redis.get().await?;

    let key = RedisKey::place_rating(&record.place_id);
    let record_key = RedisKey::user_rating(record.id);
    let history_key = RedisKey::place_rating_history(&record.place_id);
    let record_json = encode(&record)?;

    for attempt in 1..=MAX_TX_ATTEMPTS {
        let _: () = redis::cmd("WATCH")
            .arg(&key)
            .arg(&record_key)
            .query_async(&mut *conn)
            .await?;

        let prepared = match current_state(&mut conn, &key, &record_key).await {
            Ok((current, false)) => next_aggregate(current.as_deref(), fold),
            Ok((_, true)) => Err(AppError::Conflict(format!(
                "Rating {} already stored",
                record.id
            ))),
            Err(e) => Err(e),
        };
        let (next, next_json) = match prepared {
            Ok(next) => next,
            Err(e) => {
                unwatch(&mut conn).await;
                return Err(e);
            }
        };

        // The watched record key keeps the record write from overwriting a stored one.
        let mut pipe = redis::pipe();
        pipe.atomic()
            .set(&record_key, &record_json)
            .ignore()
            .rpush(&history_key, record.id.to_string())
            .ignore()
            .set(&key, next_json)
            .ignore();

        let committed: Option<()> = pipe.query_async(&mut *conn).await?;
        if committed.is_some() {
            tracing::info!(
                "Stored rating {} for place {} (count {})",
                record.id,
                record.place_id,
                next.rating_count
            );
            return Ok(next);
        }

        tracing::warn!(
            "Rating for place {} raced another writer (attempt {attempt})",
            record.place_id
        );
    }

    Err(AppError::Conflict(format!(
        "Place {} is being rated concurrently, try again",
        record.place_id
    )))
}
