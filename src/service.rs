use serde_json::Value;

use crate::{
    db::RatingStore,
    errors::{AppError, RatingError},
    models::{PlaceRating, SchemaWriteMode, UserRating},
    rating::{
        PlaceRatingAggregate, RatingRulesSchema, RatingSubmission, ValidatedRating, fold_in,
        normalize,
    },
};

/// Validates a raw submission, normalizes it and folds it into the place's
/// aggregate. The rating record and the new aggregate are committed together.
pub async fn submit_rating(
    store: &dyn RatingStore,
    user_id: &str,
    body: &Value,
) -> Result<PlaceRatingAggregate, AppError> {
    let submission = RatingSubmission::from_value(body)?;

    let schema = store
        .get_schema(&submission.place_type)
        .await?
        .ok_or_else(|| RatingError::UnknownPlaceType(submission.place_type.clone()))?;

    let rating = ValidatedRating::new(submission, schema)?;
    let normalized = normalize(&rating);
    let record = UserRating::new(user_id, &rating, &normalized);
    let place_type = rating.submission().place_type.as_str();

    store
        .commit_rating(record, &|current| fold_in(current, place_type, &normalized))
        .await
}

pub async fn get_place_rating(
    store: &dyn RatingStore,
    place_id: &str,
    place_type: &str,
) -> Result<PlaceRating, AppError> {
    let (place_id, place_type) = (place_id.trim(), place_type.trim());
    if place_id.is_empty() || place_type.is_empty() {
        return Err(AppError::BadRequest("placeId and placeType are required".into()));
    }

    let place_rating = store.get_place_rating(place_id).await?;
    let rating_schema = store.get_schema(place_type).await?;

    match (place_rating, rating_schema) {
        (Some(place_rating), Some(rating_schema)) => Ok(PlaceRating {
            place_rating,
            rating_schema,
        }),
        _ => Err(AppError::NotFound("This place has not been rated yet".into())),
    }
}

fn schema_target(place_type: &str, schema: &Value) -> Result<RatingRulesSchema, AppError> {
    if place_type.trim().is_empty() {
        return Err(AppError::BadRequest("placeType is required".into()));
    }

    Ok(RatingRulesSchema::from_value(schema)?)
}

pub async fn create_schema(
    store: &dyn RatingStore,
    place_type: &str,
    schema: &Value,
) -> Result<(), AppError> {
    let schema = schema_target(place_type, schema)?;
    store.create_schema(place_type.trim(), schema).await
}

pub async fn update_schema(
    store: &dyn RatingStore,
    place_type: &str,
    schema: &Value,
    mode: SchemaWriteMode,
) -> Result<(), AppError> {
    let schema = schema_target(place_type, schema)?;
    store.write_schema(place_type.trim(), schema, mode).await
}
