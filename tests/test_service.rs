use std::sync::Arc;

use place_ratings::db::{InMemoryStore, RatingStore};
use place_ratings::errors::{AppError, RatingError};
use place_ratings::models::{SchemaWriteMode, UserRating};
use place_ratings::rating::{
    PlaceRatingAggregate, RatingRulesSchema, RatingSubmission, Scale, ValidatedRating, fold_in, normalize,
};
use place_ratings::service;
use serde_json::{Value, json};

async fn store_with_schema(place_type: &str, schema: Value) -> InMemoryStore {
    let store = InMemoryStore::new();
    service::create_schema(&store, place_type, &schema)
        .await
        .unwrap();
    store
}

fn submission(place_id: &str, place_type: &str, rules: Value) -> Value {
    json!({ "placeId": place_id, "placeType": place_type, "rules": rules })
}

#[tokio::test]
async fn test_first_submission_creates_aggregate() {
    let store = store_with_schema("hotel", json!({ "cleanliness": 4, "staff": 1 })).await;

    let aggregate = service::submit_rating(
        &store,
        "user-1",
        &submission("place-1", "hotel", json!({ "cleanliness": 4, "staff": 1 })),
    )
    .await
    .unwrap();

    assert_eq!(aggregate.place_type, "hotel");
    assert_eq!(aggregate.rules["cleanliness"], 100);
    assert_eq!(aggregate.rules["staff"], 100);
    assert_eq!(aggregate.overall_score, 100);
    assert_eq!(aggregate.rating_count, 1);

    let stored = store.get_place_rating("place-1").await.unwrap();
    assert_eq!(stored, Some(aggregate));
}

#[tokio::test]
async fn test_zero_score_submission_never_reaches_aggregate() {
    let store = store_with_schema("hotel", json!({ "cleanliness": 4, "staff": 1 })).await;
    service::submit_rating(
        &store,
        "user-1",
        &submission("place-1", "hotel", json!({ "cleanliness": 4, "staff": 1 })),
    )
    .await
    .unwrap();

    let result = service::submit_rating(
        &store,
        "user-2",
        &submission("place-1", "hotel", json!({ "cleanliness": 0, "staff": 1 })),
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::Rating(RatingError::SchemaMismatch))
    ));

    let aggregate = store.get_place_rating("place-1").await.unwrap().unwrap();
    assert_eq!(aggregate.rating_count, 1);
    assert_eq!(store.ratings_for_place("place-1").await.len(), 1);
}

#[tokio::test]
async fn test_second_submission_updates_running_mean() {
    let store = store_with_schema("hotel", json!({ "cleanliness": 4, "staff": 1 })).await;

    for (user, cleanliness) in [("user-1", 4), ("user-2", 2)] {
        service::submit_rating(
            &store,
            user,
            &submission("place-1", "hotel", json!({ "cleanliness": cleanliness, "staff": 1 })),
        )
        .await
        .unwrap();
    }

    let aggregate = store.get_place_rating("place-1").await.unwrap().unwrap();
    assert_eq!(aggregate.rules["cleanliness"], 75);
    assert_eq!(aggregate.rules["staff"], 100);
    assert_eq!(aggregate.overall_score, 88);
    assert_eq!(aggregate.rating_count, 2);
}

#[tokio::test]
async fn test_rating_records_are_kept_per_submission() {
    let store = store_with_schema("hotel", json!({ "cleanliness": 4 })).await;

    for (user, score) in [("user-1", 4), ("user-2", 1)] {
        service::submit_rating(
            &store,
            user,
            &submission("place-1", "hotel", json!({ "cleanliness": score })),
        )
        .await
        .unwrap();
    }

    let records = store.ratings_for_place("place-1").await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_id, "user-1");
    assert_eq!(records[0].rules["cleanliness"], 4.0);
    assert_eq!(records[0].overall_score, 100);
    assert_eq!(records[1].user_id, "user-2");
    assert_eq!(records[1].overall_score, 25);
    assert_ne!(records[0].id, records[1].id);
}

#[tokio::test]
async fn test_unknown_place_type_is_distinct_from_mismatch() {
    let store = store_with_schema("hotel", json!({ "cleanliness": 4 })).await;

    let result = service::submit_rating(
        &store,
        "user-1",
        &submission("place-1", "museum", json!({ "cleanliness": 4 })),
    )
    .await;

    match result {
        Err(AppError::Rating(RatingError::UnknownPlaceType(place_type))) => {
            assert_eq!(place_type, "museum")
        }
        other => panic!("expected unknown place type, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_submission_is_rejected_first() {
    let store = InMemoryStore::new();

    let result = service::submit_rating(
        &store,
        "user-1",
        &json!({ "placeId": "place-1", "placeType": "museum", "rules": {}, "extra": 1 }),
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::Rating(RatingError::InvalidSubmission))
    ));
}

#[tokio::test]
async fn test_empty_schema_accepts_no_submission() {
    let store = store_with_schema("kiosk", json!({})).await;

    let result = service::submit_rating(
        &store,
        "user-1",
        &submission("place-1", "kiosk", json!({ "anything": 1 })),
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::Rating(RatingError::SchemaMismatch))
    ));
    assert_eq!(store.get_place_rating("place-1").await.unwrap(), None);
}

#[tokio::test]
async fn test_schema_change_after_rating_rejects_fold() {
    let store = store_with_schema("hotel", json!({ "cleanliness": 4 })).await;
    service::submit_rating(
        &store,
        "user-1",
        &submission("place-1", "hotel", json!({ "cleanliness": 4 })),
    )
    .await
    .unwrap();

    service::update_schema(&store, "hotel", &json!({ "staff": 1 }), SchemaWriteMode::Merge)
        .await
        .unwrap();

    let result = service::submit_rating(
        &store,
        "user-2",
        &submission("place-1", "hotel", json!({ "cleanliness": 4, "staff": 1 })),
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::Rating(RatingError::RuleSetMismatch))
    ));
    assert_eq!(store.ratings_for_place("place-1").await.len(), 1);
}

#[tokio::test]
async fn test_schema_create_validates_and_refuses_duplicates() {
    let store = InMemoryStore::new();

    let invalid = service::create_schema(&store, "hotel", &json!({ "cleanliness": 3 })).await;
    assert!(matches!(
        invalid,
        Err(AppError::Rating(RatingError::InvalidSchema))
    ));

    service::create_schema(&store, "hotel", &json!({ "cleanliness": 4 }))
        .await
        .unwrap();
    let duplicate = service::create_schema(&store, "hotel", &json!({ "staff": 1 })).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let blank = service::create_schema(&store, "  ", &json!({ "staff": 1 })).await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_schema_merge_and_replace() {
    let store = store_with_schema("hotel", json!({ "cleanliness": 4, "staff": 1 })).await;

    service::update_schema(
        &store,
        "hotel",
        &json!({ "staff": 4, "parking": 1 }),
        SchemaWriteMode::Merge,
    )
    .await
    .unwrap();

    let merged = store.get_schema("hotel").await.unwrap().unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.get("cleanliness"), Some(Scale::Tiered));
    assert_eq!(merged.get("staff"), Some(Scale::Tiered));

    service::update_schema(&store, "hotel", &json!({ "quiet": 1 }), SchemaWriteMode::Replace)
        .await
        .unwrap();

    let replaced = store.get_schema("hotel").await.unwrap().unwrap();
    assert_eq!(replaced.len(), 1);
    assert_eq!(replaced.get("quiet"), Some(Scale::Binary));
}

#[tokio::test]
async fn test_update_creates_missing_schema() {
    let store = InMemoryStore::new();

    service::update_schema(&store, "bar", &json!({ "music": 4 }), SchemaWriteMode::Merge)
        .await
        .unwrap();

    let schema = store.get_schema("bar").await.unwrap().unwrap();
    assert_eq!(schema.get("music"), Some(Scale::Tiered));
}

#[tokio::test]
async fn test_place_rating_requires_aggregate_and_schema() {
    let store = store_with_schema("hotel", json!({ "cleanliness": 4 })).await;

    let missing = service::get_place_rating(&store, "place-1", "hotel").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    service::submit_rating(
        &store,
        "user-1",
        &submission("place-1", "hotel", json!({ "cleanliness": 3 })),
    )
    .await
    .unwrap();

    let rating = service::get_place_rating(&store, "place-1", "hotel")
        .await
        .unwrap();
    assert_eq!(rating.place_rating.rules["cleanliness"], 75);
    assert_eq!(rating.rating_schema.get("cleanliness"), Some(Scale::Tiered));

    let wrong_type = service::get_place_rating(&store, "place-1", "museum").await;
    assert!(matches!(wrong_type, Err(AppError::NotFound(_))));

    let blank = service::get_place_rating(&store, "", "hotel").await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_lose_no_update() {
    let store = Arc::new(store_with_schema("hotel", json!({ "cleanliness": 4 })).await);

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                service::submit_rating(
                    &*store,
                    &format!("user-{i}"),
                    &submission("place-1", "hotel", json!({ "cleanliness": 4 })),
                )
                .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let aggregate = store.get_place_rating("place-1").await.unwrap().unwrap();
    assert_eq!(aggregate.rating_count, 32);
    assert_eq!(aggregate.rules["cleanliness"], 100);
    assert_eq!(store.ratings_for_place("place-1").await.len(), 32);
}

#[tokio::test]
async fn test_duplicate_record_commits_nothing() {
    let store = InMemoryStore::new();
    let schema = RatingRulesSchema::from_value(&json!({ "cleanliness": 4 })).unwrap();
    let parsed =
        RatingSubmission::from_value(&submission("place-1", "hotel", json!({ "cleanliness": 3 })))
            .unwrap();
    let rating = ValidatedRating::new(parsed, schema).unwrap();
    let normalized = normalize(&rating);
    let record = UserRating::new("user-1", &rating, &normalized);
    let fold = |current: Option<&PlaceRatingAggregate>| fold_in(current, "hotel", &normalized);

    store.commit_rating(record.clone(), &fold).await.unwrap();
    let result = store.commit_rating(record, &fold).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    let aggregate = store.get_place_rating("place-1").await.unwrap().unwrap();
    assert_eq!(aggregate.rating_count, 1);
    assert_eq!(store.ratings_for_place("place-1").await.len(), 1);
}
