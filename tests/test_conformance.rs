use std::collections::BTreeMap;

use place_ratings::errors::RatingError;
use place_ratings::rating::{
    RatingRulesSchema, RatingSubmission, ValidatedRating, conforms_to_schema,
};
use serde_json::json;

fn schema() -> RatingRulesSchema {
    RatingRulesSchema::from_value(&json!({ "a": 4, "b": 1 })).unwrap()
}

fn rules(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs
        .iter()
        .map(|(rule, score)| (rule.to_string(), *score))
        .collect()
}

#[test]
fn test_matching_rules_conform() {
    assert!(conforms_to_schema(&schema(), &rules(&[("a", 4.0), ("b", 1.0)])));
    assert!(conforms_to_schema(&schema(), &rules(&[("a", 1.0), ("b", 1.0)])));
    assert!(conforms_to_schema(&schema(), &rules(&[("a", 2.5), ("b", 0.5)])));
}

#[test]
fn test_zero_score_is_treated_as_missing() {
    assert!(!conforms_to_schema(&schema(), &rules(&[("a", 0.0), ("b", 1.0)])));
    assert!(!conforms_to_schema(&schema(), &rules(&[("a", 4.0), ("b", 0.0)])));
}

#[test]
fn test_score_above_max_fails() {
    assert!(!conforms_to_schema(&schema(), &rules(&[("a", 5.0), ("b", 1.0)])));
    assert!(!conforms_to_schema(&schema(), &rules(&[("a", 4.0), ("b", 2.0)])));
    assert!(!conforms_to_schema(&schema(), &rules(&[("a", 4.01), ("b", 1.0)])));
}

#[test]
fn test_rule_count_mismatch_fails() {
    assert!(!conforms_to_schema(&schema(), &rules(&[("a", 4.0)])));
    assert!(!conforms_to_schema(
        &schema(),
        &rules(&[("a", 4.0), ("b", 1.0), ("c", 1.0)])
    ));
}

#[test]
fn test_unknown_rule_with_matching_count_fails() {
    assert!(!conforms_to_schema(&schema(), &rules(&[("a", 4.0), ("c", 1.0)])));
}

#[test]
fn test_nothing_conforms_to_empty_schema() {
    let empty = RatingRulesSchema::default();

    assert!(conforms_to_schema(&empty, &BTreeMap::new()));
    assert!(!conforms_to_schema(&empty, &rules(&[("a", 1.0)])));
}

#[test]
fn test_validated_rating_requires_conformance() {
    let submission = RatingSubmission::from_value(&json!({
        "placeId": "place-1",
        "placeType": "restaurant",
        "rules": { "a": 4, "b": 1 }
    }))
    .unwrap();

    let rating = ValidatedRating::new(submission.clone(), schema()).unwrap();
    assert_eq!(rating.submission(), &submission);
    assert_eq!(rating.schema(), &schema());

    let zero = RatingSubmission::from_value(&json!({
        "placeId": "place-1",
        "placeType": "restaurant",
        "rules": { "a": 0, "b": 1 }
    }))
    .unwrap();

    assert_eq!(
        ValidatedRating::new(zero, schema()).unwrap_err(),
        RatingError::SchemaMismatch
    );
}
