use std::collections::BTreeMap;

use crate::{
    errors::RatingError,
    rating::{schema::RatingRulesSchema, submission::RatingSubmission},
};

/// Checks submitted raw scores against a schema.
///
/// The rule counts must match and every schema rule needs a score in
/// `(0, max]`. A score of exactly `0` counts as missing, so a rule cannot be
/// rated at its lowest tier.
pub fn conforms_to_schema(schema: &RatingRulesSchema, rules: &BTreeMap<String, f64>) -> bool {
    if rules.len() != schema.len() {
        return false;
    }

    schema.rules().all(|(rule, scale)| match rules.get(rule) {
        Some(&score) => score != 0.0 && !score.is_nan() && score <= scale.max(),
        None => false,
    })
}

/// A submission that has passed the shape check and matches its schema.
///
/// Only [`ValidatedRating::new`] builds one, so normalization and aggregation
/// never see unchecked input.
#[derive(Debug, Clone)]
pub struct ValidatedRating {
    submission: RatingSubmission,
    schema: RatingRulesSchema,
}

impl ValidatedRating {
    pub fn new(
        submission: RatingSubmission,
        schema: RatingRulesSchema,
    ) -> Result<Self, RatingError> {
        if !conforms_to_schema(&schema, &submission.rules) {
            return Err(RatingError::SchemaMismatch);
        }

        Ok(Self { submission, schema })
    }

    pub fn submission(&self) -> &RatingSubmission {
        &self.submission
    }

    pub fn schema(&self) -> &RatingRulesSchema {
        &self.schema
    }
}
