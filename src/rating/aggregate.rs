use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    errors::RatingError,
    rating::normalize::{NormalizedRating, mean_score, to_score},
};

/// Running mean of every accepted rating for one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRatingAggregate {
    pub place_type: String,
    pub rules: BTreeMap<String, u8>,
    pub overall_score: u8,
    pub rating_count: u64,
}

impl PlaceRatingAggregate {
    pub fn seed(place_type: &str, rating: &NormalizedRating) -> Self {
        Self {
            place_type: place_type.to_string(),
            rules: rating.rules().clone(),
            overall_score: rating.overall_score(),
            rating_count: 1,
        }
    }
}

/// One step of a count-weighted running mean, rounded to a whole score.
pub fn running_mean(current: u8, prior_count: u64, new: u8) -> u8 {
    let prior = prior_count as f64;
    to_score((f64::from(current) * prior + f64::from(new)) / (prior + 1.0))
}

/// Produces the next aggregate for a place from its current one and a new rating.
///
/// Rounding happens at every step, so a long-lived aggregate drifts slightly
/// from the exact mean of its history.
pub fn fold_in(
    existing: Option<&PlaceRatingAggregate>,
    place_type: &str,
    rating: &NormalizedRating,
) -> Result<PlaceRatingAggregate, RatingError> {
    let Some(current) = existing else {
        return Ok(PlaceRatingAggregate::seed(place_type, rating));
    };

    // Schema was changed after this place was first rated.
    if !current.rules.keys().eq(rating.rules().keys()) {
        return Err(RatingError::RuleSetMismatch);
    }

    let prior_count = current.rating_count;
    let rules: BTreeMap<String, u8> = current
        .rules
        .iter()
        .zip(rating.rules().values())
        .map(|((rule, &old), &new)| (rule.clone(), running_mean(old, prior_count, new)))
        .collect();

    Ok(PlaceRatingAggregate {
        place_type: current.place_type.clone(),
        overall_score: mean_score(rules.values()),
        rules,
        rating_count: prior_count + 1,
    })
}
