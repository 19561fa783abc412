use std::collections::BTreeMap;

use serde::Serialize;

use crate::rating::conformance::ValidatedRating;

/// Scores of one submission on the common `0..=100` scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRating {
    rules: BTreeMap<String, u8>,
    overall_score: u8,
}

impl NormalizedRating {
    pub fn rules(&self) -> &BTreeMap<String, u8> {
        &self.rules
    }

    pub fn overall_score(&self) -> u8 {
        self.overall_score
    }
}

/// Rounds a non-negative value already bounded by 100.
pub(crate) fn to_score(value: f64) -> u8 {
    debug_assert!((0.0..=100.0).contains(&value), "score out of range: {value}");
    value.round().clamp(0.0, 100.0) as u8
}

/// Rounded mean of already rounded per-rule scores.
pub(crate) fn mean_score<'a>(scores: impl IntoIterator<Item = &'a u8>) -> u8 {
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0u32), |(sum, count), &score| {
            (sum + f64::from(score), count + 1)
        });
    debug_assert!(count > 0, "mean of an empty rule set");

    if count == 0 {
        return 0;
    }
    to_score(sum / f64::from(count))
}

pub fn normalize(rating: &ValidatedRating) -> NormalizedRating {
    let schema = rating.schema();

    // Overall score is taken from the exact products, rounded once.
    let mut rules = BTreeMap::new();
    let mut total = 0.0;
    for (rule, &raw) in &rating.submission().rules {
        let Some(scale) = schema.get(rule) else {
            continue;
        };
        let product = raw * scale.multiplier();
        total += product;
        rules.insert(rule.clone(), to_score(product));
    }
    debug_assert!(!rules.is_empty(), "normalizing an empty rule set");

    let overall_score = match rules.len() {
        0 => 0,
        count => to_score(total / count as f64),
    };

    NormalizedRating {
        rules,
        overall_score,
    }
}
