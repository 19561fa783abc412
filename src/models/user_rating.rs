use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rating::{NormalizedRating, ValidatedRating};

/// Immutable record of one accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRating {
    pub id: Uuid,
    pub user_id: String,
    pub place_id: String,
    pub place_type: String,
    pub rules: BTreeMap<String, f64>,
    pub overall_score: u8,
    pub created_at: DateTime<Utc>,
}

impl UserRating {
    pub fn new(user_id: &str, rating: &ValidatedRating, normalized: &NormalizedRating) -> Self {
        let submission = rating.submission();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            place_id: submission.place_id.clone(),
            place_type: submission.place_type.clone(),
            rules: submission.rules.clone(),
            overall_score: normalized.overall_score(),
            created_at: Utc::now(),
        }
    }
}
