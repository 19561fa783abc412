use serde::{Deserialize, Serialize};

use crate::rating::{PlaceRatingAggregate, RatingRulesSchema};

/// A place's aggregate together with the schema needed to read its raw maxima.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRating {
    pub place_rating: PlaceRatingAggregate,
    pub rating_schema: RatingRulesSchema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaWriteMode {
    Merge,
    Replace,
}
