use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::errors::RatingError;

const PLACE_ID: &str = "placeId";
const PLACE_TYPE: &str = "placeType";
const RULES: &str = "rules";

/// A user's raw scores for one place, shape-checked but not yet matched to a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSubmission {
    pub place_id: String,
    pub place_type: String,
    pub rules: BTreeMap<String, f64>,
}

impl RatingSubmission {
    pub fn from_value(candidate: &Value) -> Result<Self, RatingError> {
        if !validate_submission(candidate) {
            return Err(RatingError::InvalidSubmission);
        }

        let field = |name: &str| candidate.get(name).ok_or(RatingError::InvalidSubmission);
        let text = |name: &str| -> Result<String, RatingError> {
            field(name)?
                .as_str()
                .map(|s| s.trim().to_string())
                .ok_or(RatingError::InvalidSubmission)
        };

        let rules = field(RULES)?
            .as_object()
            .ok_or(RatingError::InvalidSubmission)?
            .iter()
            .map(|(rule, score)| {
                score
                    .as_f64()
                    .map(|score| (rule.clone(), score))
                    .ok_or(RatingError::InvalidSubmission)
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            place_id: text(PLACE_ID)?,
            place_type: text(PLACE_TYPE)?,
            rules,
        })
    }
}

fn non_blank(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

/// Shape check for a candidate submission, independent of any schema.
pub fn validate_submission(candidate: &Value) -> bool {
    let Some(fields) = candidate.as_object() else {
        return false;
    };

    if fields.len() != 3 || !non_blank(fields.get(PLACE_ID)) || !non_blank(fields.get(PLACE_TYPE))
    {
        return false;
    }

    let Some(rules) = fields.get(RULES).and_then(Value::as_object) else {
        return false;
    };

    !rules.is_empty()
        && rules
            .values()
            .all(|score| score.as_f64().is_some_and(|score| score >= 0.0))
}
