use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RatingError;

/// Maximum raw value a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Scale {
    /// Yes/no style rule, raw range `0..=1`.
    Binary,
    /// Four-tier rule, raw range `0..=4`.
    Tiered,
}

impl Scale {
    pub fn from_number(value: f64) -> Option<Self> {
        if value == 1.0 {
            Some(Scale::Binary)
        } else if value == 4.0 {
            Some(Scale::Tiered)
        } else {
            None
        }
    }

    pub fn max(self) -> f64 {
        match self {
            Scale::Binary => 1.0,
            Scale::Tiered => 4.0,
        }
    }

    /// Factor that maps a raw score onto `0..=100`: 100 for binary, 25 for tiered.
    pub fn multiplier(self) -> f64 {
        (100.0 / self.max()).round()
    }
}

impl TryFrom<u8> for Scale {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Scale::from_number(f64::from(value)).ok_or_else(|| format!("Invalid scale: {value}"))
    }
}

impl From<Scale> for u8 {
    fn from(scale: Scale) -> Self {
        match scale {
            Scale::Binary => 1,
            Scale::Tiered => 4,
        }
    }
}

/// Rules a place type is rated on, each with its raw maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingRulesSchema {
    rules: BTreeMap<String, Scale>,
}

impl RatingRulesSchema {
    pub fn from_value(candidate: &Value) -> Result<Self, RatingError> {
        if !validate_schema(candidate) {
            return Err(RatingError::InvalidSchema);
        }

        let rules = candidate
            .as_object()
            .into_iter()
            .flatten()
            .filter_map(|(rule, scale)| {
                let scale = scale.as_f64().and_then(Scale::from_number)?;
                Some((rule.clone(), scale))
            })
            .collect();

        Ok(Self { rules })
    }

    pub fn get(&self, rule: &str) -> Option<Scale> {
        self.rules.get(rule).copied()
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, Scale)> {
        self.rules.iter().map(|(rule, scale)| (rule.as_str(), *scale))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Field-by-field update: rules in `other` are added or overwritten, the rest kept.
    pub fn merge(&mut self, other: RatingRulesSchema) {
        self.rules.extend(other.rules);
    }
}

/// Shape check for a candidate schema. An empty object passes.
pub fn validate_schema(candidate: &Value) -> bool {
    let Some(rules) = candidate.as_object() else {
        return false;
    };

    rules
        .values()
        .all(|scale| scale.as_f64().and_then(Scale::from_number).is_some())
}
