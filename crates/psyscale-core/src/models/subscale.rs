use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::interpretation::InterpretationRule;
use super::scale::ScoreRange;

/// A named subset of items scored separately from the total.
/// Membership is declared on the items themselves.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subscale {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub interpretation_rules: Vec<InterpretationRule>,
}

impl Subscale {
    /// The declared range, when both bounds are present.
    pub fn range(&self) -> Option<ScoreRange> {
        match (self.min_score, self.max_score) {
            (Some(min), Some(max)) => Some(ScoreRange::new(min, max)),
            _ => None,
        }
    }
}
