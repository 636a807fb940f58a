use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::interpretation::Interpretation;

/// An item whose alert condition held for the submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriggeredAlert {
    pub item_number: u32,
    pub item_text: String,
    /// The condition as written, or `"any non-zero score"` for bare triggers.
    pub condition: String,
    pub value: Option<String>,
}

/// A non-blocking scoring warning attached to an otherwise valid result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum ScoringAnomaly {
    ScoreOutOfTheoreticalRange {
        score: f64,
        min: f64,
        max: f64,
    },
    SubscaleOutOfRange {
        subscale: String,
        score: f64,
        min: f64,
        max: f64,
    },
    ScoreInconsistent {
        expected: f64,
        actual: f64,
    },
}

/// The scored outcome of one completed administration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringResult {
    pub scale_id: String,
    pub raw_score: f64,
    pub subscale_scores: BTreeMap<String, f64>,
    pub interpretation: Interpretation,
    #[serde(default)]
    pub subscale_interpretations: BTreeMap<String, Interpretation>,
    pub triggered_alerts: Vec<TriggeredAlert>,
    pub completion_percentage: f64,
    pub answered_items: usize,
    pub skipped_items: usize,
    #[serde(default)]
    pub anomalies: Vec<ScoringAnomaly>,
}

impl ScoringResult {
    pub fn has_alerts(&self) -> bool {
        !self.triggered_alerts.is_empty()
    }
}
