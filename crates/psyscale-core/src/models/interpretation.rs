use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A scored range mapped to a clinical severity. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InterpretationRule {
    pub min_score: f64,
    pub max_score: f64,
    pub severity: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl InterpretationRule {
    pub fn new(
        min_score: f64,
        max_score: f64,
        severity: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            min_score,
            max_score,
            severity: severity.into(),
            label: label.into(),
            color: None,
            description: None,
            recommendations: Vec::new(),
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        score >= self.min_score - 1e-9 && score <= self.max_score + 1e-9
    }
}

/// The resolved interpretation of one score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Interpretation {
    pub score: f64,
    pub severity: String,
    pub label: String,
    pub min_score: f64,
    pub max_score: f64,
    pub color: Option<String>,
    pub description: Option<String>,
    pub recommendations: Vec<String>,
}

impl Interpretation {
    pub fn from_rule(score: f64, rule: &InterpretationRule) -> Self {
        Self {
            score,
            severity: rule.severity.clone(),
            label: rule.label.clone(),
            min_score: rule.min_score,
            max_score: rule.max_score,
            color: rule.color.clone(),
            description: rule.description.clone(),
            recommendations: rule.recommendations.clone(),
        }
    }
}
