use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::option::OptionValue;

/// A raw answer as returned by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ResponseValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Checklist selections.
    Selections(Vec<OptionValue>),
    /// Ranking: option value -> assigned rank (1 = first).
    Ranking(BTreeMap<String, u32>),
}

impl ResponseValue {
    /// Comparison key for single-valued answers, matching
    /// [`OptionValue::key`].
    pub fn key(&self) -> Option<String> {
        match self {
            ResponseValue::Bool(b) => Some(b.to_string()),
            ResponseValue::Number(n) => Some(n.to_string()),
            ResponseValue::Text(s) => Some(s.trim().to_string()),
            ResponseValue::Selections(_) | ResponseValue::Ranking(_) => None,
        }
    }

    /// Numeric reading of a single-valued answer. Numeric text parses;
    /// booleans read as 1/0.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResponseValue::Number(n) => Some(*n),
            ResponseValue::Text(s) => s.trim().parse().ok(),
            ResponseValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ResponseValue::Selections(_) | ResponseValue::Ranking(_) => None,
        }
    }

    /// Blank text or an empty ranking. An empty selection list is an
    /// answer ("none apply") and is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseValue::Text(s) => s.trim().is_empty(),
            ResponseValue::Ranking(m) => m.is_empty(),
            ResponseValue::Selections(_) | ResponseValue::Bool(_) | ResponseValue::Number(_) => {
                false
            }
        }
    }
}

impl From<f64> for ResponseValue {
    fn from(n: f64) -> Self {
        ResponseValue::Number(n)
    }
}

impl From<&str> for ResponseValue {
    fn from(s: &str) -> Self {
        ResponseValue::Text(s.to_string())
    }
}

impl From<bool> for ResponseValue {
    fn from(b: bool) -> Self {
        ResponseValue::Bool(b)
    }
}

/// One accepted answer for one item during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CapturedResponse {
    pub item_number: u32,
    #[serde(default)]
    pub value: Option<ResponseValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The score the presentation layer claims for this answer. Checked
    /// against the definition, never trusted for aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl CapturedResponse {
    pub fn answered(item_number: u32, value: impl Into<ResponseValue>) -> Self {
        Self {
            item_number,
            value: Some(value.into()),
            label: None,
            score: None,
            skipped: false,
            skip_reason: None,
        }
    }

    pub fn skipped(item_number: u32, reason: Option<String>) -> Self {
        Self {
            item_number,
            value: None,
            label: None,
            score: None,
            skipped: true,
            skip_reason: reason,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The answer, unless skipped or blank.
    pub fn effective_value(&self) -> Option<&ResponseValue> {
        if self.skipped {
            return None;
        }
        self.value.as_ref().filter(|v| !v.is_empty())
    }
}
