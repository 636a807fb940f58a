use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The stored value of a response option. Scales use either numeric codes
/// (`0`, `1`, `2`) or short text codes (`"yes"`, `"often"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum OptionValue {
    Number(f64),
    Text(String),
}

impl OptionValue {
    /// Canonical comparison key. Numbers render without a trailing `.0`,
    /// so `2` and `2.0` share a key.
    pub fn key(&self) -> String {
        match self {
            OptionValue::Number(n) => n.to_string(),
            OptionValue::Text(s) => s.trim().to_string(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

/// A selectable answer with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseOption {
    pub value: OptionValue,
    pub label: String,
    #[serde(default)]
    pub score: Option<f64>,
}

impl ResponseOption {
    pub fn new(value: impl Into<OptionValue>, label: impl Into<String>, score: f64) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            score: Some(score),
        }
    }

    pub fn matches_key(&self, key: &str) -> bool {
        self.value.key().eq_ignore_ascii_case(key.trim())
    }
}

/// Lowest and highest defined scores in an option set.
pub fn score_extremes(options: &[ResponseOption]) -> Option<(f64, f64)> {
    options
        .iter()
        .filter_map(|o| o.score)
        .fold(None, |acc, s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
}

/// Find the option whose value matches `key`.
pub fn find_option<'a>(options: &'a [ResponseOption], key: &str) -> Option<&'a ResponseOption> {
    options.iter().find(|o| o.matches_key(key))
}
