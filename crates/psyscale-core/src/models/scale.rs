use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::condition::ConditionalRule;
use super::interpretation::InterpretationRule;
use super::item::Item;
use super::option::ResponseOption;
use super::subscale::Subscale;
use crate::error::CoreError;

/// How item scores are aggregated into the scale's raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScoringMethod {
    /// Plain sum of item scores.
    #[default]
    Sum,
    /// Sum of item scores multiplied by each item's weight.
    WeightedSum,
    /// Mean over answered, scored items.
    Average,
    /// Delegated to a named external algorithm.
    Algorithm,
    /// Summed raw score converted through a lookup table.
    LookupTable,
    /// Sum, partitioned by subscale membership.
    Subscales,
}

impl ScoringMethod {
    /// Methods whose aggregation lives outside the engine.
    pub fn is_delegated(self) -> bool {
        matches!(self, ScoringMethod::Algorithm | ScoringMethod::LookupTable)
    }
}

/// The theoretical score range of a scale or subscale.
///
/// `step` is the adjacency increment between consecutive interpretation
/// rules; whole-number scales leave it unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl ScoreRange {
    pub const DEFAULT_STEP: f64 = 1.0;

    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub fn step(&self) -> f64 {
        self.step.unwrap_or(Self::DEFAULT_STEP)
    }

    pub fn contains(&self, value: f64) -> bool {
        // Allow floating point tolerance
        value >= self.min - 1e-9 && value <= self.max + 1e-9
    }
}

/// A declarative definition of one standardized scale.
///
/// Supplied by the catalog and treated as read-only by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleDefinition {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    pub total_items: usize,
    #[serde(default)]
    pub scoring_method: ScoringMethod,
    pub score_range: ScoreRange,
    pub items: Vec<Item>,
    #[serde(default)]
    pub response_options: Vec<ResponseOption>,
    #[serde(default)]
    pub interpretation_rules: Vec<InterpretationRule>,
    #[serde(default)]
    pub subscales: Vec<Subscale>,
    #[serde(default)]
    pub conditional_rules: Vec<ConditionalRule>,
}

impl ScaleDefinition {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn item(&self, number: u32) -> Option<&Item> {
        self.items.iter().find(|i| i.number == number)
    }

    /// The option set that applies to `item`: its own override when present,
    /// otherwise the scale's global set.
    pub fn options_for<'a>(&'a self, item: &'a Item) -> &'a [ResponseOption] {
        match &item.response_options {
            Some(own) => own,
            None => &self.response_options,
        }
    }

    pub fn subscale(&self, code: &str) -> Option<&Subscale> {
        self.subscales.iter().find(|s| s.code == code)
    }

    pub fn subscale_items<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .iter()
            .filter(move |i| i.subscale.as_deref() == Some(code))
    }
}
