//! Pluggable aggregation for `algorithm` and `lookup_table` scales.
//!
//! The engine never hard-codes these methods. A [`StrategyResolver`]
//! supplied by the catalog maps a scale id to the strategy that scores it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use psyscale_core::models::scale::ScaleDefinition;

use crate::error::ScaleError;
use crate::scoring::ItemContribution;

/// What a strategy produces from the per-item contributions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyOutcome {
    pub raw_score: f64,
    pub subscale_scores: BTreeMap<String, f64>,
}

/// Trait implemented by each external scoring strategy.
pub trait ScoringStrategy: Send + Sync {
    /// Identifier used in logs and errors (e.g., "lookup_table").
    fn name(&self) -> &str;

    /// Aggregate already-resolved item contributions into a score.
    fn aggregate(
        &self,
        scale: &ScaleDefinition,
        contributions: &[ItemContribution],
    ) -> Result<StrategyOutcome, ScaleError>;
}

/// Resolves the strategy for a scale id.
pub trait StrategyResolver {
    fn strategy_for(&self, scale_id: &str) -> Option<&dyn ScoringStrategy>;
}

/// Resolver for callers with no delegated scales.
pub struct NoStrategies;

impl StrategyResolver for NoStrategies {
    fn strategy_for(&self, _scale_id: &str) -> Option<&dyn ScoringStrategy> {
        None
    }
}

/// Strategies keyed by scale id.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Box<dyn ScoringStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scale_id: impl Into<String>, strategy: Box<dyn ScoringStrategy>) {
        self.strategies.insert(scale_id.into(), strategy);
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl StrategyResolver for StrategyRegistry {
    fn strategy_for(&self, scale_id: &str) -> Option<&dyn ScoringStrategy> {
        self.strategies.get(scale_id).map(|s| s.as_ref())
    }
}

/// One row of a raw-to-converted score table. Both raw bounds inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LookupEntry {
    pub raw_min: f64,
    pub raw_max: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LookupTable {
    pub entries: Vec<LookupEntry>,
}

impl LookupTable {
    pub fn lookup(&self, raw: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| raw >= e.raw_min - 1e-9 && raw <= e.raw_max + 1e-9)
            .map(|e| e.value)
    }
}

/// Sums weighted contributions, then converts the total through a lookup
/// table. Subscale scores are left to the engine's partitioning.
#[derive(Debug, Clone)]
pub struct LookupTableStrategy {
    table: LookupTable,
}

impl LookupTableStrategy {
    pub fn new(table: LookupTable) -> Self {
        Self { table }
    }

    pub fn from_json(json: &str) -> Result<Self, ScaleError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    fn convert(&self, raw: f64) -> Result<f64, ScaleError> {
        self.table.lookup(raw).ok_or_else(|| ScaleError::Strategy {
            strategy: self.name().to_string(),
            message: format!("raw score {raw} is not in the lookup table"),
        })
    }
}

impl ScoringStrategy for LookupTableStrategy {
    fn name(&self) -> &str {
        "lookup_table"
    }

    fn aggregate(
        &self,
        _scale: &ScaleDefinition,
        contributions: &[ItemContribution],
    ) -> Result<StrategyOutcome, ScaleError> {
        let raw: f64 = contributions.iter().map(ItemContribution::weighted).sum();
        Ok(StrategyOutcome {
            raw_score: self.convert(raw)?,
            subscale_scores: BTreeMap::new(),
        })
    }
}
