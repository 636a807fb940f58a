//! The scoring engine.
//!
//! Resolves each answer to a raw item score, applies reverse scoring, and
//! aggregates per the scale's [`ScoringMethod`]. Delegated methods go through
//! a [`StrategyResolver`].

use std::collections::BTreeMap;

use psyscale_core::models::item::Item;
use psyscale_core::models::response::CapturedResponse;
use psyscale_core::models::result::{ScoringAnomaly, ScoringResult};
use psyscale_core::models::scale::{ScaleDefinition, ScoringMethod};

use crate::condition::{CompiledConditions, ResponseIndex};
use crate::error::ScaleError;
use crate::interpretation;
use crate::question_type;
use crate::strategy::StrategyResolver;

/// Maximum difference tolerated between the engine's score and an
/// independent recomputation.
pub const CONSISTENCY_TOLERANCE: f64 = 0.01;

/// One answered item's share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemContribution {
    pub item_number: u32,
    pub subscale: Option<String>,
    /// Score before reversal.
    pub raw: f64,
    /// Score after reversal; equal to `raw` for regular items.
    pub score: f64,
    pub weight: f64,
    pub reversed: bool,
}

impl ItemContribution {
    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }
}

/// Engine output before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub raw_score: f64,
    pub subscale_scores: BTreeMap<String, f64>,
    pub contributions: Vec<ItemContribution>,
    pub answered_items: usize,
    pub skipped_items: usize,
    pub completion_percentage: f64,
    pub anomalies: Vec<ScoringAnomaly>,
}

/// `(max + min) - raw`.
pub fn reverse_score(raw: f64, min: f64, max: f64) -> f64 {
    (max + min) - raw
}

/// Resolve one response into a contribution. `None` for skipped, blank,
/// or unscored answers.
pub fn contribution(
    scale: &ScaleDefinition,
    item: &Item,
    response: &CapturedResponse,
) -> Option<ItemContribution> {
    let value = response.effective_value()?;
    let options = scale.options_for(item);
    let raw = question_type::raw_score(item, value, options)?;

    let bounds = item
        .reverse_scored
        .then(|| question_type::score_bounds(item, options))
        .flatten();
    let score = match bounds {
        Some((min, max)) => reverse_score(raw, min, max),
        None => raw,
    };

    Some(ItemContribution {
        item_number: item.number,
        subscale: item.subscale.clone(),
        raw,
        score,
        weight: item.weight(),
        reversed: bounds.is_some(),
    })
}

/// Compute raw and subscale scores. Assumes the responses already passed
/// validation; unknown items and unscorable answers are ignored.
pub fn compute(
    scale: &ScaleDefinition,
    responses: &[CapturedResponse],
    strategies: &dyn StrategyResolver,
) -> Result<ScoreBreakdown, ScaleError> {
    let index = ResponseIndex::new(responses);

    let mut contributions = Vec::new();
    let mut answered_items = 0;
    let mut skipped_items = 0;
    for item in &scale.items {
        let Some(response) = index.get(item.number) else {
            continue;
        };
        if response.skipped {
            skipped_items += 1;
            continue;
        }
        if response.effective_value().is_some() {
            answered_items += 1;
        }
        if let Some(c) = contribution(scale, item, response) {
            contributions.push(c);
        }
    }

    let method = scale.scoring_method;
    let mut subscale_scores: BTreeMap<String, f64> = scale
        .subscales
        .iter()
        .map(|s| {
            let members: Vec<&ItemContribution> = contributions
                .iter()
                .filter(|c| c.subscale.as_deref() == Some(s.code.as_str()))
                .collect();
            (s.code.clone(), aggregate(method, &members))
        })
        .collect();

    let raw_score = if method.is_delegated() {
        let strategy = strategies
            .strategy_for(&scale.id)
            .ok_or_else(|| ScaleError::MissingStrategy(scale.id.clone()))?;
        let outcome = strategy.aggregate(scale, &contributions)?;
        tracing::debug!(
            scale_id = %scale.id,
            strategy = strategy.name(),
            raw_score = outcome.raw_score,
            "delegated scoring"
        );
        if !outcome.subscale_scores.is_empty() {
            subscale_scores = outcome.subscale_scores;
        }
        outcome.raw_score
    } else {
        let all: Vec<&ItemContribution> = contributions.iter().collect();
        aggregate(method, &all)
    };

    let completion_percentage = if scale.total_items == 0 {
        0.0
    } else {
        (answered_items + skipped_items) as f64 / scale.total_items as f64 * 100.0
    };

    let anomalies = range_anomalies(scale, raw_score, &subscale_scores);
    for anomaly in &anomalies {
        tracing::warn!(scale_id = %scale.id, ?anomaly, "scoring anomaly");
    }

    Ok(ScoreBreakdown {
        raw_score,
        subscale_scores,
        contributions,
        answered_items,
        skipped_items,
        completion_percentage,
        anomalies,
    })
}

/// Score, interpret, and annotate a response set that already passed
/// validation.
pub fn score_responses(
    scale: &ScaleDefinition,
    conditions: &CompiledConditions,
    responses: &[CapturedResponse],
    strategies: &dyn StrategyResolver,
) -> Result<ScoringResult, ScaleError> {
    let breakdown = compute(scale, responses, strategies)?;
    let interpretation = interpretation::interpret(scale, breakdown.raw_score)?;
    let subscale_interpretations =
        interpretation::interpret_subscales(scale, &breakdown.subscale_scores)?;
    let triggered_alerts = conditions.triggered_alerts(scale, &ResponseIndex::new(responses));

    let mut anomalies = breakdown.anomalies;
    if let Some(anomaly) = check_consistency(scale, responses, breakdown.raw_score) {
        tracing::warn!(scale_id = %scale.id, ?anomaly, "score disagrees with recomputation");
        anomalies.push(anomaly);
    }

    Ok(ScoringResult {
        scale_id: scale.id.clone(),
        raw_score: breakdown.raw_score,
        subscale_scores: breakdown.subscale_scores,
        interpretation,
        subscale_interpretations,
        triggered_alerts,
        completion_percentage: breakdown.completion_percentage,
        answered_items: breakdown.answered_items,
        skipped_items: breakdown.skipped_items,
        anomalies,
    })
}

/// Recompute the expected score item by item and compare it with `actual`.
/// Delegated methods are not checked.
pub fn check_consistency(
    scale: &ScaleDefinition,
    responses: &[CapturedResponse],
    actual: f64,
) -> Option<ScoringAnomaly> {
    let method = scale.scoring_method;
    if method.is_delegated() {
        return None;
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for item in &scale.items {
        let Some(value) = responses
            .iter()
            .rev()
            .find(|r| r.item_number == item.number)
            .and_then(CapturedResponse::effective_value)
        else {
            continue;
        };
        let options = scale.options_for(item);
        let Some(raw) = question_type::raw_score(item, value, options) else {
            continue;
        };
        let score = match question_type::score_bounds(item, options) {
            Some((lo, hi)) if item.reverse_scored => lo + hi - raw,
            _ => raw,
        };
        let weight = if method == ScoringMethod::WeightedSum {
            item.weight()
        } else {
            1.0
        };
        total += score * weight;
        count += 1;
    }

    let expected = match method {
        ScoringMethod::Average if count == 0 => 0.0,
        ScoringMethod::Average => total / count as f64,
        _ => total,
    };
    ((expected - actual).abs() > CONSISTENCY_TOLERANCE)
        .then_some(ScoringAnomaly::ScoreInconsistent { expected, actual })
}

fn aggregate(method: ScoringMethod, contributions: &[&ItemContribution]) -> f64 {
    match method {
        ScoringMethod::WeightedSum => contributions.iter().map(|c| c.weighted()).sum(),
        ScoringMethod::Average if contributions.is_empty() => 0.0,
        ScoringMethod::Average => {
            contributions.iter().map(|c| c.score).sum::<f64>() / contributions.len() as f64
        }
        ScoringMethod::Sum
        | ScoringMethod::Subscales
        | ScoringMethod::Algorithm
        | ScoringMethod::LookupTable => contributions.iter().map(|c| c.score).sum(),
    }
}

fn range_anomalies(
    scale: &ScaleDefinition,
    raw_score: f64,
    subscale_scores: &BTreeMap<String, f64>,
) -> Vec<ScoringAnomaly> {
    let mut anomalies = Vec::new();
    let range = scale.score_range;
    if !range.contains(raw_score) {
        anomalies.push(ScoringAnomaly::ScoreOutOfTheoreticalRange {
            score: raw_score,
            min: range.min,
            max: range.max,
        });
    }
    for subscale in &scale.subscales {
        let (Some(range), Some(score)) = (subscale.range(), subscale_scores.get(&subscale.code))
        else {
            continue;
        };
        if !range.contains(*score) {
            anomalies.push(ScoringAnomaly::SubscaleOutOfRange {
                subscale: subscale.code.clone(),
                score: *score,
                min: range.min,
                max: range.max,
            });
        }
    }
    anomalies
}
