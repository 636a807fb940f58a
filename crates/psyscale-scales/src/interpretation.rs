//! Score-to-severity resolution.

use std::collections::BTreeMap;

use psyscale_core::models::interpretation::{Interpretation, InterpretationRule};
use psyscale_core::models::scale::ScaleDefinition;

use crate::error::ScaleError;

/// The rule whose inclusive range contains `score`. When ranges overlap
/// (only possible if validation was bypassed) the lowest `min_score` wins.
pub fn resolve(rules: &[InterpretationRule], score: f64) -> Option<&InterpretationRule> {
    rules
        .iter()
        .filter(|r| r.contains(score))
        .min_by(|a, b| a.min_score.total_cmp(&b.min_score))
}

/// Interpret a total score against the scale's rules.
pub fn interpret(scale: &ScaleDefinition, score: f64) -> Result<Interpretation, ScaleError> {
    resolve(&scale.interpretation_rules, score)
        .map(|rule| Interpretation::from_rule(score, rule))
        .ok_or_else(|| ScaleError::NoInterpretationForScore {
            scale_id: scale.id.clone(),
            score,
        })
}

/// Interpret each subscale score for subscales that carry their own rules.
pub fn interpret_subscales(
    scale: &ScaleDefinition,
    subscale_scores: &BTreeMap<String, f64>,
) -> Result<BTreeMap<String, Interpretation>, ScaleError> {
    let mut out = BTreeMap::new();
    for subscale in scale
        .subscales
        .iter()
        .filter(|s| !s.interpretation_rules.is_empty())
    {
        let Some(score) = subscale_scores.get(&subscale.code) else {
            continue;
        };
        let rule = resolve(&subscale.interpretation_rules, *score).ok_or_else(|| {
            ScaleError::NoInterpretationForScore {
                scale_id: format!("{}/{}", scale.id, subscale.code),
                score: *score,
            }
        })?;
        out.insert(
            subscale.code.clone(),
            Interpretation::from_rule(*score, rule),
        );
    }
    Ok(out)
}
