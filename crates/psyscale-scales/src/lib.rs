//! psyscale-scales
//!
//! Scale definition validation and scoring engine. Pure computation with no
//! I/O: definitions come from a [`ScaleCatalog`], answers from the caller,
//! and results go back to the caller for persistence.

pub mod condition;
pub mod definition;
pub mod error;
pub mod instruments;
pub mod interpretation;
pub mod question_type;
pub mod report;
pub mod response;
pub mod scoring;
pub mod session;
pub mod strategy;
pub mod summary;

use psyscale_core::models::interpretation::Interpretation;
use psyscale_core::models::response::CapturedResponse;
use psyscale_core::models::result::ScoringResult;
use psyscale_core::models::scale::ScaleDefinition;

use condition::CompiledConditions;
use error::ScaleError;
use report::ValidationReport;
use strategy::{NoStrategies, StrategyResolver};

/// Check a scale definition for structural errors and quality warnings.
pub fn validate_scale(scale: &ScaleDefinition) -> ValidationReport {
    definition::validate_scale(scale)
}

/// Check a response set against a scale.
pub fn validate_responses(
    scale: &ScaleDefinition,
    responses: &[CapturedResponse],
) -> ValidationReport {
    response::validate_response_set(scale, responses)
}

/// Validate, score, and interpret a response set. Delegated scoring methods
/// need [`score_with`].
pub fn score(
    scale: &ScaleDefinition,
    responses: &[CapturedResponse],
) -> Result<ScoringResult, ScaleError> {
    score_with(scale, responses, &NoStrategies)
}

/// Like [`score`], resolving delegated methods through `strategies`. A
/// definition that fails the completeness checks is refused before any
/// response is looked at.
pub fn score_with(
    scale: &ScaleDefinition,
    responses: &[CapturedResponse],
    strategies: &dyn StrategyResolver,
) -> Result<ScoringResult, ScaleError> {
    let structure = definition::validate_completeness(scale);
    if !structure.is_valid {
        return Err(ScaleError::StructuralDefinition {
            scale_id: scale.id.clone(),
            report: structure,
        });
    }

    let conditions = CompiledConditions::compile(scale);
    let report = response::validate_with_conditions(scale, &conditions, responses);
    if !report.is_valid {
        return Err(ScaleError::ResponseValidation(report));
    }
    scoring::score_responses(scale, &conditions, responses, strategies)
}

/// Map a total score to the scale's interpretation.
pub fn interpret(scale: &ScaleDefinition, score: f64) -> Result<Interpretation, ScaleError> {
    interpretation::interpret(scale, score)
}

/// Source of scale definitions, keyed by scale id.
pub trait ScaleCatalog {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load one definition. Callers treat it as read-only.
    fn scale(&self, id: &str) -> Result<ScaleDefinition, Self::Error>;

    /// Ids of every scale the catalog can supply, sorted.
    fn scale_ids(&self) -> Result<Vec<String>, Self::Error>;
}

/// Return all built-in scales.
pub fn all_scales() -> Vec<&'static ScaleDefinition> {
    vec![
        instruments::phq9::definition(),
        instruments::gad7::definition(),
        instruments::rses::definition(),
    ]
}

/// Look up a built-in scale by ID.
pub fn get_scale(id: &str) -> Option<&'static ScaleDefinition> {
    all_scales().into_iter().find(|s| s.id == id)
}

/// Catalog over the built-in scales.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl ScaleCatalog for BuiltinCatalog {
    type Error = ScaleError;

    fn scale(&self, id: &str) -> Result<ScaleDefinition, ScaleError> {
        get_scale(id)
            .cloned()
            .ok_or_else(|| ScaleError::UnknownScale(id.to_string()))
    }

    fn scale_ids(&self) -> Result<Vec<String>, ScaleError> {
        let mut ids: Vec<String> = all_scales().iter().map(|s| s.id.clone()).collect();
        ids.sort();
        Ok(ids)
    }
}
