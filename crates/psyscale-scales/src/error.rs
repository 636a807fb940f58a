use thiserror::Error;

use crate::report::ValidationReport;
use crate::session::SessionState;

#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("unknown scale: {0}")]
    UnknownScale(String),

    #[error("scale '{scale_id}' is structurally invalid: {report}")]
    StructuralDefinition {
        scale_id: String,
        report: ValidationReport,
    },

    #[error("responses rejected: {0}")]
    ResponseValidation(ValidationReport),

    #[error("no interpretation rule covers score {score} on scale '{scale_id}'")]
    NoInterpretationForScore { scale_id: String, score: f64 },

    #[error("no scoring strategy registered for scale '{0}'")]
    MissingStrategy(String),

    #[error("scoring strategy '{strategy}' failed: {message}")]
    Strategy { strategy: String, message: String },

    #[error("cannot transition session from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScaleError {
    /// The validation report behind a structural or response rejection.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            ScaleError::StructuralDefinition { report, .. }
            | ScaleError::ResponseValidation(report) => Some(report),
            _ => None,
        }
    }
}
