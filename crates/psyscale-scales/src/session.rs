//! One administration of a scale, from first answer to acknowledged result.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use psyscale_core::models::response::CapturedResponse;
use psyscale_core::models::result::ScoringResult;
use psyscale_core::models::scale::ScaleDefinition;

use crate::condition::CompiledConditions;
use crate::definition::validate_scale;
use crate::error::ScaleError;
use crate::response::validate_with_conditions;
use crate::scoring::score_responses;
use crate::strategy::StrategyResolver;

/// Lifecycle of an assessment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionState {
    #[default]
    Created,
    CollectingResponses,
    Validating,
    Scoring,
    Interpreted,
    Finalized,
    Rejected,
    Cancelled,
}

impl SessionState {
    /// Valid transitions:
    /// - Created -> CollectingResponses | Cancelled
    /// - CollectingResponses -> Validating | Cancelled
    /// - Validating -> Scoring | Rejected
    /// - Scoring -> Interpreted | Rejected
    /// - Interpreted -> Finalized
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        self.valid_transitions().contains(target)
    }

    pub fn valid_transitions(&self) -> Vec<SessionState> {
        use SessionState::*;
        match self {
            Created => vec![CollectingResponses, Cancelled],
            CollectingResponses => vec![Validating, Cancelled],
            Validating => vec![Scoring, Rejected],
            Scoring => vec![Interpreted, Rejected],
            Interpreted => vec![Finalized],
            Finalized | Rejected | Cancelled => vec![],
        }
    }

    pub fn transition_to(&self, target: SessionState) -> Result<SessionState, ScaleError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ScaleError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Responses may be recorded or replaced.
    pub fn accepts_responses(&self) -> bool {
        matches!(self, SessionState::Created | SessionState::CollectingResponses)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Created => "created",
            SessionState::CollectingResponses => "collecting_responses",
            SessionState::Validating => "validating",
            SessionState::Scoring => "scoring",
            SessionState::Interpreted => "interpreted",
            SessionState::Finalized => "finalized",
            SessionState::Rejected => "rejected",
            SessionState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Drives one administration. Owns its responses and result; the scale
/// definition is shared read-only.
#[derive(Debug)]
pub struct AssessmentSession {
    id: Uuid,
    scale: Arc<ScaleDefinition>,
    conditions: CompiledConditions,
    state: SessionState,
    responses: BTreeMap<u32, CapturedResponse>,
    result: Option<ScoringResult>,
}

impl AssessmentSession {
    /// Open a session. Structurally invalid scales are refused.
    pub fn start(scale: Arc<ScaleDefinition>) -> Result<Self, ScaleError> {
        let report = validate_scale(&scale);
        if !report.is_valid {
            tracing::warn!(
                scale_id = %scale.id,
                errors = report.errors.len(),
                "refusing to administer invalid scale"
            );
            return Err(ScaleError::StructuralDefinition {
                scale_id: scale.id.clone(),
                report,
            });
        }

        let session = Self {
            id: Uuid::new_v4(),
            conditions: CompiledConditions::compile(&scale),
            scale,
            state: SessionState::Created,
            responses: BTreeMap::new(),
            result: None,
        };
        tracing::info!(session_id = %session.id, scale_id = %session.scale.id, "session created");
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scale(&self) -> &ScaleDefinition {
        &self.scale
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The result, once interpreted.
    pub fn result(&self) -> Option<&ScoringResult> {
        self.result.as_ref()
    }

    pub fn responses(&self) -> impl Iterator<Item = &CapturedResponse> {
        self.responses.values()
    }

    /// Percentage of the scale's items with a recorded answer or skip.
    pub fn progress(&self) -> f64 {
        if self.scale.total_items == 0 {
            return 0.0;
        }
        let known = self
            .responses
            .keys()
            .filter(|n| self.scale.item(**n).is_some())
            .count();
        known as f64 / self.scale.total_items as f64 * 100.0
    }

    /// Record an answer, replacing any earlier one for the same item.
    pub fn record_response(&mut self, response: CapturedResponse) -> Result<(), ScaleError> {
        if !self.state.accepts_responses() {
            return Err(ScaleError::InvalidTransition {
                from: self.state,
                to: SessionState::CollectingResponses,
            });
        }
        if self.state == SessionState::Created {
            self.transition(SessionState::CollectingResponses)?;
        }
        let replaced = self
            .responses
            .insert(response.item_number, response)
            .is_some();
        if replaced {
            tracing::debug!(session_id = %self.id, "response replaced");
        }
        Ok(())
    }

    pub fn skip_item(
        &mut self,
        item_number: u32,
        reason: Option<String>,
    ) -> Result<(), ScaleError> {
        self.record_response(CapturedResponse::skipped(item_number, reason))
    }

    /// Validate, score, and interpret the collected responses.
    ///
    /// On validation failure the session is rejected and every violation is
    /// returned together; no partial score is produced.
    pub fn submit(
        &mut self,
        strategies: &dyn StrategyResolver,
    ) -> Result<&ScoringResult, ScaleError> {
        if self.state == SessionState::Created {
            self.transition(SessionState::CollectingResponses)?;
        }
        self.transition(SessionState::Validating)?;

        let responses: Vec<CapturedResponse> = self.responses.values().cloned().collect();
        let report = validate_with_conditions(&self.scale, &self.conditions, &responses);
        if !report.is_valid {
            tracing::warn!(
                session_id = %self.id,
                scale_id = %self.scale.id,
                errors = report.errors.len(),
                "responses rejected"
            );
            self.transition(SessionState::Rejected)?;
            return Err(ScaleError::ResponseValidation(report));
        }

        self.transition(SessionState::Scoring)?;
        let result = match score_responses(&self.scale, &self.conditions, &responses, strategies) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(session_id = %self.id, error = %e, "scoring failed");
                self.transition(SessionState::Rejected)?;
                return Err(e);
            }
        };

        self.transition(SessionState::Interpreted)?;
        Ok(self.result.insert(result))
    }

    /// Acknowledge the interpreted result. Persisting it is the caller's job.
    pub fn finalize(&mut self) -> Result<ScoringResult, ScaleError> {
        self.transition(SessionState::Finalized)?;
        self.result.clone().ok_or(ScaleError::InvalidTransition {
            from: SessionState::Interpreted,
            to: SessionState::Finalized,
        })
    }

    pub fn cancel(&mut self) -> Result<(), ScaleError> {
        self.transition(SessionState::Cancelled)
    }

    fn transition(&mut self, target: SessionState) -> Result<(), ScaleError> {
        let next = self.state.transition_to(target)?;
        tracing::info!(
            session_id = %self.id,
            scale_id = %self.scale.id,
            from = %self.state,
            to = %next,
            "session transition"
        );
        self.state = next;
        Ok(())
    }
}
