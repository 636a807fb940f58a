//! Response set validation.
//!
//! Checks a full set of captured answers against a scale: each answer
//! against its item's grammar, plus the set-level rules (unknown items,
//! duplicates, forged scores, required items, conditional requirements).

use std::collections::HashSet;

use psyscale_core::models::item::{Item, QuestionType};
use psyscale_core::models::option::ResponseOption;
use psyscale_core::models::response::{CapturedResponse, ResponseValue};
use psyscale_core::models::scale::ScaleDefinition;

use crate::condition::{CompiledConditions, ResponseIndex};
use crate::question_type;
use crate::report::{IssueCode, ValidationIssue, ValidationReport};

const SCORE_TOLERANCE: f64 = 1e-9;

/// Validate a response set, compiling the scale's conditions on the fly.
pub fn validate_response_set(
    scale: &ScaleDefinition,
    responses: &[CapturedResponse],
) -> ValidationReport {
    validate_with_conditions(scale, &CompiledConditions::compile(scale), responses)
}

/// Validate a response set against already-compiled conditions.
pub fn validate_with_conditions(
    scale: &ScaleDefinition,
    conditions: &CompiledConditions,
    responses: &[CapturedResponse],
) -> ValidationReport {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let index = ResponseIndex::new(responses);
    let hidden = conditions.hidden_items(scale, &index);

    for response in responses {
        let number = response.item_number;
        if !seen.insert(number) {
            errors.push(ValidationIssue::for_item(
                IssueCode::DuplicateItemResponse,
                number,
                "more than one response for this item",
            ));
            continue;
        }
        let Some(item) = scale.item(number) else {
            errors.push(ValidationIssue::for_item(
                IssueCode::UnknownItem,
                number,
                format!("scale '{}' has no such item", scale.id),
            ));
            continue;
        };

        if response.skipped {
            if item.is_required() && !hidden.contains(&number) {
                errors.push(ValidationIssue::for_item(
                    IssueCode::MissingRequiredField,
                    number,
                    "required item cannot be skipped",
                ));
            }
            continue;
        }

        let options = scale.options_for(item);
        let value = response.value.as_ref();
        if let Err(issue) = question_type::validate_response(item, value, options) {
            errors.push(issue);
            continue;
        }

        if let (Some(declared), Some(value)) = (response.score, response.effective_value())
            && let Some((recorded, source)) = recorded_score(item, value, options)
            && (declared - recorded).abs() > SCORE_TOLERANCE
        {
            errors.push(ValidationIssue::for_item(
                IssueCode::ScoreMismatch,
                number,
                format!("declared score {declared} does not match {source} score {recorded}"),
            ));
        }
    }

    for item in scale.items.iter().filter(|i| i.is_required()) {
        if !seen.contains(&item.number) && !hidden.contains(&item.number) {
            errors.push(ValidationIssue::for_item(
                IssueCode::MissingRequiredField,
                item.number,
                "a response is required",
            ));
        }
    }

    errors.extend(conditions.unmet_requirements(scale, &index));

    ValidationReport::from_errors(errors)
}

/// The score the definition records for an accepted answer, and what it
/// was read from. Checklists record the sum of their selected options.
fn recorded_score(
    item: &Item,
    value: &ResponseValue,
    options: &[ResponseOption],
) -> Option<(f64, String)> {
    if let QuestionType::Checklist { .. } = item.question_type {
        let total = question_type::raw_score(item, value, options)?;
        return Some((total, "selections".to_string()));
    }
    let option = question_type::selected_option(item, value, options)?;
    Some((option.score?, format!("option '{}'", option.value)))
}
