//! Per-question-type response grammar.
//!
//! Every [`QuestionType`] variant has one handler here, matched
//! exhaustively: what shape of answer it accepts, which constraint its
//! metadata imposes, and how an accepted answer turns into a raw score.

use std::collections::HashSet;

use psyscale_core::models::item::{BinaryLabels, Item, QuestionType};
use psyscale_core::models::option::{ResponseOption, find_option, score_extremes};
use psyscale_core::models::response::ResponseValue;

use crate::report::{IssueCode, ValidationIssue};

/// Validate one answer against its item: required-but-empty first, then the
/// variant's grammar and constraint.
pub fn validate_response(
    item: &Item,
    value: Option<&ResponseValue>,
    options: &[ResponseOption],
) -> Result<(), ValidationIssue> {
    match value.filter(|v| !v.is_empty()) {
        None if item.is_required() => Err(ValidationIssue::for_item(
            IssueCode::MissingRequiredField,
            item.number,
            "a response is required",
        )),
        None => Ok(()),
        Some(v) => check_value(item, v, options),
    }
}

/// Check a non-empty answer against the item's grammar.
pub fn check_value(
    item: &Item,
    value: &ResponseValue,
    options: &[ResponseOption],
) -> Result<(), ValidationIssue> {
    match &item.question_type {
        QuestionType::Likert | QuestionType::MultipleChoice => {
            single_choice(item, value, options).map(|_| ())
        }
        QuestionType::Dichotomous => {
            if options.len() != 2 {
                return Err(invalid(
                    item,
                    format!(
                        "dichotomous item has {} options instead of 2",
                        options.len()
                    ),
                ));
            }
            single_choice(item, value, options).map(|_| ())
        }
        QuestionType::Binary { labels } => binary_answer(*labels, value, options)
            .map(|_| ())
            .ok_or_else(|| {
                let (yes, no) = labels.pair();
                invalid(
                    item,
                    format!("{} is not '{yes}' or '{no}'", describe(value)),
                )
            }),
        QuestionType::VisualAnalog { min, max } | QuestionType::Numeric { min, max } => {
            let n = numeric_value(value)
                .ok_or_else(|| invalid(item, format!("{} is not a number", describe(value))))?;
            check_bounds(item, n, *min, *max)
        }
        QuestionType::Text { max_length } => {
            let ResponseValue::Text(text) = value else {
                return Err(invalid(item, format!("{} is not text", describe(value))));
            };
            let len = text.chars().count();
            match max_length {
                Some(max) if len > *max => Err(out_of_range(
                    item,
                    format!("text is {len} characters, limit is {max}"),
                )),
                _ => Ok(()),
            }
        }
        QuestionType::Checklist {
            min_selections,
            max_selections,
        } => {
            let ResponseValue::Selections(selected) = value else {
                return Err(invalid(
                    item,
                    format!("{} is not a list of selections", describe(value)),
                ));
            };
            let mut seen = HashSet::new();
            for choice in selected {
                let key = choice.key();
                if find_option(options, &key).is_none() {
                    return Err(invalid(item, format!("selection '{key}' is not an option")));
                }
                if !seen.insert(key.to_ascii_lowercase()) {
                    return Err(invalid(item, format!("selection '{key}' appears twice")));
                }
            }
            let min = min_selections.unwrap_or(0);
            let max = max_selections.unwrap_or(options.len());
            if selected.len() < min || selected.len() > max {
                return Err(out_of_range(
                    item,
                    format!(
                        "{} selections made, expected between {min} and {max}",
                        selected.len()
                    ),
                ));
            }
            Ok(())
        }
        QuestionType::Ranking { max_rank } => {
            let ResponseValue::Ranking(ranks) = value else {
                return Err(invalid(
                    item,
                    format!("{} is not a ranking", describe(value)),
                ));
            };
            let limit = max_rank.unwrap_or(options.len() as u32);
            let mut used = HashSet::new();
            for (key, rank) in ranks {
                if find_option(options, key).is_none() {
                    return Err(invalid(item, format!("ranked '{key}' is not an option")));
                }
                if *rank < 1 || *rank > limit {
                    return Err(out_of_range(
                        item,
                        format!("rank {rank} for '{key}' is outside 1..={limit}"),
                    ));
                }
                if !used.insert(*rank) {
                    return Err(invalid(item, format!("rank {rank} is assigned twice")));
                }
            }
            Ok(())
        }
        QuestionType::SemanticDifferential { scale_points, .. } => {
            let n = numeric_value(value)
                .ok_or_else(|| invalid(item, format!("{} is not a number", describe(value))))?;
            if n.fract() != 0.0 {
                return Err(invalid(item, format!("position {n} is not a whole number")));
            }
            let points = scale_points.map(f64::from);
            if n < 1.0 || points.is_some_and(|p| n > p) {
                return Err(out_of_range(
                    item,
                    format!(
                        "position {n} is outside 1..={}",
                        points.map_or_else(|| "?".to_string(), |p| p.to_string())
                    ),
                ));
            }
            Ok(())
        }
        QuestionType::Unsupported => Err(invalid(item, "question type is not supported")),
    }
}

/// Raw (pre-reversal) score of an accepted answer. `None` for unscored
/// types and for answers the grammar would reject.
pub fn raw_score(item: &Item, value: &ResponseValue, options: &[ResponseOption]) -> Option<f64> {
    match &item.question_type {
        QuestionType::Likert | QuestionType::Dichotomous | QuestionType::MultipleChoice => {
            let key = value.key()?;
            find_option(options, &key)?.score
        }
        QuestionType::Binary { labels } => {
            let (answer, option) = binary_answer(*labels, value, options)?;
            match option {
                Some(o) => o.score,
                None => Some(if answer { 1.0 } else { 0.0 }),
            }
        }
        QuestionType::VisualAnalog { .. }
        | QuestionType::Numeric { .. }
        | QuestionType::SemanticDifferential { .. } => numeric_value(value),
        QuestionType::Checklist { .. } => {
            let ResponseValue::Selections(selected) = value else {
                return None;
            };
            Some(
                selected
                    .iter()
                    .filter_map(|s| find_option(options, &s.key()).and_then(|o| o.score))
                    .sum(),
            )
        }
        QuestionType::Text { .. } | QuestionType::Ranking { .. } | QuestionType::Unsupported => {
            None
        }
    }
}

/// The option an answer selected, for variants that select exactly one.
pub fn selected_option<'a>(
    item: &Item,
    value: &ResponseValue,
    options: &'a [ResponseOption],
) -> Option<&'a ResponseOption> {
    match &item.question_type {
        QuestionType::Likert | QuestionType::Dichotomous | QuestionType::MultipleChoice => {
            find_option(options, &value.key()?)
        }
        QuestionType::Binary { labels } => binary_answer(*labels, value, options)?.1,
        _ => None,
    }
}

/// Lowest and highest score an item can produce, used for reverse scoring.
pub fn score_bounds(item: &Item, options: &[ResponseOption]) -> Option<(f64, f64)> {
    match &item.question_type {
        QuestionType::Likert | QuestionType::Dichotomous | QuestionType::MultipleChoice => {
            score_extremes(options)
        }
        QuestionType::Binary { .. } => score_extremes(options).or(Some((0.0, 1.0))),
        QuestionType::VisualAnalog { min, max } | QuestionType::Numeric { min, max } => {
            Some(((*min)?, (*max)?))
        }
        QuestionType::SemanticDifferential { scale_points, .. } => {
            Some((1.0, f64::from((*scale_points)?)))
        }
        QuestionType::Checklist { .. } => {
            let total: f64 = options.iter().filter_map(|o| o.score).filter(|s| *s > 0.0).sum();
            Some((0.0, total))
        }
        QuestionType::Text { .. } | QuestionType::Ranking { .. } | QuestionType::Unsupported => {
            None
        }
    }
}

/// Resolve a binary answer to yes/no, along with the option it maps to
/// when the item carries options.
fn binary_answer<'a>(
    labels: BinaryLabels,
    value: &ResponseValue,
    options: &'a [ResponseOption],
) -> Option<(bool, Option<&'a ResponseOption>)> {
    let (yes, no) = labels.pair();
    let answer = match value {
        ResponseValue::Bool(b) => *b,
        ResponseValue::Text(s) if s.trim().eq_ignore_ascii_case(yes) => true,
        ResponseValue::Text(s) if s.trim().eq_ignore_ascii_case(no) => false,
        _ => {
            // Items may carry their own codes for the two answers.
            let option = find_option(options, &value.key()?)?;
            let (_, hi) = score_extremes(options)?;
            return Some((option.score == Some(hi), Some(option)));
        }
    };
    let option = value
        .key()
        .and_then(|k| find_option(options, &k))
        .or_else(|| find_option(options, if answer { yes } else { no }));
    Some((answer, option))
}

fn single_choice<'a>(
    item: &Item,
    value: &ResponseValue,
    options: &'a [ResponseOption],
) -> Result<&'a ResponseOption, ValidationIssue> {
    let key = match value {
        ResponseValue::Number(_) | ResponseValue::Text(_) => value.key(),
        _ => None,
    }
    .ok_or_else(|| invalid(item, format!("{} is not a single option", describe(value))))?;

    find_option(options, &key)
        .ok_or_else(|| invalid(item, format!("value '{key}' is not one of the options")))
}

fn numeric_value(value: &ResponseValue) -> Option<f64> {
    let n = match value {
        ResponseValue::Number(n) => *n,
        ResponseValue::Text(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn check_bounds(
    item: &Item,
    n: f64,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), ValidationIssue> {
    let below = min.is_some_and(|m| n < m);
    let above = max.is_some_and(|m| n > m);
    if below || above {
        return Err(out_of_range(
            item,
            format!(
                "{n} is outside [{}, {}]",
                min.map_or_else(|| "-inf".to_string(), |m| m.to_string()),
                max.map_or_else(|| "inf".to_string(), |m| m.to_string()),
            ),
        ));
    }
    Ok(())
}

fn describe(value: &ResponseValue) -> String {
    match value {
        ResponseValue::Bool(b) => format!("'{b}'"),
        ResponseValue::Number(n) => format!("'{n}'"),
        ResponseValue::Text(s) => format!("'{s}'"),
        ResponseValue::Selections(_) => "a selection list".to_string(),
        ResponseValue::Ranking(_) => "a ranking".to_string(),
    }
}

fn invalid(item: &Item, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue::for_item(IssueCode::InvalidValueForType, item.number, message)
}

fn out_of_range(item: &Item, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue::for_item(IssueCode::ValueOutOfRange, item.number, message)
}
