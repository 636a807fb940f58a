//! Scale definition validation.
//!
//! A definition must pass every structural check here before it can be
//! administered. Quality checks are advisory and never block use.

use std::collections::{BTreeSet, HashMap, HashSet};

use psyscale_core::models::interpretation::InterpretationRule;
use psyscale_core::models::item::QuestionType;
use psyscale_core::models::option::ResponseOption;
use psyscale_core::models::scale::{ScaleDefinition, ScoreRange};

use crate::condition::{CompiledConditions, Condition};
use crate::report::{
    IssueCode, QualityReport, QualityWarning, ValidationIssue, ValidationReport, WarningCode,
};

const EPSILON: f64 = 1e-9;

pub const MIN_ITEM_TEXT_LEN: usize = 10;
pub const MAX_ITEM_TEXT_LEN: usize = 250;
pub const MIN_OPTION_COUNT: usize = 2;
pub const MAX_OPTION_COUNT: usize = 10;

/// Run every structural check and attach quality warnings.
pub fn validate_scale(scale: &ScaleDefinition) -> ValidationReport {
    let mut report = validate_completeness(scale);
    report.merge(validate_referential_integrity(scale));
    report.merge(validate_question_type_configuration(scale));
    report.with_warnings(validate_quality_standards(scale))
}

pub fn validate_completeness(scale: &ScaleDefinition) -> ValidationReport {
    let mut errors = Vec::new();

    for (field, value) in [
        ("id", &scale.id),
        ("name", &scale.name),
        ("abbreviation", &scale.abbreviation),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationIssue::new(
                IssueCode::MissingRequiredField,
                format!("scale {field} is empty"),
            ));
        }
    }

    if scale.total_items != scale.items.len() {
        errors.push(ValidationIssue::new(
            IssueCode::ItemCountMismatch,
            format!(
                "total_items is {} but {} items are defined",
                scale.total_items,
                scale.items.len()
            ),
        ));
    }
    if scale.items.is_empty() {
        errors.push(ValidationIssue::new(
            IssueCode::MissingRequiredField,
            "scale has no items",
        ));
    }

    errors.extend(check_numbering(scale));

    for item in &scale.items {
        if item.text.trim().is_empty() {
            errors.push(ValidationIssue::for_item(
                IssueCode::EmptyItemText,
                item.number,
                "item text is empty",
            ));
        }
    }

    let needs_global = scale
        .items
        .iter()
        .any(|i| i.question_type.uses_options() && i.response_options.is_none());
    if needs_global && scale.response_options.is_empty() {
        errors.push(ValidationIssue::new(
            IssueCode::MissingResponseOptions,
            "scale has no response options",
        ));
    }
    errors.extend(check_option_set(&scale.response_options, None, true));
    for item in &scale.items {
        if let Some(own) = &item.response_options {
            let scored = !matches!(item.question_type, QuestionType::Ranking { .. });
            errors.extend(check_option_set(own, Some(item.number), scored));
        }
    }

    if scale.score_range.min > scale.score_range.max {
        errors.push(ValidationIssue::new(
            IssueCode::InvalidScoreRange,
            format!(
                "score range min {} exceeds max {}",
                scale.score_range.min, scale.score_range.max
            ),
        ));
    }
    if scale.score_range.step.is_some_and(|s| s <= 0.0) {
        errors.push(ValidationIssue::new(
            IssueCode::InvalidScoreRange,
            "score range step must be positive",
        ));
    }

    if scale.interpretation_rules.is_empty() {
        errors.push(ValidationIssue::new(
            IssueCode::MissingInterpretationRules,
            "scale has no interpretation rules",
        ));
    } else {
        errors.extend(check_rule_cover(
            &scale.interpretation_rules,
            &scale.score_range,
            "scale",
        ));
    }

    ValidationReport::from_errors(errors)
}

pub fn validate_referential_integrity(scale: &ScaleDefinition) -> ValidationReport {
    let mut errors = Vec::new();

    let mut declared = HashSet::new();
    for subscale in &scale.subscales {
        if !declared.insert(subscale.code.as_str()) {
            errors.push(ValidationIssue::new(
                IssueCode::DuplicateSubscale,
                format!("subscale '{}' is declared twice", subscale.code),
            ));
        }
    }

    for item in &scale.items {
        if let Some(code) = &item.subscale
            && !declared.contains(code.as_str())
        {
            errors.push(ValidationIssue::for_item(
                IssueCode::UndeclaredSubscale,
                item.number,
                format!("references undeclared subscale '{code}'"),
            ));
        }
    }

    for subscale in &scale.subscales {
        if scale.subscale_items(&subscale.code).next().is_none() {
            errors.push(ValidationIssue::new(
                IssueCode::EmptySubscale,
                format!("subscale '{}' has no items", subscale.code),
            ));
        }
        if let (Some(min), Some(max)) = (subscale.min_score, subscale.max_score)
            && min > max
        {
            errors.push(ValidationIssue::new(
                IssueCode::InvalidScoreRange,
                format!("subscale '{}' min {min} exceeds max {max}", subscale.code),
            ));
        }
        if !subscale.interpretation_rules.is_empty() {
            match subscale.range() {
                Some(range) => errors.extend(check_rule_cover(
                    &subscale.interpretation_rules,
                    &range,
                    &format!("subscale '{}'", subscale.code),
                )),
                None => errors.push(ValidationIssue::new(
                    IssueCode::InvalidScoreRange,
                    format!(
                        "subscale '{}' has interpretation rules but no min/max score",
                        subscale.code
                    ),
                )),
            }
        }
    }

    let numbers: HashSet<u32> = scale.items.iter().map(|i| i.number).collect();
    for rule in &scale.conditional_rules {
        if !numbers.contains(&rule.target_item) {
            errors.push(ValidationIssue::new(
                IssueCode::UnknownConditionItem,
                format!(
                    "conditional rule '{}' targets unknown item {}",
                    rule.condition, rule.target_item
                ),
            ));
        }
        if let Condition::Compare { item, .. } = Condition::parse(&rule.condition)
            && !numbers.contains(&item)
        {
            errors.push(ValidationIssue::new(
                IssueCode::UnknownConditionItem,
                format!(
                    "conditional rule '{}' refers to unknown item {item}",
                    rule.condition
                ),
            ));
        }
    }

    ValidationReport::from_errors(errors)
}

pub fn validate_question_type_configuration(scale: &ScaleDefinition) -> ValidationReport {
    let mut errors = Vec::new();

    for item in &scale.items {
        let n = item.number;
        let options = scale.options_for(item);
        let own_count = item.response_options.as_ref().map_or(0, Vec::len);

        match &item.question_type {
            QuestionType::Likert | QuestionType::MultipleChoice => {}
            QuestionType::Dichotomous => {
                if options.len() != 2 {
                    errors.push(ValidationIssue::for_item(
                        IssueCode::InvalidOptionCount,
                        n,
                        format!("dichotomous item needs exactly 2 options, has {}", options.len()),
                    ));
                }
            }
            QuestionType::Binary { .. } => {
                if item.response_options.is_some() && own_count != 2 {
                    errors.push(ValidationIssue::for_item(
                        IssueCode::InvalidOptionCount,
                        n,
                        format!("binary item options must be a pair, has {own_count}"),
                    ));
                }
            }
            QuestionType::VisualAnalog { min, max } | QuestionType::Numeric { min, max } => {
                match (min, max) {
                    (Some(lo), Some(hi)) if lo >= hi => errors.push(ValidationIssue::for_item(
                        IssueCode::InvalidTypeMetadata,
                        n,
                        format!("min {lo} must be below max {hi}"),
                    )),
                    (Some(_), Some(_)) => {}
                    _ => errors.push(ValidationIssue::for_item(
                        IssueCode::MissingTypeMetadata,
                        n,
                        format!("{} item needs min and max", item.question_type.name()),
                    )),
                }
            }
            QuestionType::Text { max_length } => match max_length {
                None => errors.push(ValidationIssue::for_item(
                    IssueCode::MissingTypeMetadata,
                    n,
                    "text item needs max_length",
                )),
                Some(0) => errors.push(ValidationIssue::for_item(
                    IssueCode::InvalidTypeMetadata,
                    n,
                    "max_length must be positive",
                )),
                Some(_) => {}
            },
            QuestionType::Checklist {
                min_selections,
                max_selections,
            } => {
                check_own_options(&mut errors, n, own_count, "checklist");
                let min = min_selections.unwrap_or(0);
                let max = max_selections.unwrap_or(own_count);
                if min > max || max > own_count {
                    errors.push(ValidationIssue::for_item(
                        IssueCode::InvalidTypeMetadata,
                        n,
                        format!(
                            "selection bounds {min}..={max} do not fit {own_count} options"
                        ),
                    ));
                }
            }
            QuestionType::Ranking { max_rank } => {
                check_own_options(&mut errors, n, own_count, "ranking");
                if max_rank.is_some_and(|r| r == 0) {
                    errors.push(ValidationIssue::for_item(
                        IssueCode::InvalidTypeMetadata,
                        n,
                        "max_rank must be positive",
                    ));
                }
            }
            QuestionType::SemanticDifferential {
                left_concept,
                right_concept,
                scale_points,
            } => {
                let blank = |c: &Option<String>| c.as_deref().is_none_or(|s| s.trim().is_empty());
                if blank(left_concept) || blank(right_concept) {
                    errors.push(ValidationIssue::for_item(
                        IssueCode::MissingTypeMetadata,
                        n,
                        "semantic differential needs both concepts",
                    ));
                }
                match scale_points {
                    None => errors.push(ValidationIssue::for_item(
                        IssueCode::MissingTypeMetadata,
                        n,
                        "semantic differential needs scale_points",
                    )),
                    Some(p) if *p < 2 => errors.push(ValidationIssue::for_item(
                        IssueCode::InvalidTypeMetadata,
                        n,
                        format!("scale_points must be at least 2, is {p}"),
                    )),
                    Some(_) => {}
                }
            }
            QuestionType::Unsupported => errors.push(ValidationIssue::for_item(
                IssueCode::UnsupportedQuestionType,
                n,
                "question type is not one of the supported types",
            )),
        }

        if item.required.is_none() {
            errors.push(ValidationIssue::for_item(
                IssueCode::RequiredFlagUnset,
                n,
                "required flag must be set explicitly",
            ));
        }
        if item.weight.is_some_and(|w| !w.is_finite()) {
            errors.push(ValidationIssue::for_item(
                IssueCode::InvalidTypeMetadata,
                n,
                "weight must be a finite number",
            ));
        }
    }

    ValidationReport::from_errors(errors)
}

pub fn validate_quality_standards(scale: &ScaleDefinition) -> QualityReport {
    let mut warnings = Vec::new();

    if scale.description.as_deref().is_none_or(|d| d.trim().is_empty()) {
        warnings.push(QualityWarning::new(
            WarningCode::MissingDescription,
            None,
            "scale has no description",
        ));
    }
    if scale.instructions.as_deref().is_none_or(|d| d.trim().is_empty()) {
        warnings.push(QualityWarning::new(
            WarningCode::MissingInstructions,
            None,
            "scale has no administration instructions",
        ));
    }

    for item in &scale.items {
        let len = item.text.trim().chars().count();
        if len > 0 && len < MIN_ITEM_TEXT_LEN {
            warnings.push(QualityWarning::new(
                WarningCode::ItemTextTooShort,
                Some(item.number),
                format!("item text is {len} characters (recommended at least {MIN_ITEM_TEXT_LEN})"),
            ));
        } else if len > MAX_ITEM_TEXT_LEN {
            warnings.push(QualityWarning::new(
                WarningCode::ItemTextTooLong,
                Some(item.number),
                format!("item text is {len} characters (recommended at most {MAX_ITEM_TEXT_LEN})"),
            ));
        }
        if let Some(own) = &item.response_options {
            push_option_count_warning(&mut warnings, Some(item.number), own.len());
        }
    }

    if !scale.response_options.is_empty() {
        push_option_count_warning(&mut warnings, None, scale.response_options.len());
    }

    for rule in &scale.interpretation_rules {
        if rule.description.as_deref().is_none_or(|d| d.trim().is_empty()) {
            warnings.push(QualityWarning::new(
                WarningCode::MissingRuleDescription,
                None,
                format!("interpretation rule '{}' has no description", rule.label),
            ));
        }
    }

    for (item, source) in CompiledConditions::compile(scale).malformed() {
        warnings.push(QualityWarning::new(
            WarningCode::MalformedCondition,
            item,
            format!("condition '{source}' cannot be parsed and will never hold"),
        ));
    }

    QualityReport::from_warnings(warnings)
}

/// Check that rules, sorted by `min_score`, tile `range` exactly: no gaps,
/// no overlaps, first rule at or below the minimum, last at or above the
/// maximum.
pub fn check_rule_cover(
    rules: &[InterpretationRule],
    range: &ScoreRange,
    context: &str,
) -> Vec<ValidationIssue> {
    let mut errors = Vec::new();

    for rule in rules {
        if rule.min_score > rule.max_score {
            errors.push(ValidationIssue::new(
                IssueCode::InvalidRuleRange,
                format!(
                    "{context} rule '{}' has min {} above max {}",
                    rule.label, rule.min_score, rule.max_score
                ),
            ));
        }
    }

    let mut sorted: Vec<&InterpretationRule> = rules.iter().collect();
    sorted.sort_by(|a, b| a.min_score.total_cmp(&b.min_score));

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return errors;
    };
    if first.min_score > range.min + EPSILON {
        errors.push(ValidationIssue::new(
            IssueCode::InterpretationCoverage,
            format!(
                "{context} rules start at {} but the range starts at {}",
                first.min_score, range.min
            ),
        ));
    }
    if last.max_score < range.max - EPSILON {
        errors.push(ValidationIssue::new(
            IssueCode::InterpretationCoverage,
            format!(
                "{context} rules end at {} but the range ends at {}",
                last.max_score, range.max
            ),
        ));
    }

    let step = range.step();
    for pair in sorted.windows(2) {
        let [current, next] = pair else { continue };
        if next.min_score <= current.max_score + EPSILON {
            errors.push(ValidationIssue::new(
                IssueCode::InterpretationOverlap,
                format!(
                    "{context} rules '{}' ({}-{}) and '{}' ({}-{}) overlap",
                    current.label,
                    current.min_score,
                    current.max_score,
                    next.label,
                    next.min_score,
                    next.max_score
                ),
            ));
        } else if (current.max_score + step - next.min_score).abs() > EPSILON {
            errors.push(ValidationIssue::new(
                IssueCode::InterpretationGap,
                format!(
                    "{context} rules leave a gap between {} and {}",
                    current.max_score, next.min_score
                ),
            ));
        }
    }

    errors
}

fn check_numbering(scale: &ScaleDefinition) -> Vec<ValidationIssue> {
    let mut errors = Vec::new();
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for item in &scale.items {
        *counts.entry(item.number).or_default() += 1;
    }

    let mut duplicates: Vec<u32> = counts
        .iter()
        .filter(|(_, c)| **c > 1)
        .map(|(n, _)| *n)
        .collect();
    duplicates.sort_unstable();
    for n in duplicates {
        errors.push(ValidationIssue::for_item(
            IssueCode::DuplicateItemNumber,
            n,
            "item number is used more than once",
        ));
    }

    let expected = scale.items.len() as u32;
    let present: BTreeSet<u32> = counts.keys().copied().collect();
    for n in (1..=expected).filter(|n| !present.contains(n)) {
        errors.push(ValidationIssue::new(
            IssueCode::NonContiguousNumbering,
            format!("item number {n} is missing"),
        ));
    }
    for n in present.iter().filter(|n| **n == 0 || **n > expected) {
        errors.push(ValidationIssue::for_item(
            IssueCode::NonContiguousNumbering,
            *n,
            format!("item number is outside 1..={expected}"),
        ));
    }

    errors
}

fn check_option_set(
    options: &[ResponseOption],
    item: Option<u32>,
    scored: bool,
) -> Vec<ValidationIssue> {
    let issue = |code, message: String| match item {
        Some(n) => ValidationIssue::for_item(code, n, message),
        None => ValidationIssue::new(code, message),
    };

    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for option in options {
        let key = option.value.key().to_ascii_lowercase();
        if !seen.insert(key) {
            errors.push(issue(
                IssueCode::DuplicateOptionValue,
                format!("option value '{}' appears more than once", option.value),
            ));
        }
        if option.label.trim().is_empty() {
            errors.push(issue(
                IssueCode::EmptyOptionLabel,
                format!("option '{}' has an empty label", option.value),
            ));
        }
        if scored && option.score.is_none_or(|s| !s.is_finite()) {
            errors.push(issue(
                IssueCode::MissingOptionScore,
                format!("option '{}' has no score", option.value),
            ));
        }
    }
    errors
}

fn check_own_options(errors: &mut Vec<ValidationIssue>, item: u32, own_count: usize, kind: &str) {
    if own_count < 2 {
        errors.push(ValidationIssue::for_item(
            IssueCode::InvalidOptionCount,
            item,
            format!("{kind} item needs at least 2 options of its own, has {own_count}"),
        ));
    }
}

fn push_option_count_warning(warnings: &mut Vec<QualityWarning>, item: Option<u32>, count: usize) {
    if !(MIN_OPTION_COUNT..=MAX_OPTION_COUNT).contains(&count) {
        warnings.push(QualityWarning::new(
            WarningCode::OptionCountOutOfBounds,
            item,
            format!(
                "{count} response options (recommended {MIN_OPTION_COUNT}-{MAX_OPTION_COUNT})"
            ),
        ));
    }
}
