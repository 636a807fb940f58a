mod common;

use std::collections::BTreeMap;

use psyscale_core::models::item::{BinaryLabels, Item, QuestionType};
use psyscale_core::models::option::{OptionValue, ResponseOption};
use psyscale_core::models::response::{CapturedResponse, ResponseValue};
use psyscale_core::models::scale::ScaleDefinition;
use psyscale_scales::question_type::{check_value, raw_score, validate_response};
use psyscale_scales::report::IssueCode;
use psyscale_scales::validate_responses;

use common::{answers, item, likert_scale, numbered_options, three_item_scale};

fn symptom_options() -> Vec<ResponseOption> {
    vec![
        ResponseOption::new("headache", "Headache", 1.0),
        ResponseOption::new("nausea", "Nausea", 2.0),
        ResponseOption::new("fatigue", "Fatigue", 1.0),
    ]
}

fn code(result: Result<(), psyscale_scales::report::ValidationIssue>) -> Option<IssueCode> {
    result.err().map(|e| e.code)
}

#[test]
fn complete_set_is_valid() {
    let report = validate_responses(&three_item_scale(), &answers(&[0.0, 1.0, 3.0]));
    assert!(report.is_valid, "{report}");
}

#[test]
fn text_outside_options_is_invalid_for_type() {
    let scale = three_item_scale();
    let mut responses = answers(&[1.0, 1.0]);
    responses.push(CapturedResponse::answered(3, "maybe"));

    let report = validate_responses(&scale, &responses);
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, IssueCode::InvalidValueForType);
    assert_eq!(report.errors[0].item_number, Some(3));
}

#[test]
fn numeric_text_matches_numeric_option() {
    let scale = three_item_scale();
    let mut responses = answers(&[1.0, 1.0]);
    responses.push(CapturedResponse::answered(3, "2"));
    assert!(validate_responses(&scale, &responses).is_valid);
}

#[test]
fn every_violation_is_reported_at_once() {
    let scale = three_item_scale();
    let responses = vec![
        CapturedResponse::answered(1, 7.0),
        CapturedResponse::answered(1, 1.0),
        CapturedResponse::answered(9, 1.0),
    ];
    let report = validate_responses(&scale, &responses);
    assert_eq!(
        report.codes(),
        vec![
            IssueCode::InvalidValueForType,
            IssueCode::DuplicateItemResponse,
            IssueCode::UnknownItem,
            IssueCode::MissingRequiredField,
            IssueCode::MissingRequiredField,
        ]
    );
}

#[test]
fn required_items_cannot_be_skipped() {
    let scale = three_item_scale();
    let mut responses = answers(&[1.0, 1.0]);
    responses.push(CapturedResponse::skipped(3, Some("declined".to_string())));
    let report = validate_responses(&scale, &responses);
    assert_eq!(report.codes(), vec![IssueCode::MissingRequiredField]);
}

#[test]
fn optional_items_may_be_skipped_or_omitted() {
    let mut scale = three_item_scale();
    scale.items[1].required = Some(false);
    scale.items[2].required = Some(false);
    let responses = vec![
        CapturedResponse::answered(1, 2.0),
        CapturedResponse::skipped(2, None),
    ];
    assert!(validate_responses(&scale, &responses).is_valid);
}

#[test]
fn blank_text_counts_as_missing() {
    let scale = three_item_scale();
    let mut responses = answers(&[1.0, 1.0]);
    responses.push(CapturedResponse::answered(3, "   "));
    let report = validate_responses(&scale, &responses);
    assert_eq!(report.codes(), vec![IssueCode::MissingRequiredField]);
}

#[test]
fn declared_score_must_match_option() {
    let scale = three_item_scale();
    let responses = vec![
        CapturedResponse::answered(1, 2.0).with_score(2.0),
        CapturedResponse::answered(2, 2.0).with_score(3.0),
        CapturedResponse::answered(3, 0.0),
    ];
    let report = validate_responses(&scale, &responses);
    assert_eq!(report.codes(), vec![IssueCode::ScoreMismatch]);
    assert_eq!(report.errors[0].item_number, Some(2));
}

#[test]
fn item_options_override_global_options() {
    let mut scale = three_item_scale();
    scale.items[0].response_options = Some(vec![
        ResponseOption::new("never", "Never", 0.0),
        ResponseOption::new("always", "Always", 3.0),
    ]);
    let responses = vec![
        CapturedResponse::answered(1, "Always"),
        CapturedResponse::answered(2, 1.0),
        CapturedResponse::answered(3, 1.0),
    ];
    assert!(validate_responses(&scale, &responses).is_valid);

    let wrong = vec![
        CapturedResponse::answered(1, 1.0),
        CapturedResponse::answered(2, 1.0),
        CapturedResponse::answered(3, 1.0),
    ];
    assert_eq!(
        validate_responses(&scale, &wrong).codes(),
        vec![IssueCode::InvalidValueForType]
    );
}

#[test]
fn binary_accepts_bools_and_labels() {
    let yes_no = item(1, QuestionType::Binary { labels: BinaryLabels::YesNo });
    assert!(check_value(&yes_no, &true.into(), &[]).is_ok());
    assert!(check_value(&yes_no, &"No".into(), &[]).is_ok());
    assert_eq!(
        code(check_value(&yes_no, &"maybe".into(), &[])),
        Some(IssueCode::InvalidValueForType)
    );
    assert_eq!(raw_score(&yes_no, &"yes".into(), &[]), Some(1.0));
    assert_eq!(raw_score(&yes_no, &false.into(), &[]), Some(0.0));

    let true_false = item(2, QuestionType::Binary { labels: BinaryLabels::TrueFalse });
    assert!(check_value(&true_false, &"TRUE".into(), &[]).is_ok());
    assert!(check_value(&true_false, &"yes".into(), &[]).is_err());
}

#[test]
fn binary_uses_option_scores_when_present() {
    let binary = item(1, QuestionType::Binary { labels: BinaryLabels::YesNo });
    let options = vec![
        ResponseOption::new("yes", "Yes", 2.0),
        ResponseOption::new("no", "No", 0.0),
    ];
    assert_eq!(raw_score(&binary, &true.into(), &options), Some(2.0));
    assert_eq!(raw_score(&binary, &"no".into(), &options), Some(0.0));
}

#[test]
fn numeric_and_visual_analog_are_bounds_checked() {
    let numeric = item(
        1,
        QuestionType::Numeric {
            min: Some(0.0),
            max: Some(10.0),
        },
    );
    assert!(check_value(&numeric, &ResponseValue::from(7.5), &[]).is_ok());
    assert!(check_value(&numeric, &"4".into(), &[]).is_ok());
    assert_eq!(
        code(check_value(&numeric, &ResponseValue::from(11.0), &[])),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(
        code(check_value(&numeric, &"ten".into(), &[])),
        Some(IssueCode::InvalidValueForType)
    );

    let vas = item(
        2,
        QuestionType::VisualAnalog {
            min: Some(0.0),
            max: Some(100.0),
        },
    );
    assert_eq!(
        code(check_value(&vas, &ResponseValue::from(-1.0), &[])),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(raw_score(&vas, &ResponseValue::from(42.0), &[]), Some(42.0));
}

#[test]
fn text_length_is_limited_in_characters() {
    let text = item(1, QuestionType::Text { max_length: Some(5) });
    assert!(check_value(&text, &"héllo".into(), &[]).is_ok());
    assert_eq!(
        code(check_value(&text, &"hello!".into(), &[])),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(
        code(check_value(&text, &ResponseValue::from(3.0), &[])),
        Some(IssueCode::InvalidValueForType)
    );
    assert_eq!(raw_score(&text, &"fine".into(), &[]), None);
}

#[test]
fn checklist_selections_are_checked() {
    let checklist = item(
        1,
        QuestionType::Checklist {
            min_selections: Some(1),
            max_selections: Some(2),
        },
    );
    let options = symptom_options();
    let pick = |keys: &[&str]| {
        ResponseValue::Selections(keys.iter().map(|k| OptionValue::from(*k)).collect())
    };

    assert!(check_value(&checklist, &pick(&["headache", "nausea"]), &options).is_ok());
    assert_eq!(raw_score(&checklist, &pick(&["headache", "nausea"]), &options), Some(3.0));
    assert_eq!(
        code(check_value(&checklist, &pick(&["headache", "nausea", "fatigue"]), &options)),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(
        code(check_value(&checklist, &pick(&["dizziness"]), &options)),
        Some(IssueCode::InvalidValueForType)
    );
    assert_eq!(
        code(check_value(&checklist, &pick(&["nausea", "Nausea"]), &options)),
        Some(IssueCode::InvalidValueForType)
    );
    // An empty selection list is an answer, held to the selection bounds.
    assert_eq!(
        code(validate_response(&checklist, Some(&pick(&[])), &options)),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(
        code(validate_response(&checklist, None, &options)),
        Some(IssueCode::MissingRequiredField)
    );
}

fn checklist_scale(min: usize, required: bool) -> ScaleDefinition {
    let mut scale = likert_scale(1, 3);
    scale.items[0] = Item {
        required: Some(required),
        response_options: Some(symptom_options()),
        ..item(
            1,
            QuestionType::Checklist {
                min_selections: Some(min),
                max_selections: Some(3),
            },
        )
    };
    scale
}

fn selections(keys: &[&str]) -> ResponseValue {
    ResponseValue::Selections(keys.iter().map(|k| OptionValue::from(*k)).collect())
}

#[test]
fn empty_checklist_respects_minimum_selections() {
    let optional = checklist_scale(2, false);
    let report = validate_responses(
        &optional,
        &[CapturedResponse::answered(1, selections(&[]))],
    );
    assert_eq!(report.codes(), vec![IssueCode::ValueOutOfRange]);
    assert!(validate_responses(&optional, &[]).is_valid);

    let none_apply = checklist_scale(0, true);
    let report = validate_responses(
        &none_apply,
        &[CapturedResponse::answered(1, selections(&[]))],
    );
    assert!(report.is_valid, "{report}");
}

#[test]
fn declared_checklist_score_must_match_selections() {
    let scale = checklist_scale(0, true);
    let honest = CapturedResponse::answered(1, selections(&["headache", "nausea"])).with_score(3.0);
    assert!(validate_responses(&scale, &[honest]).is_valid);

    let forged = CapturedResponse::answered(1, selections(&["fatigue"])).with_score(99.0);
    let report = validate_responses(&scale, &[forged]);
    assert_eq!(report.codes(), vec![IssueCode::ScoreMismatch]);
    assert_eq!(report.errors[0].item_number, Some(1));
}

#[test]
fn ranking_needs_distinct_ranks_within_limit() {
    let ranking = item(1, QuestionType::Ranking { max_rank: None });
    let options = symptom_options();
    let ranks = |pairs: &[(&str, u32)]| {
        ResponseValue::Ranking(
            pairs
                .iter()
                .map(|(k, r)| (k.to_string(), *r))
                .collect::<BTreeMap<_, _>>(),
        )
    };

    assert!(check_value(&ranking, &ranks(&[("headache", 1), ("nausea", 2)]), &options).is_ok());
    assert_eq!(
        code(check_value(&ranking, &ranks(&[("headache", 1), ("nausea", 1)]), &options)),
        Some(IssueCode::InvalidValueForType)
    );
    assert_eq!(
        code(check_value(&ranking, &ranks(&[("headache", 4)]), &options)),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(
        code(check_value(&ranking, &ranks(&[("headache", 0)]), &options)),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(raw_score(&ranking, &ranks(&[("headache", 1)]), &options), None);
}

#[test]
fn semantic_differential_takes_whole_positions() {
    let sd = item(
        1,
        QuestionType::SemanticDifferential {
            left_concept: Some("Cold".to_string()),
            right_concept: Some("Warm".to_string()),
            scale_points: Some(7),
        },
    );
    assert!(check_value(&sd, &ResponseValue::from(7.0), &[]).is_ok());
    assert_eq!(
        code(check_value(&sd, &ResponseValue::from(8.0), &[])),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(
        code(check_value(&sd, &ResponseValue::from(0.0), &[])),
        Some(IssueCode::ValueOutOfRange)
    );
    assert_eq!(
        code(check_value(&sd, &ResponseValue::from(3.5), &[])),
        Some(IssueCode::InvalidValueForType)
    );
}

#[test]
fn dichotomous_rejects_misconfigured_option_sets() {
    let dichotomous = item(1, QuestionType::Dichotomous);
    let options = numbered_options(2);
    assert_eq!(
        code(check_value(&dichotomous, &ResponseValue::from(1.0), &options)),
        Some(IssueCode::InvalidValueForType)
    );
    assert!(check_value(&dichotomous, &ResponseValue::from(1.0), &numbered_options(1)).is_ok());
}

#[test]
fn unsupported_type_never_accepts_a_value() {
    let unsupported = item(1, QuestionType::Unsupported);
    assert_eq!(
        code(check_value(&unsupported, &ResponseValue::from(1.0), &[])),
        Some(IssueCode::InvalidValueForType)
    );
}

#[test]
fn dichotomous_answer_outside_pair_is_invalid_for_type() {
    let mut scale = three_item_scale();
    scale.items[0].question_type = QuestionType::Dichotomous;
    scale.items[0].response_options = Some(vec![
        ResponseOption::new("yes", "Yes", 1.0),
        ResponseOption::new("no", "No", 0.0),
    ]);
    let mut responses = vec![CapturedResponse::answered(1, "maybe")];
    responses.extend(answers(&[0.0, 1.0, 1.0]).into_iter().skip(1));

    let report = validate_responses(&scale, &responses);
    assert_eq!(report.codes(), vec![IssueCode::InvalidValueForType]);
    assert_eq!(report.errors[0].item_number, Some(1));

    responses[0] = CapturedResponse::answered(1, "YES");
    assert!(validate_responses(&scale, &responses).is_valid);
}
