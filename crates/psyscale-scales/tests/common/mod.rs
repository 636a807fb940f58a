#![allow(dead_code)]

use psyscale_core::models::interpretation::InterpretationRule;
use psyscale_core::models::item::{Item, QuestionType};
use psyscale_core::models::option::ResponseOption;
use psyscale_core::models::response::CapturedResponse;
use psyscale_core::models::scale::{ScaleDefinition, ScoreRange, ScoringMethod};

/// Options scored 0..=max, with value equal to score.
pub fn numbered_options(max: u32) -> Vec<ResponseOption> {
    (0..=max)
        .map(|n| ResponseOption::new(f64::from(n), format!("Option {n}"), f64::from(n)))
        .collect()
}

pub fn item(number: u32, question_type: QuestionType) -> Item {
    Item {
        number,
        text: format!("Statement number {number} for the respondent"),
        subscale: None,
        question_type,
        reverse_scored: false,
        required: Some(true),
        weight: None,
        alert_trigger: false,
        alert_condition: None,
        response_options: None,
    }
}

pub fn likert_item(number: u32) -> Item {
    item(number, QuestionType::Likert)
}

pub fn rule(min: f64, max: f64, severity: &str) -> InterpretationRule {
    InterpretationRule::new(min, max, severity, severity)
}

/// A sum-scored Likert scale with `n` items and options 0..=`max_option`,
/// covered by a single rule.
pub fn likert_scale(n: u32, max_option: u32) -> ScaleDefinition {
    let max_total = f64::from(n * max_option);
    ScaleDefinition {
        id: "fixture".to_string(),
        name: "Fixture Scale".to_string(),
        abbreviation: "FS".to_string(),
        version: None,
        description: Some("Test fixture".to_string()),
        instructions: Some("Answer every item".to_string()),
        citation: None,
        total_items: n as usize,
        scoring_method: ScoringMethod::Sum,
        score_range: ScoreRange::new(0.0, max_total),
        items: (1..=n).map(likert_item).collect(),
        response_options: numbered_options(max_option),
        interpretation_rules: vec![rule(0.0, max_total, "any")],
        subscales: vec![],
        conditional_rules: vec![],
    }
}

/// 3 Likert items scored 0-3; 0-3 minimal, 4-6 mild, 7-9 moderate.
pub fn three_item_scale() -> ScaleDefinition {
    ScaleDefinition {
        interpretation_rules: vec![
            rule(0.0, 3.0, "minimal"),
            rule(4.0, 6.0, "mild"),
            rule(7.0, 9.0, "moderate"),
        ],
        ..likert_scale(3, 3)
    }
}

/// One answer per item, in order, starting at item 1.
pub fn answers(values: &[f64]) -> Vec<CapturedResponse> {
    values
        .iter()
        .zip(1..)
        .map(|(v, n)| CapturedResponse::answered(n, *v))
        .collect()
}
