use std::sync::LazyLock;

use psyscale_core::models::interpretation::InterpretationRule;
use psyscale_core::models::scale::{ScaleDefinition, ScoreRange, ScoringMethod};

use super::{likert_item, two_week_frequency_options};

/// PHQ-9: Patient Health Questionnaire, depression module.
/// 9 items, each rated 0–3. Total 0–27. Item 9 (self-harm) raises an alert
/// on any non-zero answer.
pub fn definition() -> &'static ScaleDefinition {
    static SCALE: LazyLock<ScaleDefinition> = LazyLock::new(|| {
        let texts = [
            "Little interest or pleasure in doing things",
            "Feeling down, depressed, or hopeless",
            "Trouble falling or staying asleep, or sleeping too much",
            "Feeling tired or having little energy",
            "Poor appetite or overeating",
            "Feeling bad about yourself, or that you are a failure or have let yourself or your family down",
            "Trouble concentrating on things, such as reading the newspaper or watching television",
            "Moving or speaking so slowly that other people could have noticed, or the opposite, being so fidgety or restless that you have been moving around a lot more than usual",
            "Thoughts that you would be better off dead, or of hurting yourself in some way",
        ];

        let mut items: Vec<_> = texts
            .iter()
            .zip(1..)
            .map(|(text, n)| likert_item(n, text))
            .collect();
        if let Some(item9) = items.last_mut() {
            item9.alert_trigger = true;
            item9.alert_condition = Some(">= 1".to_string());
        }

        let rule = |min: f64, max: f64, severity: &str, label: &str, description: &str| {
            InterpretationRule {
                description: Some(description.to_string()),
                ..InterpretationRule::new(min, max, severity, label)
            }
        };

        ScaleDefinition {
            id: "phq9".to_string(),
            name: "Patient Health Questionnaire-9".to_string(),
            abbreviation: "PHQ-9".to_string(),
            version: Some("1.0".to_string()),
            description: Some("Screens for and measures the severity of depression.".to_string()),
            instructions: Some(
                "Over the last 2 weeks, how often have you been bothered by any of the following problems?"
                    .to_string(),
            ),
            citation: Some(
                "Kroenke K, Spitzer RL, Williams JB. The PHQ-9. J Gen Intern Med. 2001;16(9):606-613."
                    .to_string(),
            ),
            total_items: items.len(),
            scoring_method: ScoringMethod::Sum,
            score_range: ScoreRange::new(0.0, 27.0),
            items,
            response_options: two_week_frequency_options(),
            interpretation_rules: vec![
                rule(
                    0.0,
                    4.0,
                    "minimal",
                    "Minimal depression",
                    "Monitor; may not require treatment.",
                ),
                rule(
                    5.0,
                    9.0,
                    "mild",
                    "Mild depression",
                    "Watchful waiting; repeat PHQ-9 at follow-up.",
                ),
                rule(
                    10.0,
                    14.0,
                    "moderate",
                    "Moderate depression",
                    "Consider counseling, follow-up and/or pharmacotherapy.",
                ),
                rule(
                    15.0,
                    19.0,
                    "moderately_severe",
                    "Moderately severe depression",
                    "Active treatment with pharmacotherapy and/or psychotherapy.",
                ),
                rule(
                    20.0,
                    27.0,
                    "severe",
                    "Severe depression",
                    "Immediate initiation of pharmacotherapy and expedited referral.",
                ),
            ],
            subscales: vec![],
            conditional_rules: vec![],
        }
    });
    &SCALE
}
