use std::sync::LazyLock;

use psyscale_core::models::interpretation::InterpretationRule;
use psyscale_core::models::scale::{ScaleDefinition, ScoreRange, ScoringMethod};

use super::{likert_item, two_week_frequency_options};

/// GAD-7: Generalized Anxiety Disorder scale.
/// 7 items, each rated 0–3. Total 0–21.
pub fn definition() -> &'static ScaleDefinition {
    static SCALE: LazyLock<ScaleDefinition> = LazyLock::new(|| {
        let texts = [
            "Feeling nervous, anxious, or on edge",
            "Not being able to stop or control worrying",
            "Worrying too much about different things",
            "Trouble relaxing",
            "Being so restless that it is hard to sit still",
            "Becoming easily annoyed or irritable",
            "Feeling afraid, as if something awful might happen",
        ];

        let items: Vec<_> = texts
            .iter()
            .zip(1..)
            .map(|(text, n)| likert_item(n, text))
            .collect();

        ScaleDefinition {
            id: "gad7".to_string(),
            name: "Generalized Anxiety Disorder-7".to_string(),
            abbreviation: "GAD-7".to_string(),
            version: Some("1.0".to_string()),
            description: Some(
                "Screens for and measures the severity of generalized anxiety.".to_string(),
            ),
            instructions: Some(
                "Over the last 2 weeks, how often have you been bothered by the following problems?"
                    .to_string(),
            ),
            citation: Some(
                "Spitzer RL, Kroenke K, Williams JB, Löwe B. A brief measure for assessing generalized anxiety disorder. Arch Intern Med. 2006;166(10):1092-1097."
                    .to_string(),
            ),
            total_items: items.len(),
            scoring_method: ScoringMethod::Sum,
            score_range: ScoreRange::new(0.0, 21.0),
            items,
            response_options: two_week_frequency_options(),
            interpretation_rules: vec![
                InterpretationRule {
                    description: Some("Minimal anxiety.".to_string()),
                    ..InterpretationRule::new(0.0, 4.0, "minimal", "Minimal anxiety")
                },
                InterpretationRule {
                    description: Some("Mild anxiety; monitor.".to_string()),
                    ..InterpretationRule::new(5.0, 9.0, "mild", "Mild anxiety")
                },
                InterpretationRule {
                    description: Some(
                        "Moderate anxiety; further evaluation recommended.".to_string(),
                    ),
                    ..InterpretationRule::new(10.0, 14.0, "moderate", "Moderate anxiety")
                },
                InterpretationRule {
                    description: Some("Severe anxiety; active treatment warranted.".to_string()),
                    ..InterpretationRule::new(15.0, 21.0, "severe", "Severe anxiety")
                },
            ],
            subscales: vec![],
            conditional_rules: vec![],
        }
    });
    &SCALE
}
