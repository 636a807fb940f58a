use std::sync::LazyLock;

use psyscale_core::models::interpretation::InterpretationRule;
use psyscale_core::models::option::ResponseOption;
use psyscale_core::models::scale::{ScaleDefinition, ScoreRange, ScoringMethod};

use super::likert_item;

/// RSES: Rosenberg Self-Esteem Scale.
/// 10 items rated 0–3; items 2, 5, 6, 8 and 9 are reverse scored. Total 0–30.
pub fn definition() -> &'static ScaleDefinition {
    static SCALE: LazyLock<ScaleDefinition> = LazyLock::new(|| {
        let texts = [
            "On the whole, I am satisfied with myself.",
            "At times I think I am no good at all.",
            "I feel that I have a number of good qualities.",
            "I am able to do things as well as most other people.",
            "I feel I do not have much to be proud of.",
            "I certainly feel useless at times.",
            "I feel that I'm a person of worth, at least on an equal plane with others.",
            "I wish I could have more respect for myself.",
            "All in all, I am inclined to feel that I am a failure.",
            "I take a positive attitude toward myself.",
        ];
        const REVERSED: [u32; 5] = [2, 5, 6, 8, 9];

        let items: Vec<_> = texts
            .iter()
            .zip(1..)
            .map(|(text, n)| {
                let mut item = likert_item(n, text);
                item.reverse_scored = REVERSED.contains(&n);
                item
            })
            .collect();

        ScaleDefinition {
            id: "rses".to_string(),
            name: "Rosenberg Self-Esteem Scale".to_string(),
            abbreviation: "RSES".to_string(),
            version: Some("1965".to_string()),
            description: Some("Measures global self-worth.".to_string()),
            instructions: Some(
                "Below is a list of statements dealing with your general feelings about yourself. Indicate how strongly you agree or disagree with each statement."
                    .to_string(),
            ),
            citation: Some(
                "Rosenberg M. Society and the Adolescent Self-Image. Princeton University Press; 1965."
                    .to_string(),
            ),
            total_items: items.len(),
            scoring_method: ScoringMethod::Sum,
            score_range: ScoreRange::new(0.0, 30.0),
            items,
            response_options: vec![
                ResponseOption::new("strongly_disagree", "Strongly disagree", 0.0),
                ResponseOption::new("disagree", "Disagree", 1.0),
                ResponseOption::new("agree", "Agree", 2.0),
                ResponseOption::new("strongly_agree", "Strongly agree", 3.0),
            ],
            interpretation_rules: vec![
                InterpretationRule {
                    description: Some("Scores below 15 suggest low self-esteem.".to_string()),
                    ..InterpretationRule::new(0.0, 14.0, "low", "Low self-esteem")
                },
                InterpretationRule {
                    description: Some(
                        "Scores between 15 and 25 are within the normal range.".to_string(),
                    ),
                    ..InterpretationRule::new(15.0, 25.0, "normal", "Normal self-esteem")
                },
                InterpretationRule {
                    description: Some("Scores above 25 suggest high self-esteem.".to_string()),
                    ..InterpretationRule::new(26.0, 30.0, "high", "High self-esteem")
                },
            ],
            subscales: vec![],
            conditional_rules: vec![],
        }
    });
    &SCALE
}
