//! Markdown summary of a scored administration, for clinician reports.

use psyscale_core::models::result::{ScoringAnomaly, ScoringResult};
use psyscale_core::models::scale::ScaleDefinition;

/// Format a result as structured text for inclusion in a report.
pub fn to_structured_summary(scale: &ScaleDefinition, result: &ScoringResult) -> String {
    let mut output = format!("## {} ({})\n\n", scale.name, scale.abbreviation);
    output.push_str(&format!(
        "- Total score: {} (range {}-{})\n",
        result.raw_score, scale.score_range.min, scale.score_range.max
    ));
    output.push_str(&format!(
        "- Interpretation: {} ({})\n",
        result.interpretation.label, result.interpretation.severity
    ));
    output.push_str(&format!(
        "- Completion: {:.0}% ({} answered, {} skipped)\n",
        result.completion_percentage, result.answered_items, result.skipped_items
    ));

    if !result.subscale_scores.is_empty() {
        output.push_str("\n### Subscales\n");
        for subscale in &scale.subscales {
            let Some(score) = result.subscale_scores.get(&subscale.code) else {
                continue;
            };
            match result.subscale_interpretations.get(&subscale.code) {
                Some(i) => {
                    output.push_str(&format!("- {}: {score} ({})\n", subscale.name, i.label))
                }
                None => output.push_str(&format!("- {}: {score}\n", subscale.name)),
            }
        }
    }

    if result.has_alerts() {
        output.push_str("\n### Alerts\n");
        for alert in &result.triggered_alerts {
            output.push_str(&format!(
                "- Item {}: {} (answer {}, condition {})\n",
                alert.item_number,
                alert.item_text,
                alert.value.as_deref().unwrap_or("-"),
                alert.condition
            ));
        }
    }

    if !result.anomalies.is_empty() {
        output.push_str("\n### Scoring notes\n");
        for anomaly in &result.anomalies {
            let line = match anomaly {
                ScoringAnomaly::ScoreOutOfTheoreticalRange { score, min, max } => {
                    format!("score {score} is outside the theoretical range {min}-{max}")
                }
                ScoringAnomaly::SubscaleOutOfRange {
                    subscale,
                    score,
                    min,
                    max,
                } => format!("subscale {subscale} score {score} is outside {min}-{max}"),
                ScoringAnomaly::ScoreInconsistent { expected, actual } => {
                    format!("score {actual} differs from recomputed {expected}")
                }
            };
            output.push_str(&format!("- {line}\n"));
        }
    }

    output
}
