//! One function per subcommand. Each returns the text to print so the
//! binary stays a thin shell around them.

use std::path::Path;

use serde::Serialize;

use psyscale_core::models::response::CapturedResponse;
use psyscale_core::models::result::ScoringResult;
use psyscale_core::models::scale::ScaleDefinition;
use psyscale_scales::error::ScaleError;
use psyscale_scales::report::ValidationReport;
use psyscale_scales::session::AssessmentSession;
use psyscale_scales::summary::to_structured_summary;
use psyscale_scales::validate_scale;

use crate::state::Catalogs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ScaleSummary<'a> {
    id: &'a str,
    source: &'a str,
}

#[derive(Serialize)]
struct ScoreOutput<'a> {
    session_id: String,
    result: &'a ScoringResult,
}

pub fn list(catalogs: &Catalogs, format: OutputFormat) -> eyre::Result<String> {
    let ids = catalogs.scale_ids()?;
    match format {
        OutputFormat::Json => {
            let summaries: Vec<ScaleSummary<'_>> = ids
                .iter()
                .map(|(id, source)| ScaleSummary { id, source })
                .collect();
            Ok(serde_json::to_string_pretty(&summaries)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            for (id, source) in &ids {
                match catalogs.scale(id) {
                    Ok(scale) => output.push_str(&format!(
                        "{id:<12} {:<10} {} [{source}]\n",
                        scale.abbreviation, scale.name
                    )),
                    Err(e) => {
                        tracing::warn!(scale_id = %id, error = %e, "scale failed to load");
                        let line = format!("{id:<12} {:<10} (failed to load) [{source}]\n", "?");
                        output.push_str(&line);
                    }
                }
            }
            Ok(output)
        }
    }
}

pub fn show(catalogs: &Catalogs, id: &str, format: OutputFormat) -> eyre::Result<String> {
    let scale = catalogs.scale(id)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(scale.as_ref())?),
        OutputFormat::Text => Ok(describe(&scale)),
    }
}

/// Validate a scale by id, or a definition file. Returns the rendered
/// report and whether the definition is structurally valid.
pub fn validate(
    catalogs: &Catalogs,
    id: Option<&str>,
    file: Option<&Path>,
    format: OutputFormat,
) -> eyre::Result<(String, bool)> {
    let scale = match (id, file) {
        (_, Some(path)) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
            ScaleDefinition::from_json(&contents)?
        }
        (Some(id), None) => catalogs.scale(id)?.as_ref().clone(),
        (None, None) => return Err(eyre::eyre!("give a scale id or --file")),
    };

    let report = validate_scale(&scale);
    tracing::info!(
        scale_id = %scale.id,
        valid = report.is_valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "scale validated"
    );
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => render_report(&scale.id, &report),
    };
    Ok((rendered, report.is_valid))
}

/// Administer a scale non-interactively from a JSON array of responses.
pub fn score(
    catalogs: &Catalogs,
    id: &str,
    responses_path: &Path,
    format: OutputFormat,
) -> eyre::Result<String> {
    let scale = catalogs.scale(id)?;
    let contents = std::fs::read_to_string(responses_path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", responses_path.display()))?;
    let responses: Vec<CapturedResponse> = serde_json::from_str(&contents)?;

    let mut session = AssessmentSession::start(scale.clone())?;
    for response in responses {
        session.record_response(response)?;
    }
    if let Err(e) = session.submit(&catalogs.strategies) {
        return Err(match &e {
            ScaleError::ResponseValidation(report) => {
                eyre::eyre!("responses rejected\n{}", render_report(id, report))
            }
            _ => e.into(),
        });
    }
    let result = session.finalize()?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ScoreOutput {
            session_id: session.id().to_string(),
            result: &result,
        })?),
        OutputFormat::Text => Ok(to_structured_summary(&scale, &result)),
    }
}

fn describe(scale: &ScaleDefinition) -> String {
    let mut output = format!("{} ({})\n", scale.name, scale.abbreviation);
    if let Some(description) = &scale.description {
        output.push_str(&format!("{description}\n"));
    }
    output.push_str(&format!(
        "\nScoring: {:?}, range {}-{}\n",
        scale.scoring_method, scale.score_range.min, scale.score_range.max
    ));
    if let Some(instructions) = &scale.instructions {
        output.push_str(&format!("\n{instructions}\n"));
    }

    output.push_str("\nItems:\n");
    for item in &scale.items {
        let mut flags = vec![item.question_type.name()];
        if item.reverse_scored {
            flags.push("reversed");
        }
        if item.has_alert() {
            flags.push("alert");
        }
        output.push_str(&format!("{:>3}. {} [{}]\n", item.number, item.text, flags.join(", ")));
    }

    output.push_str("\nInterpretation:\n");
    for rule in &scale.interpretation_rules {
        output.push_str(&format!(
            "  {}-{}: {} ({})\n",
            rule.min_score, rule.max_score, rule.label, rule.severity
        ));
    }
    output
}

fn render_report(scale_id: &str, report: &ValidationReport) -> String {
    let mut output = if report.is_valid {
        format!("{scale_id}: valid\n")
    } else {
        format!("{scale_id}: {} error(s)\n", report.errors.len())
    };
    for issue in &report.errors {
        output.push_str(&format!("  error   {issue}\n"));
    }
    for warning in &report.warnings {
        output.push_str(&format!("  warning {warning}\n"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use psyscale_catalog::DirectoryCatalog;
    use psyscale_scales::get_scale;

    fn builtin() -> Catalogs {
        Catalogs::new(None).expect("builtin catalogs")
    }

    #[test]
    fn list_marks_builtin_scales() {
        let output = list(&builtin(), OutputFormat::Text).expect("lists");
        assert_eq!(output.lines().count(), 3);
        assert!(output.contains("phq9"));
        assert!(output.contains("[builtin]"));

        let json = list(&builtin(), OutputFormat::Json).expect("lists");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(parsed[0]["id"], "gad7");
        assert_eq!(parsed[0]["source"], "builtin");
    }

    #[test]
    fn broken_catalog_file_does_not_block_other_commands() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("draft.json"), "{ not json").expect("write");
        let directory = DirectoryCatalog::open(dir.path()).expect("opens");
        let catalogs = Catalogs::new(Some(directory)).expect("catalogs");

        let output = list(&catalogs, OutputFormat::Text).expect("lists");
        assert_eq!(output.lines().count(), 4);
        assert!(output.contains("(failed to load) [catalog]"));
        assert!(show(&catalogs, "phq9", OutputFormat::Text).is_ok());
        assert!(show(&catalogs, "draft", OutputFormat::Text).is_err());
    }

    #[test]
    fn show_unknown_scale_fails() {
        assert!(show(&builtin(), "bdi2", OutputFormat::Text).is_err());
        let text = show(&builtin(), "rses", OutputFormat::Text).expect("shows");
        assert!(text.contains("reversed"));
    }

    #[test]
    fn validate_file_reports_structural_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        let mut scale = get_scale("gad7").expect("builtin").clone();
        scale.total_items = 8;
        std::fs::write(&path, serde_json::to_string(&scale).expect("json")).expect("write");

        let (text, ok) =
            validate(&builtin(), None, Some(&path), OutputFormat::Text).expect("validates");
        assert!(!ok);
        assert!(text.starts_with("gad7: 1 error(s)"));

        let (_, ok) =
            validate(&builtin(), Some("gad7"), None, OutputFormat::Json).expect("validates");
        assert!(ok);
        assert!(validate(&builtin(), None, None, OutputFormat::Text).is_err());
    }

    #[test]
    fn score_reads_responses_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("responses.json");
        let responses: Vec<CapturedResponse> =
            (1..=9).map(|n| CapturedResponse::answered(n, 1.0)).collect();
        std::fs::write(&path, serde_json::to_string(&responses).expect("json")).expect("write");

        let text = score(&builtin(), "phq9", &path, OutputFormat::Text).expect("scores");
        assert!(text.contains("- Total score: 9 (range 0-27)\n"));

        let json = score(&builtin(), "phq9", &path, OutputFormat::Json).expect("scores");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(parsed["result"]["raw_score"], 9.0);
        assert!(parsed["session_id"].is_string());
    }

    #[test]
    fn score_rejects_invalid_answers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("responses.json");
        std::fs::write(&path, r#"[{ "item_number": 1, "value": "maybe" }]"#).expect("write");

        let err = score(&builtin(), "gad7", &path, OutputFormat::Text).expect_err("rejected");
        assert!(err.to_string().starts_with("responses rejected"));
    }
}
