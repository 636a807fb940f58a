use std::fs;
use std::path::Path;

use psyscale_catalog::{CatalogError, DirectoryCatalog};
use psyscale_core::models::response::CapturedResponse;
use psyscale_scales::strategy::StrategyResolver;
use psyscale_scales::{ScaleCatalog, get_scale, score_with};

const MOOD_SCALE: &str = r#"{
    "id": "mood3",
    "name": "Three Item Mood Check",
    "abbreviation": "MC3",
    "total_items": 3,
    "scoring_method": "sum",
    "score_range": { "min": 0, "max": 9 },
    "items": [
        { "number": 1, "text": "Felt low or flat today", "required": true },
        { "number": 2, "text": "Found it hard to get started", "required": true },
        { "number": 3, "text": "Felt on edge or irritable", "required": true }
    ],
    "response_options": [
        { "value": 0, "label": "Not at all", "score": 0 },
        { "value": 1, "label": "A little", "score": 1 },
        { "value": 2, "label": "Quite a bit", "score": 2 },
        { "value": 3, "label": "Extremely", "score": 3 }
    ],
    "interpretation_rules": [
        { "min_score": 0, "max_score": 3, "severity": "minimal", "label": "Minimal" },
        { "min_score": 4, "max_score": 6, "severity": "mild", "label": "Mild" },
        { "min_score": 7, "max_score": 9, "severity": "moderate", "label": "Moderate" }
    ]
}"#;

fn write(root: &Path, name: &str, contents: &str) {
    fs::write(root.join(name), contents).expect("write fixture");
}

fn lookup_variant() -> String {
    MOOD_SCALE
        .replace("\"mood3\"", "\"mood3t\"")
        .replace("\"sum\"", "\"lookup_table\"")
        .replace("\"max\": 9 }", "\"max\": 60 }")
        .replace(
            r#"{ "min_score": 0, "max_score": 3, "severity": "minimal", "label": "Minimal" },
        { "min_score": 4, "max_score": 6, "severity": "mild", "label": "Mild" },
        { "min_score": 7, "max_score": 9, "severity": "moderate", "label": "Moderate" }"#,
            r#"{ "min_score": 0, "max_score": 49, "severity": "typical", "label": "Typical" },
        { "min_score": 50, "max_score": 60, "severity": "elevated", "label": "Elevated" }"#,
        )
}

const LOOKUP_TABLE: &str = r#"{
    "entries": [
        { "raw_min": 0, "raw_max": 4, "value": 45 },
        { "raw_min": 5, "raw_max": 9, "value": 55 }
    ]
}"#;

#[test]
fn missing_root_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = DirectoryCatalog::open(dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, CatalogError::MissingRoot(_)));
}

#[test]
fn lists_definitions_and_skips_other_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "mood3.json", MOOD_SCALE);
    write(dir.path(), "mood3t.json", &lookup_variant());
    write(dir.path(), "mood3t.lookup.json", LOOKUP_TABLE);
    write(dir.path(), "notes.txt", "not a scale");
    write(dir.path(), "bad id.json", "{}");
    fs::create_dir(dir.path().join("archive.json")).expect("mkdir");

    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");
    assert_eq!(catalog.scale_ids().expect("lists"), vec!["mood3", "mood3t"]);
}

#[test]
fn loads_a_definition_with_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "mood3.json", MOOD_SCALE);
    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");

    let scale = catalog.scale("mood3").expect("loads");
    assert_eq!(scale.items.len(), 3);
    assert!(psyscale_scales::validate_scale(&scale).is_valid);
}

#[test]
fn unknown_and_malformed_ids_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");

    assert!(matches!(
        catalog.scale("mood3"),
        Err(CatalogError::NotFound { key }) if key == "mood3.json"
    ));
    assert!(matches!(catalog.scale("../etc/passwd"), Err(CatalogError::Key(_))));
}

#[test]
fn definition_must_match_its_file_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "other.json", MOOD_SCALE);
    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");

    assert!(matches!(
        catalog.scale("other"),
        Err(CatalogError::IdMismatch { declared, .. }) if declared == "mood3"
    ));
}

#[test]
fn broken_json_is_a_serialization_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "mood3.json", "{ \"id\": ");
    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");
    assert!(matches!(catalog.scale("mood3"), Err(CatalogError::Serialization(_))));
}

#[test]
fn registry_holds_lookup_strategies_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "mood3.json", MOOD_SCALE);
    write(dir.path(), "mood3t.json", &lookup_variant());
    write(dir.path(), "mood3t.lookup.json", LOOKUP_TABLE);
    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");

    let registry = catalog.strategy_registry().expect("builds");
    assert_eq!(registry.len(), 1);
    assert!(registry.strategy_for("mood3t").is_some());
    assert!(registry.strategy_for("mood3").is_none());

    let scale = catalog.scale("mood3t").expect("loads");
    let responses: Vec<CapturedResponse> =
        (1..=3).map(|n| CapturedResponse::answered(n, 2.0)).collect();
    let result = score_with(&scale, &responses, &registry).expect("scores");
    assert_eq!(result.raw_score, 55.0);
    assert_eq!(result.interpretation.severity, "elevated");
}

#[test]
fn unloadable_files_do_not_block_the_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "draft.json", "{ not json");
    write(dir.path(), "other.json", MOOD_SCALE);
    write(dir.path(), "mood3t.json", &lookup_variant());
    write(dir.path(), "mood3t.lookup.json", LOOKUP_TABLE);
    write(dir.path(), "broken.json", &lookup_variant().replace("\"mood3t\"", "\"broken\""));
    write(dir.path(), "broken.lookup.json", "[1, 2");
    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");

    let registry = catalog.strategy_registry().expect("builds");
    assert_eq!(registry.len(), 1);
    assert!(registry.strategy_for("mood3t").is_some());
    assert!(registry.strategy_for("broken").is_none());

    // The bad files still fail when asked for directly.
    assert!(matches!(catalog.scale("draft"), Err(CatalogError::Serialization(_))));
    assert!(matches!(catalog.scale("other"), Err(CatalogError::IdMismatch { .. })));
}

#[test]
fn lookup_scale_without_table_is_left_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "mood3t.json", &lookup_variant());
    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");

    assert!(catalog.lookup_table("mood3t").expect("reads").is_none());
    assert!(catalog.strategy_registry().expect("builds").is_empty());
}

#[test]
fn builtin_definitions_round_trip_through_a_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let phq9 = get_scale("phq9").expect("builtin");
    write(
        dir.path(),
        "phq9.json",
        &serde_json::to_string_pretty(phq9).expect("serializes"),
    );
    let catalog = DirectoryCatalog::open(dir.path()).expect("opens");
    let loaded = catalog.scale("phq9").expect("loads");
    assert_eq!(loaded.items.len(), 9);
    assert_eq!(loaded.interpretation_rules, phq9.interpretation_rules);
}
