use psyscale_core::catalog_keys;
use psyscale_core::models::item::{BinaryLabels, QuestionType};
use psyscale_core::models::option::{OptionValue, ResponseOption, score_extremes};
use psyscale_core::models::response::{CapturedResponse, ResponseValue};
use psyscale_core::models::scale::{ScaleDefinition, ScoringMethod};

const MINIMAL_SCALE: &str = r#"{
    "id": "mini",
    "name": "Mini Scale",
    "abbreviation": "MS",
    "total_items": 2,
    "score_range": { "min": 0, "max": 6 },
    "items": [
        { "number": 1, "text": "Feeling down", "required": true },
        {
            "number": 2,
            "text": "How tense do you feel right now?",
            "required": false,
            "question_type": { "type": "visual_analog", "min": 0, "max": 100 }
        }
    ],
    "response_options": [
        { "value": 0, "label": "Not at all", "score": 0 },
        { "value": 1, "label": "Several days", "score": 1 },
        { "value": 2, "label": "More than half the days", "score": 2 },
        { "value": 3, "label": "Nearly every day", "score": 3 }
    ],
    "interpretation_rules": [
        { "min_score": 0, "max_score": 6, "severity": "none", "label": "None" }
    ]
}"#;

#[test]
fn scale_definition_loads_with_defaults() {
    let scale = ScaleDefinition::from_json(MINIMAL_SCALE).unwrap();
    assert_eq!(scale.scoring_method, ScoringMethod::Sum);
    assert_eq!(scale.items[0].question_type, QuestionType::Likert);
    assert_eq!(
        scale.items[1].question_type,
        QuestionType::VisualAnalog {
            min: Some(0.0),
            max: Some(100.0)
        }
    );
    assert!(scale.subscales.is_empty());
    assert!(scale.conditional_rules.is_empty());
    assert_eq!(scale.score_range.step(), 1.0);
}

#[test]
fn unknown_question_type_loads_as_unsupported() {
    let json = MINIMAL_SCALE.replace("visual_analog", "hologram");
    let scale = ScaleDefinition::from_json(&json).unwrap();
    assert_eq!(scale.items[1].question_type, QuestionType::Unsupported);
}

#[test]
fn binary_labels_default_to_yes_no() {
    let qt: QuestionType = serde_json::from_str(r#"{ "type": "binary" }"#).unwrap();
    assert_eq!(
        qt,
        QuestionType::Binary {
            labels: BinaryLabels::YesNo
        }
    );
}

#[test]
fn option_value_keys_normalize_numbers() {
    assert_eq!(OptionValue::Number(2.0).key(), "2");
    assert_eq!(OptionValue::Number(2.5).key(), "2.5");
    assert_eq!(OptionValue::Text(" yes ".to_string()).key(), "yes");
    let option = ResponseOption::new("Yes", "Yes", 1.0);
    assert!(option.matches_key("yes"));
}

#[test]
fn score_extremes_skip_unscored_options() {
    let mut options = vec![
        ResponseOption::new(0.0, "Never", 0.0),
        ResponseOption::new(4.0, "Always", 4.0),
    ];
    options.push(ResponseOption {
        value: OptionValue::Number(9.0),
        label: "Prefer not to say".to_string(),
        score: None,
    });
    assert_eq!(score_extremes(&options), Some((0.0, 4.0)));
    assert_eq!(score_extremes(&[]), None);
}

#[test]
fn response_values_deserialize_by_shape() {
    let v: ResponseValue = serde_json::from_str("true").unwrap();
    assert_eq!(v, ResponseValue::Bool(true));
    let v: ResponseValue = serde_json::from_str("3").unwrap();
    assert_eq!(v, ResponseValue::Number(3.0));
    let v: ResponseValue = serde_json::from_str(r#""often""#).unwrap();
    assert_eq!(v, ResponseValue::Text("often".to_string()));
    let v: ResponseValue = serde_json::from_str(r#"["a", 2]"#).unwrap();
    assert_eq!(
        v,
        ResponseValue::Selections(vec![OptionValue::from("a"), OptionValue::from(2.0)])
    );
    let v: ResponseValue = serde_json::from_str(r#"{ "sleep": 1, "diet": 2 }"#).unwrap();
    assert!(matches!(v, ResponseValue::Ranking(ref m) if m.len() == 2));
}

#[test]
fn skipped_and_blank_responses_have_no_effective_value() {
    assert!(CapturedResponse::skipped(1, None).effective_value().is_none());
    assert!(CapturedResponse::answered(1, "  ").effective_value().is_none());
    assert!(CapturedResponse::answered(1, 0.0).effective_value().is_some());
    assert!(
        CapturedResponse::answered(1, ResponseValue::Selections(vec![]))
            .effective_value()
            .is_some()
    );
}

#[test]
fn catalog_keys_reject_path_like_ids() {
    assert_eq!(catalog_keys::scale_definition("phq9").unwrap(), "phq9.json");
    assert_eq!(catalog_keys::lookup_table("bdi-ii").unwrap(), "bdi-ii.lookup.json");
    assert!(catalog_keys::scale_definition("../etc/passwd").is_err());
    assert!(catalog_keys::scale_definition("").is_err());
}

#[test]
fn catalog_file_names_map_back_to_ids() {
    assert_eq!(catalog_keys::scale_id_from_file_name("gad7.json"), Some("gad7"));
    assert_eq!(catalog_keys::scale_id_from_file_name("gad7.lookup.json"), None);
    assert_eq!(catalog_keys::scale_id_from_file_name("notes.txt"), None);
}
