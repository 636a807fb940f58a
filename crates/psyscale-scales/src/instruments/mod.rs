//! Built-in scale definitions.
//!
//! Each module exposes a `definition()` returning a static, validated
//! [`ScaleDefinition`]. Item wording follows the published public-domain
//! versions of each instrument.

pub mod gad7;
pub mod phq9;
pub mod rses;

use psyscale_core::models::item::{Item, QuestionType};
use psyscale_core::models::option::ResponseOption;

/// The 0-3 "over the last 2 weeks" frequency options shared by the PHQ and
/// GAD families.
pub(crate) fn two_week_frequency_options() -> Vec<ResponseOption> {
    vec![
        ResponseOption::new(0.0, "Not at all", 0.0),
        ResponseOption::new(1.0, "Several days", 1.0),
        ResponseOption::new(2.0, "More than half the days", 2.0),
        ResponseOption::new(3.0, "Nearly every day", 3.0),
    ]
}

/// A required Likert item answered from the scale's global options.
pub(crate) fn likert_item(number: u32, text: &str) -> Item {
    Item {
        number,
        text: text.to_string(),
        subscale: None,
        question_type: QuestionType::Likert,
        reverse_scored: false,
        required: Some(true),
        weight: None,
        alert_trigger: false,
        alert_condition: None,
        response_options: None,
    }
}
