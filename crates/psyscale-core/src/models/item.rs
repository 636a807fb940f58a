use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::option::ResponseOption;

/// Which pair of fixed answers a binary item offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BinaryLabels {
    #[default]
    YesNo,
    TrueFalse,
}

impl BinaryLabels {
    /// The (affirmative, negative) answer texts.
    pub fn pair(self) -> (&'static str, &'static str) {
        match self {
            BinaryLabels::YesNo => ("yes", "no"),
            BinaryLabels::TrueFalse => ("true", "false"),
        }
    }
}

/// The response grammar of an item, with the metadata each variant needs.
///
/// Metadata fields are optional in the data shape so that a missing value is
/// reported by definition validation rather than failing to load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionType {
    /// One of N scored options.
    #[default]
    Likert,
    /// One of exactly two options.
    Dichotomous,
    /// Yes/no or true/false.
    Binary {
        #[serde(default)]
        labels: BinaryLabels,
    },
    VisualAnalog {
        min: Option<f64>,
        max: Option<f64>,
    },
    Numeric {
        min: Option<f64>,
        max: Option<f64>,
    },
    MultipleChoice,
    Text {
        max_length: Option<usize>,
    },
    Checklist {
        min_selections: Option<usize>,
        max_selections: Option<usize>,
    },
    Ranking {
        max_rank: Option<u32>,
    },
    SemanticDifferential {
        left_concept: Option<String>,
        right_concept: Option<String>,
        scale_points: Option<u32>,
    },
    /// Any type tag this build does not know. Never valid for administration.
    #[serde(other)]
    Unsupported,
}

impl QuestionType {
    pub fn name(&self) -> &'static str {
        match self {
            QuestionType::Likert => "likert",
            QuestionType::Dichotomous => "dichotomous",
            QuestionType::Binary { .. } => "binary",
            QuestionType::VisualAnalog { .. } => "visual_analog",
            QuestionType::Numeric { .. } => "numeric",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Text { .. } => "text",
            QuestionType::Checklist { .. } => "checklist",
            QuestionType::Ranking { .. } => "ranking",
            QuestionType::SemanticDifferential { .. } => "semantic_differential",
            QuestionType::Unsupported => "unsupported",
        }
    }

    /// Types whose answer is a single pick from the item's option set.
    pub fn is_single_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::Likert | QuestionType::Dichotomous | QuestionType::MultipleChoice
        )
    }

    /// Types that need a response option set at all.
    pub fn uses_options(&self) -> bool {
        self.is_single_choice()
            || matches!(
                self,
                QuestionType::Checklist { .. } | QuestionType::Ranking { .. }
            )
    }

    /// Types that contribute to the raw score.
    pub fn is_scored(&self) -> bool {
        !matches!(
            self,
            QuestionType::Text { .. } | QuestionType::Ranking { .. } | QuestionType::Unsupported
        )
    }
}

/// One question or statement within a scale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub number: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscale: Option<String>,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub reverse_scored: bool,
    /// Unset is a configuration error; every item must declare it.
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub alert_trigger: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_options: Option<Vec<ResponseOption>>,
}

impl Item {
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(Self::DEFAULT_WEIGHT)
    }

    pub fn has_alert(&self) -> bool {
        self.alert_trigger || self.alert_condition.is_some()
    }
}
