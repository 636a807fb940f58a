//! Structured validation reports.
//!
//! Validators never stop at the first problem: every violation is collected
//! into a report so the caller can show all of them at once.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What kind of violation a [`ValidationIssue`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IssueCode {
    // Definition structure
    MissingRequiredField,
    ItemCountMismatch,
    DuplicateItemNumber,
    NonContiguousNumbering,
    EmptyItemText,
    MissingResponseOptions,
    DuplicateOptionValue,
    EmptyOptionLabel,
    MissingOptionScore,
    InvalidScoreRange,
    MissingInterpretationRules,
    InvalidRuleRange,
    InterpretationGap,
    InterpretationOverlap,
    InterpretationCoverage,
    // References
    UndeclaredSubscale,
    EmptySubscale,
    DuplicateSubscale,
    UnknownConditionItem,
    // Question types
    UnsupportedQuestionType,
    MissingTypeMetadata,
    InvalidTypeMetadata,
    InvalidOptionCount,
    RequiredFlagUnset,
    // Responses
    InvalidValueForType,
    ValueOutOfRange,
    UnknownItem,
    DuplicateItemResponse,
    ScoreMismatch,
    ConditionalRequirementUnmet,
}

/// One blocking violation, optionally tied to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub item_number: Option<u32>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            item_number: None,
            message: message.into(),
        }
    }

    pub fn for_item(code: IssueCode, item_number: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            item_number: Some(item_number),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_number {
            Some(n) => write!(f, "item {n}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Advisory findings that never block administration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WarningCode {
    ItemTextTooShort,
    ItemTextTooLong,
    OptionCountOutOfBounds,
    MissingDescription,
    MissingInstructions,
    MissingRuleDescription,
    MalformedCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QualityWarning {
    pub code: WarningCode,
    pub item_number: Option<u32>,
    pub message: String,
}

impl QualityWarning {
    pub fn new(code: WarningCode, item_number: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            code,
            item_number,
            message: message.into(),
        }
    }
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_number {
            Some(n) => write!(f, "item {n}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QualityReport {
    pub has_warnings: bool,
    pub warnings: Vec<QualityWarning>,
}

impl QualityReport {
    pub fn from_warnings(warnings: Vec<QualityWarning>) -> Self {
        Self {
            has_warnings: !warnings.is_empty(),
            warnings,
        }
    }
}

/// The outcome of a structural or response validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    #[serde(default)]
    pub warnings: Vec<QualityWarning>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.is_valid = self.errors.is_empty();
    }

    pub fn with_warnings(mut self, quality: QualityReport) -> Self {
        self.warnings.extend(quality.warnings);
        self
    }

    pub fn has_code(&self, code: IssueCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    pub fn codes(&self) -> Vec<IssueCode> {
        self.errors.iter().map(|e| e.code).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return f.write_str("valid");
        }
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{} error(s): {}", self.errors.len(), messages.join("; "))
    }
}
