//! Alert conditions and scale-level conditional rules.
//!
//! Expressions are parsed once per scale into typed comparisons. A
//! malformed expression is kept as [`Condition::Malformed`] and always
//! evaluates to false; evaluation never fails.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use psyscale_core::models::condition::ConditionalAction;
use psyscale_core::models::item::Item;
use psyscale_core::models::response::CapturedResponse;
use psyscale_core::models::result::TriggeredAlert;
use psyscale_core::models::scale::ScaleDefinition;

use crate::question_type;
use crate::report::{IssueCode, ValidationIssue};

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Ge,
    Le,
    Eq,
    Gt,
    Lt,
    Ne,
}

impl ComparisonOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Ne => "!=",
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Ge => lhs >= rhs - EPSILON,
            ComparisonOp::Le => lhs <= rhs + EPSILON,
            ComparisonOp::Eq => (lhs - rhs).abs() < EPSILON,
            ComparisonOp::Gt => lhs > rhs + EPSILON,
            ComparisonOp::Lt => lhs < rhs - EPSILON,
            ComparisonOp::Ne => (lhs - rhs).abs() >= EPSILON,
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">=" | "≥" => Ok(ComparisonOp::Ge),
            "<=" | "≤" => Ok(ComparisonOp::Le),
            "=" | "==" => Ok(ComparisonOp::Eq),
            ">" => Ok(ComparisonOp::Gt),
            "<" => Ok(ComparisonOp::Lt),
            "!=" | "≠" => Ok(ComparisonOp::Ne),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    fn parse(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(n) if n.is_finite() => Literal::Number(n),
            _ => Literal::Text(token.trim_matches(|c| c == '"' || c == '\'').to_string()),
        }
    }
}

/// An operator and a literal, applied to one item's response.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: ComparisonOp,
    pub literal: Literal,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Literal::Number(n) => write!(f, "{} {n}", self.op.as_str()),
            Literal::Text(s) => write!(f, "{} {s}", self.op.as_str()),
        }
    }
}

impl Comparison {
    /// Evaluate against an item's captured response. Missing, skipped, or
    /// incomparable answers evaluate to false.
    pub fn evaluate(
        &self,
        scale: &ScaleDefinition,
        item: &Item,
        response: Option<&CapturedResponse>,
    ) -> bool {
        let Some(response) = response else {
            return false;
        };
        let Some(value) = response.effective_value() else {
            return false;
        };
        match &self.literal {
            Literal::Number(rhs) => {
                let options = scale.options_for(item);
                let lhs = value
                    .as_number()
                    .or_else(|| question_type::raw_score(item, value, options))
                    .or(response.score);
                lhs.is_some_and(|lhs| self.op.apply(lhs, *rhs))
            }
            Literal::Text(rhs) => {
                let Some(key) = value.key() else {
                    return false;
                };
                let equal = key.eq_ignore_ascii_case(rhs);
                match self.op {
                    ComparisonOp::Eq => equal,
                    ComparisonOp::Ne => !equal,
                    _ => false,
                }
            }
        }
    }
}

/// A parsed `<item-ref> <operator> <value>` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare { item: u32, comparison: Comparison },
    Malformed { source: String },
}

impl Condition {
    /// Parse a scale-level expression. It must be exactly three
    /// whitespace-separated tokens.
    pub fn parse(source: &str) -> Self {
        let malformed = || Condition::Malformed {
            source: source.to_string(),
        };
        let tokens: Vec<&str> = source.split_whitespace().collect();
        let [reference, op, literal] = tokens.as_slice() else {
            return malformed();
        };
        let (Some(item), Ok(op)) = (parse_item_ref(reference), op.parse::<ComparisonOp>()) else {
            return malformed();
        };
        Condition::Compare {
            item,
            comparison: Comparison {
                op,
                literal: Literal::parse(literal),
            },
        }
    }

    pub fn evaluate(&self, scale: &ScaleDefinition, responses: &ResponseIndex<'_>) -> bool {
        match self {
            Condition::Compare { item, comparison } => scale
                .item(*item)
                .is_some_and(|i| comparison.evaluate(scale, i, responses.get(*item))),
            Condition::Malformed { .. } => false,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Condition::Malformed { .. })
    }
}

/// An item's alert expression.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertCondition {
    Compare(Comparison),
    /// `alert_trigger` set without an expression.
    AnyNonZero,
    Malformed { source: String },
}

impl AlertCondition {
    /// Accepts `">= 2"`, `">=2"`, `"value >= 2"` and `"item_9 >= 1"`
    /// (where the reference must name the item itself).
    pub fn parse(source: &str, item_number: u32) -> Self {
        let malformed = || AlertCondition::Malformed {
            source: source.to_string(),
        };
        let tokens: Vec<&str> = source.split_whitespace().collect();
        let (op, literal) = match tokens.as_slice() {
            [compact] => match split_compact(compact) {
                Some(parts) => parts,
                None => return malformed(),
            },
            [op, literal] => (*op, *literal),
            [reference, op, literal] => {
                let own = matches!(
                    reference.to_ascii_lowercase().as_str(),
                    "value" | "response" | "score"
                ) || parse_item_ref(reference) == Some(item_number);
                if !own {
                    return malformed();
                }
                (*op, *literal)
            }
            _ => return malformed(),
        };
        match op.parse::<ComparisonOp>() {
            Ok(op) => AlertCondition::Compare(Comparison {
                op,
                literal: Literal::parse(literal),
            }),
            Err(()) => malformed(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, AlertCondition::Malformed { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub condition: Condition,
    pub action: ConditionalAction,
    pub target_item: u32,
}

/// Responses keyed by item number. Later duplicates win, matching
/// resubmission semantics.
#[derive(Debug, Default)]
pub struct ResponseIndex<'a> {
    by_item: BTreeMap<u32, &'a CapturedResponse>,
}

impl<'a> ResponseIndex<'a> {
    pub fn new(responses: impl IntoIterator<Item = &'a CapturedResponse>) -> Self {
        Self {
            by_item: responses.into_iter().map(|r| (r.item_number, r)).collect(),
        }
    }

    pub fn get(&self, item: u32) -> Option<&'a CapturedResponse> {
        self.by_item.get(&item).copied()
    }

    /// True when the item has a non-skipped, non-blank answer.
    pub fn is_answered(&self, item: u32) -> bool {
        self.get(item).is_some_and(|r| r.effective_value().is_some())
    }
}

/// The conditional logic of one scale, parsed once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledConditions {
    pub rules: Vec<CompiledRule>,
    pub alerts: BTreeMap<u32, AlertCondition>,
}

impl CompiledConditions {
    pub fn compile(scale: &ScaleDefinition) -> Self {
        let rules = scale
            .conditional_rules
            .iter()
            .map(|r| CompiledRule {
                condition: Condition::parse(&r.condition),
                action: r.action,
                target_item: r.target_item,
            })
            .collect();

        let alerts = scale
            .items
            .iter()
            .filter(|i| i.has_alert())
            .map(|i| {
                let alert = match &i.alert_condition {
                    Some(source) => AlertCondition::parse(source, i.number),
                    None => AlertCondition::AnyNonZero,
                };
                (i.number, alert)
            })
            .collect();

        Self { rules, alerts }
    }

    /// Expressions that failed to parse, as written.
    pub fn malformed(&self) -> Vec<(Option<u32>, &str)> {
        let rules = self.rules.iter().filter_map(|r| match &r.condition {
            Condition::Malformed { source } => Some((None, source.as_str())),
            Condition::Compare { .. } => None,
        });
        let alerts = self.alerts.iter().filter_map(|(n, a)| match a {
            AlertCondition::Malformed { source } => Some((Some(*n), source.as_str())),
            _ => None,
        });
        rules.chain(alerts).collect()
    }

    /// Items whose alert condition holds. Annotation only.
    pub fn triggered_alerts(
        &self,
        scale: &ScaleDefinition,
        responses: &ResponseIndex<'_>,
    ) -> Vec<TriggeredAlert> {
        let mut triggered = Vec::new();
        for (number, alert) in &self.alerts {
            let Some(item) = scale.item(*number) else {
                continue;
            };
            let response = responses.get(*number);
            let (fired, condition) = match alert {
                AlertCondition::Compare(cmp) => {
                    (cmp.evaluate(scale, item, response), cmp.to_string())
                }
                AlertCondition::AnyNonZero => {
                    let score = response
                        .and_then(|r| r.effective_value())
                        .and_then(|v| question_type::raw_score(item, v, scale.options_for(item)));
                    (
                        score.is_some_and(|s| s.abs() > EPSILON),
                        "any non-zero score".to_string(),
                    )
                }
                AlertCondition::Malformed { .. } => (false, String::new()),
            };
            if fired {
                triggered.push(TriggeredAlert {
                    item_number: item.number,
                    item_text: item.text.clone(),
                    condition,
                    value: response
                        .and_then(|r| r.effective_value())
                        .and_then(|v| v.key()),
                });
            }
        }
        triggered
    }

    /// Targets of `show_item` rules none of which currently hold.
    pub fn hidden_items(
        &self,
        scale: &ScaleDefinition,
        responses: &ResponseIndex<'_>,
    ) -> BTreeSet<u32> {
        let mut gated: BTreeMap<u32, bool> = BTreeMap::new();
        for rule in self
            .rules
            .iter()
            .filter(|r| r.action == ConditionalAction::ShowItem)
        {
            let shown = rule.condition.evaluate(scale, responses);
            *gated.entry(rule.target_item).or_insert(false) |= shown;
        }
        gated
            .into_iter()
            .filter_map(|(item, shown)| (!shown).then_some(item))
            .collect()
    }

    /// `require_item` rules that hold while their target is unanswered.
    pub fn unmet_requirements(
        &self,
        scale: &ScaleDefinition,
        responses: &ResponseIndex<'_>,
    ) -> Vec<ValidationIssue> {
        self.rules
            .iter()
            .filter(|r| r.action == ConditionalAction::RequireItem)
            .filter(|r| r.condition.evaluate(scale, responses))
            .filter(|r| !responses.is_answered(r.target_item))
            .map(|r| {
                let reason = match &r.condition {
                    Condition::Compare { item, comparison } => {
                        format!("item {item} {comparison}")
                    }
                    Condition::Malformed { source } => source.clone(),
                };
                ValidationIssue::for_item(
                    IssueCode::ConditionalRequirementUnmet,
                    r.target_item,
                    format!("a response is required because {reason}"),
                )
            })
            .collect()
    }
}

/// `item_3`, `item3`, `q3`, `Q3` or a bare `3`.
pub fn parse_item_ref(token: &str) -> Option<u32> {
    let lower = token.to_ascii_lowercase();
    let digits = lower
        .strip_prefix("item_")
        .or_else(|| lower.strip_prefix("item"))
        .or_else(|| lower.strip_prefix('q'))
        .unwrap_or(&lower);
    digits.parse().ok().filter(|n| *n > 0)
}

fn split_compact(token: &str) -> Option<(&str, &str)> {
    let split = token
        .char_indices()
        .find(|(_, c)| !matches!(c, '>' | '<' | '=' | '!' | '≥' | '≤' | '≠'))
        .map(|(i, _)| i)?;
    if split == 0 {
        return None;
    }
    Some(token.split_at(split))
}
