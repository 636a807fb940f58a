use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What a scale-level conditional rule does to its target item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConditionalAction {
    /// The target must be answered when the condition holds.
    RequireItem,
    /// The target is only presented when the condition holds.
    ShowItem,
}

/// A scale-level rule such as `item_1 >= 3 => require_item 4`.
///
/// `condition` is kept as written; the engine compiles it once per scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionalRule {
    pub condition: String,
    pub action: ConditionalAction,
    pub target_item: u32,
}
