use serde::{Deserialize, Serialize};

/// A study protocol: an ordered list of planned actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDefinition {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub action: Vec<PlanAction>,
}

/// One planned protocol step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAction {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Relative-offset descriptors against a reference action. The source
    /// data only ever populates one; when several are present the first
    /// descriptor wins and the rest are ignored.
    #[serde(default)]
    pub related_action: Vec<RelatedAction>,
    #[serde(default)]
    pub definition_uri: Option<String>,
}

impl PlanAction {
    /// The single relative-offset descriptor this action is scheduled by,
    /// if any. Actions without one cannot be placed on the timeline.
    pub fn offset_descriptor(&self) -> Option<&RelatedAction> {
        self.related_action.first()
    }
}

/// How an action relates in time to its reference action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedAction {
    pub action_id: String,
    /// `"before"` flips the offset negative; any other relationship
    /// (e.g. `"after"`) keeps it positive.
    pub relationship: String,
    #[serde(default)]
    pub offset_range: Option<OffsetRange>,
}

/// Day-offset bounds relative to the anchor date. A missing bound means
/// "no bound", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffsetRange {
    #[serde(default)]
    pub low: Option<Quantity>,
    #[serde(default)]
    pub high: Option<Quantity>,
}

/// A measured value with its unit code. Offsets use whole or fractional
/// days (`code: "d"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default)]
    pub code: Option<String>,
}
