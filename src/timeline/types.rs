use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which kind of clinical record an event came from.
///
/// Display logic branches on this tag; classification is never inferred
/// from field presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Encounter,
    Observation,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Encounter => "Encounter",
            Self::Observation => "Observation",
        }
    }
}

/// A clinical event normalized for ordering and bucketing.
///
/// Encounters are normalized so `effective` equals their period's start;
/// observations keep their native effective instant. Normalization always
/// produces new values; fetched records are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub kind: EventKind,
    pub effective: DateTime<Utc>,
}

/// The instant range a protocol action is expected to occur within.
///
/// Derived per action from the anchor date and the action's signed day
/// offsets, computed fresh each build and never stored. A side without
/// offset information (or with an unparseable anchor) is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionWindow {
    pub title: String,
    pub description: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ActionWindow {
    /// An event belongs to this window only when both bounds are defined
    /// and the instant falls strictly between them. Boundary-equal events
    /// are excluded on both sides.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < instant && instant < end,
            _ => false,
        }
    }
}

/// One rendered block: a planned action's window plus the events
/// chronologically bucketed into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBlock {
    pub window: ActionWindow,
    pub events: Vec<TimelineEvent>,
}
