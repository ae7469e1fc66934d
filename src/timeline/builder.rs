//! The timeline builder: a pure, synchronous transform from resolved record
//! snapshots to ordered, bucketed blocks.
//!
//! Offsets are day counts converted at a flat 86,400,000 ms per day. No
//! calendar arithmetic, no timezone or DST correction. Unparseable instants
//! degrade to undefined bounds (windows) or drop the event (events); the
//! builder is total and never returns an error.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use super::types::{ActionWindow, EventKind, TimelineBlock, TimelineEvent};
use crate::models::{Encounter, Observation, PlanAction, PlanDefinition, Quantity, ResearchSubject};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Parse a record-server instant. Accepts full RFC 3339 datetimes and
/// date-only strings (read as midnight UTC).
pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Apply the relationship sign to an offset bound. `"before"` flips the
/// offset negative; any other relationship keeps it positive.
fn signed_offset_days(relationship: &str, bound: Option<&Quantity>) -> Option<f64> {
    let modifier = if relationship == "before" { -1.0 } else { 1.0 };
    bound.map(|q| modifier * q.value)
}

/// `anchor + offset_days`, or `None` when either side is unusable.
fn offset_instant(anchor: Option<DateTime<Utc>>, offset_days: Option<f64>) -> Option<DateTime<Utc>> {
    let millis = (offset_days? * MILLIS_PER_DAY).round() as i64;
    anchor?.checked_add_signed(TimeDelta::milliseconds(millis))
}

/// Compute an action's window. `None` for actions without a relative-offset
/// descriptor; those cannot be placed on the timeline.
fn action_window(anchor: Option<DateTime<Utc>>, action: &PlanAction) -> Option<ActionWindow> {
    let descriptor = action.offset_descriptor()?;
    let range = descriptor.offset_range.as_ref();

    let low = signed_offset_days(
        &descriptor.relationship,
        range.and_then(|r| r.low.as_ref()),
    );
    let high = signed_offset_days(
        &descriptor.relationship,
        range.and_then(|r| r.high.as_ref()),
    );

    Some(ActionWindow {
        title: action.title.clone(),
        description: action.description.clone(),
        start: offset_instant(anchor, low),
        end: offset_instant(anchor, high),
    })
}

/// Normalize both event variants into one list sorted ascending by
/// effective instant. Encounters come first in the merge, then
/// observations; the sort is stable, so events sharing an instant keep
/// that relative order. Events without a parseable instant are dropped.
pub fn normalize_events(encounters: &[Encounter], observations: &[Observation]) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> = Vec::with_capacity(encounters.len() + observations.len());

    for encounter in encounters {
        let Some(effective) = encounter.period.start.as_deref().and_then(parse_instant) else {
            tracing::warn!(id = %encounter.id, "Encounter has no parseable period start, skipping");
            continue;
        };
        events.push(TimelineEvent {
            id: encounter.id.clone(),
            kind: EventKind::Encounter,
            effective,
        });
    }

    for observation in observations {
        let Some(effective) = observation
            .effective_date_time
            .as_deref()
            .and_then(parse_instant)
        else {
            tracing::warn!(id = %observation.id, "Observation has no parseable effective instant, skipping");
            continue;
        };
        events.push(TimelineEvent {
            id: observation.id.clone(),
            kind: EventKind::Observation,
            effective,
        });
    }

    events.sort_by_key(|e| e.effective);
    events
}

/// Build the per-subject visit timeline: one block per protocol action that
/// carries a relative-offset descriptor, in input action order, each holding
/// the subject's events that fall strictly inside the action's window.
///
/// Total over its input shape: a missing or unparseable anchor date leaves
/// every bound undefined and every bucket empty rather than failing.
pub fn build_timeline(
    subject: &ResearchSubject,
    protocol: &PlanDefinition,
    encounters: &[Encounter],
    observations: &[Observation],
) -> Vec<TimelineBlock> {
    let anchor = subject.anchor_date().and_then(parse_instant);
    if anchor.is_none() {
        tracing::warn!(subject = %subject.id, "No parseable enrollment start, all window bounds undefined");
    }

    let events = normalize_events(encounters, observations);

    protocol
        .action
        .iter()
        .filter_map(|action| action_window(anchor, action))
        .map(|window| {
            let bucketed = events
                .iter()
                .filter(|e| window.contains(e.effective))
                .cloned()
                .collect();
            TimelineBlock {
                window,
                events: bucketed,
            }
        })
        .collect()
}
