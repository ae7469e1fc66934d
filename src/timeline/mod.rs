//! Per-subject visit timeline aligned to a study protocol.
//!
//! Maps a subject's actual clinical events (encounters + observations) onto
//! the protocol's planned, relatively-offset action windows: one block per
//! qualifying action, holding the events that fall strictly inside its
//! window, sorted by effective instant. A pure recomputation over resolved
//! snapshots: no I/O, no state carried between invocations.

mod builder;
mod render;
mod types;

pub use builder::{build_timeline, normalize_events};
pub use render::render_blocks;
pub use types::{ActionWindow, EventKind, TimelineBlock, TimelineEvent};

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Encounter, Observation, PlanDefinition, ResearchSubject};
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn subject(anchor: Option<&str>) -> ResearchSubject {
        let mut value = json!({
            "id": "sub-1",
            "status": "on-study",
            "study": {"reference": "ResearchStudy/study-1"},
            "individual": {"reference": "Patient/7"}
        });
        if let Some(start) = anchor {
            value["period"] = json!({"start": start, "end": "2020-06-01T00:00:00Z"});
        }
        serde_json::from_value(value).unwrap()
    }

    /// An action scheduled `low..high` days from the anchor.
    fn action(title: &str, relationship: &str, low: Option<f64>, high: Option<f64>) -> serde_json::Value {
        let mut range = json!({});
        if let Some(v) = low {
            range["low"] = json!({"value": v, "code": "d"});
        }
        if let Some(v) = high {
            range["high"] = json!({"value": v, "code": "d"});
        }
        json!({
            "title": title,
            "description": "",
            "relatedAction": [{
                "actionId": "enrollment",
                "relationship": relationship,
                "offsetRange": range
            }]
        })
    }

    fn protocol(actions: Vec<serde_json::Value>) -> PlanDefinition {
        serde_json::from_value(json!({
            "id": "proto-a",
            "status": "active",
            "action": actions
        }))
        .unwrap()
    }

    fn encounter(id: &str, start: &str) -> Encounter {
        serde_json::from_value(json!({
            "id": id,
            "status": "finished",
            "period": {"start": start, "end": start}
        }))
        .unwrap()
    }

    fn observation(id: &str, effective: &str) -> Observation {
        serde_json::from_value(json!({
            "id": id,
            "status": "final",
            "code": {"coding": [{"code": "29463-7"}]},
            "effectiveDateTime": effective
        }))
        .unwrap()
    }

    // ── Window computation ─────────────────────────────────────────────

    #[test]
    fn signed_offsets_from_anchor() {
        // low -1 day, high +2 days around a 2020-01-01 anchor
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![action("Screening", "after", Some(-1.0), Some(2.0))]),
            &[],
            &[],
        );

        assert_eq!(blocks.len(), 1);
        let w = &blocks[0].window;
        assert_eq!(w.start, Some(instant("2019-12-31T00:00:00Z")));
        assert_eq!(w.end, Some(instant("2020-01-03T00:00:00Z")));
    }

    #[test]
    fn before_relationship_flips_offsets_negative() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![action("Washout", "before", Some(1.0), Some(3.0))]),
            &[],
            &[],
        );

        let w = &blocks[0].window;
        assert_eq!(w.start, Some(instant("2019-12-31T00:00:00Z")));
        assert_eq!(w.end, Some(instant("2019-12-29T00:00:00Z")));
    }

    #[test]
    fn fractional_day_offsets_use_flat_milliseconds() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![action("Half day", "after", Some(0.5), Some(1.5))]),
            &[],
            &[],
        );

        let w = &blocks[0].window;
        assert_eq!(w.start, Some(instant("2020-01-01T12:00:00Z")));
        assert_eq!(w.end, Some(instant("2020-01-02T12:00:00Z")));
    }

    #[test]
    fn action_without_descriptor_is_absent_from_output() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![
                action("Scheduled", "after", Some(0.0), Some(1.0)),
                json!({"title": "Unscheduled", "description": ""}),
            ]),
            &[],
            &[],
        );

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].window.title, "Scheduled");
    }

    #[test]
    fn blocks_keep_input_action_order_not_time_order() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![
                action("Late", "after", Some(10.0), Some(12.0)),
                action("Early", "after", Some(1.0), Some(2.0)),
            ]),
            &[],
            &[],
        );

        let titles: Vec<&str> = blocks.iter().map(|b| b.window.title.as_str()).collect();
        assert_eq!(titles, ["Late", "Early"]);
    }

    #[test]
    fn missing_low_or_high_is_no_bound_not_zero() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![action("Open ended", "after", Some(1.0), None)]),
            &[],
            &[],
        );

        let w = &blocks[0].window;
        assert!(w.start.is_some());
        assert!(w.end.is_none());
    }

    #[test]
    fn missing_anchor_leaves_every_bound_undefined() {
        let blocks = build_timeline(
            &subject(None),
            &protocol(vec![action("Screening", "after", Some(-1.0), Some(2.0))]),
            &[encounter("enc-1", "2020-01-02T00:00:00Z")],
            &[],
        );

        let w = &blocks[0].window;
        assert!(w.start.is_none());
        assert!(w.end.is_none());
        assert!(blocks[0].events.is_empty());
    }

    #[test]
    fn malformed_anchor_degrades_like_missing() {
        let blocks = build_timeline(
            &subject(Some("not-a-date")),
            &protocol(vec![action("Screening", "after", Some(-1.0), Some(2.0))]),
            &[],
            &[],
        );

        assert!(blocks[0].window.start.is_none());
        assert!(blocks[0].window.end.is_none());
    }

    // ── Bucketing ──────────────────────────────────────────────────────

    #[test]
    fn event_inside_window_is_bucketed_boundary_excluded() {
        // Anchor 2020-01-01, window [-1d, +2d] = [2019-12-31, 2020-01-03]
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![action("Screening", "after", Some(-1.0), Some(2.0))]),
            &[
                encounter("inside", "2020-01-02T00:00:00Z"),
                encounter("at-end", "2020-01-03T00:00:00Z"),
                encounter("at-start", "2019-12-31T00:00:00Z"),
            ],
            &[],
        );

        let ids: Vec<&str> = blocks[0].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["inside"]);
    }

    #[test]
    fn window_missing_a_bound_buckets_nothing() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![action("Open ended", "after", Some(1.0), None)]),
            &[encounter("enc-1", "2020-01-05T00:00:00Z")],
            &[],
        );

        assert!(blocks[0].events.is_empty(), "One-sided windows bucket nothing");
    }

    #[test]
    fn overlapping_windows_share_events() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![
                action("Week one", "after", Some(0.0), Some(7.0)),
                action("First days", "after", Some(0.0), Some(3.0)),
            ]),
            &[encounter("enc-1", "2020-01-02T00:00:00Z")],
            &[],
        );

        assert_eq!(blocks[0].events.len(), 1);
        assert_eq!(blocks[1].events.len(), 1, "No global exclusivity across windows");
    }

    #[test]
    fn bucketed_events_are_sorted_by_effective_instant() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![action("Week one", "after", Some(0.0), Some(7.0))]),
            &[encounter("enc-late", "2020-01-05T00:00:00Z")],
            &[
                observation("obs-mid", "2020-01-03T00:00:00Z"),
                observation("obs-early", "2020-01-02T00:00:00Z"),
            ],
        );

        let ids: Vec<&str> = blocks[0].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["obs-early", "obs-mid", "enc-late"]);
    }

    // ── Normalization & merge ──────────────────────────────────────────

    #[test]
    fn encounters_are_normalized_to_period_start() {
        let events = normalize_events(&[encounter("enc-1", "2020-01-02T08:00:00Z")], &[]);
        assert_eq!(events[0].kind, EventKind::Encounter);
        assert_eq!(events[0].effective, instant("2020-01-02T08:00:00Z"));
    }

    #[test]
    fn equal_instants_preserve_input_order() {
        let events = normalize_events(
            &[],
            &[
                observation("obs-1", "2020-01-02T00:00:00Z"),
                observation("obs-2", "2020-01-02T00:00:00Z"),
            ],
        );

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["obs-1", "obs-2"], "Sort must be stable");
    }

    #[test]
    fn equal_instants_keep_encounters_before_observations() {
        // Encounters enter the merge first, so a tie keeps them first.
        let events = normalize_events(
            &[encounter("enc-1", "2020-01-02T00:00:00Z")],
            &[observation("obs-1", "2020-01-02T00:00:00Z")],
        );

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["enc-1", "obs-1"]);
    }

    #[test]
    fn unparseable_event_instants_are_dropped() {
        let events = normalize_events(
            &[
                encounter("enc-bad", "yesterday-ish"),
                encounter("enc-ok", "2020-01-02T00:00:00Z"),
            ],
            &[serde_json::from_value(json!({"id": "obs-dateless", "status": "final"})).unwrap()],
        );

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["enc-ok"]);
    }

    #[test]
    fn date_only_strings_parse_as_midnight_utc() {
        let events = normalize_events(&[encounter("enc-1", "2020-01-02")], &[]);
        assert_eq!(events[0].effective, instant("2020-01-02T00:00:00Z"));
    }

    // ── Whole-builder properties ───────────────────────────────────────

    #[test]
    fn empty_inputs_produce_empty_output() {
        let blocks = build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![]),
            &[],
            &[],
        );
        assert!(blocks.is_empty());
    }

    #[test]
    fn builder_is_idempotent() {
        let sub = subject(Some("2020-01-01T00:00:00Z"));
        let proto = protocol(vec![
            action("Screening", "after", Some(-1.0), Some(2.0)),
            action("Week one", "after", Some(0.0), Some(7.0)),
        ]);
        let encounters = [encounter("enc-1", "2020-01-02T00:00:00Z")];
        let observations = [observation("obs-1", "2020-01-03T00:00:00Z")];

        let first = build_timeline(&sub, &proto, &encounters, &observations);
        let second = build_timeline(&sub, &proto, &encounters, &observations);
        assert_eq!(first, second);
    }

    #[test]
    fn builder_does_not_mutate_inputs() {
        let encounters = [encounter("enc-1", "2020-01-02T08:00:00Z")];
        let before = encounters.clone();

        build_timeline(
            &subject(Some("2020-01-01T00:00:00Z")),
            &protocol(vec![action("Screening", "after", Some(0.0), Some(7.0))]),
            &encounters,
            &[],
        );

        assert_eq!(encounters, before);
    }

    #[test]
    fn first_descriptor_wins_when_several_exist() {
        let proto: PlanDefinition = serde_json::from_value(json!({
            "id": "proto-a",
            "status": "active",
            "action": [{
                "title": "Screening",
                "description": "",
                "relatedAction": [
                    {"actionId": "enrollment", "relationship": "after",
                     "offsetRange": {"low": {"value": 1.0, "code": "d"},
                                      "high": {"value": 2.0, "code": "d"}}},
                    {"actionId": "enrollment", "relationship": "before",
                     "offsetRange": {"low": {"value": 9.0, "code": "d"}}}
                ]
            }]
        }))
        .unwrap();

        let blocks = build_timeline(&subject(Some("2020-01-01T00:00:00Z")), &proto, &[], &[]);
        assert_eq!(blocks[0].window.start, Some(instant("2020-01-02T00:00:00Z")));
        assert_eq!(blocks[0].window.end, Some(instant("2020-01-03T00:00:00Z")));
    }
}
