//! Plain-text rendering of timeline blocks.

use chrono::{DateTime, Utc};

use super::types::TimelineBlock;

/// Marker label shown when a window has no start bound.
const STUDY_START: &str = "Study Start";
/// Marker label shown when a window has no end bound.
const STUDY_END: &str = "Study End";

fn bound_label(bound: Option<DateTime<Utc>>, placeholder: &str) -> String {
    bound.map_or_else(|| placeholder.to_string(), |b| b.to_rfc3339())
}

/// Render each block as a start marker, its bucketed events in effective
/// order, and an end marker.
pub fn render_blocks(blocks: &[TimelineBlock]) -> String {
    let mut s = String::new();

    for block in blocks {
        let w = &block.window;
        s.push_str(&format!("== {} ==\n", w.title));
        if !w.description.is_empty() {
            s.push_str(&format!("   {}\n", w.description));
        }
        s.push_str(&format!("   [{}]\n", bound_label(w.start, STUDY_START)));
        for event in &block.events {
            s.push_str(&format!(
                "   {} {} @ {}\n",
                event.kind.label(),
                event.id,
                event.effective.to_rfc3339()
            ));
        }
        s.push_str(&format!("   [{}]\n\n", bound_label(w.end, STUDY_END)));
    }

    s
}
