use serde::{Deserialize, Serialize};

use super::{Identifier, Reference};

/// A research study as served by the record API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchStudy {
    pub id: String,
    #[serde(default)]
    pub identifier: Vec<Identifier>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub protocol: Vec<Reference>,
}

impl ResearchStudy {
    /// The study's governing protocol reference. Studies carry an ordered
    /// list of protocol references; the first one drives the timeline.
    pub fn protocol_reference(&self) -> Option<&str> {
        self.protocol.first().map(|r| r.reference.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_reference_takes_first_entry() {
        let study: ResearchStudy = serde_json::from_value(serde_json::json!({
            "id": "study-1",
            "title": "SoA Study",
            "protocol": [
                {"reference": "PlanDefinition/proto-a"},
                {"reference": "PlanDefinition/proto-b"}
            ]
        }))
        .unwrap();
        assert_eq!(study.protocol_reference(), Some("PlanDefinition/proto-a"));
    }

    #[test]
    fn study_without_protocol_has_no_reference() {
        let study: ResearchStudy =
            serde_json::from_value(serde_json::json!({"id": "study-1"})).unwrap();
        assert_eq!(study.protocol_reference(), None);
    }
}
