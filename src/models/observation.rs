use serde::{Deserialize, Serialize};

use super::CodeableConcept;

/// A recorded measurement or finding with a native effective instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub category: CodeableConcept,
    #[serde(default)]
    pub code: CodeableConcept,
    #[serde(default)]
    pub effective_date_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_deserializes_classification() {
        let obs: Observation = serde_json::from_value(serde_json::json!({
            "id": "obs-1",
            "status": "final",
            "code": {"coding": [{"system": "http://loinc.org", "code": "29463-7", "display": "Body weight"}]},
            "effectiveDateTime": "2020-01-02T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(obs.code.coding[0].code.as_deref(), Some("29463-7"));
        assert_eq!(obs.effective_date_time.as_deref(), Some("2020-01-02T09:30:00Z"));
    }

    #[test]
    fn observation_without_effective_instant() {
        let obs: Observation =
            serde_json::from_value(serde_json::json!({"id": "obs-1"})).unwrap();
        assert!(obs.effective_date_time.is_none());
        assert!(obs.code.coding.is_empty());
    }
}
