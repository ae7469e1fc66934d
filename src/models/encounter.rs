use serde::{Deserialize, Serialize};

use super::{Period, Reference};

/// A clinical visit. Its timeline position is the period's start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub based_on: Option<Reference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encounter_tolerates_missing_period() {
        let enc: Encounter = serde_json::from_value(serde_json::json!({
            "id": "enc-1",
            "status": "finished"
        }))
        .unwrap();
        assert!(enc.period.start.is_none());
    }
}
