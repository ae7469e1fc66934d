use serde::{Deserialize, Serialize};

use super::{Period, Reference};

/// A subject enrolled in a research study.
///
/// The enrollment period's start is the subject's anchor date, the origin
/// for every relative offset in the study protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSubject {
    pub id: String,
    #[serde(default)]
    pub status: String,
    pub study: Reference,
    pub individual: Reference,
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub assigned_arm: Option<String>,
    #[serde(default)]
    pub actual_arm: Option<String>,
}

impl ResearchSubject {
    /// The raw anchor date string (enrollment period start), if recorded.
    pub fn anchor_date(&self) -> Option<&str> {
        self.period.as_ref()?.start.as_deref()
    }

    /// The reference to the patient this subject enrolls, e.g. `"Patient/7"`.
    pub fn patient_reference(&self) -> &str {
        &self.individual.reference
    }
}
