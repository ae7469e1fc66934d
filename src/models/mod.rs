//! Read-only snapshots of the FHIR resources Trialine consumes.
//!
//! One file per resource, mirroring the record server's JSON shapes. All
//! snapshots are fetched per render cycle and never mutated locally; there
//! is no write path back to the server.

mod encounter;
mod observation;
mod plan_definition;
mod research_study;
mod research_subject;

pub use encounter::Encounter;
pub use observation::Observation;
pub use plan_definition::{OffsetRange, PlanAction, PlanDefinition, Quantity, RelatedAction};
pub use research_study::ResearchStudy;
pub use research_subject::ResearchSubject;

use serde::{Deserialize, Serialize};

/// A reference to another resource, e.g. `"Patient/123"` or
/// `"PlanDefinition/protocol-a"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

impl Reference {
    /// The id portion of a `"Type/id"` reference, or the whole string when
    /// there is no type prefix.
    pub fn id_part(&self) -> &str {
        self.reference
            .split_once('/')
            .map_or(self.reference.as_str(), |(_, id)| id)
    }
}

/// A time period. Either bound may be absent in source data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// A business identifier for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

/// A coded value within a terminology system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
}

/// A concept expressed as one or more codings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default)]
    pub coding: Vec<Coding>,
}
