//! Record API access: HTTP client, resource cache, and the store that
//! composes them.
//!
//! Everything here is plumbing around the timeline core. The core never
//! touches this module; it receives already-resolved collections.

pub mod cache;
pub mod client;
pub mod store;

pub use cache::ResourceCache;
pub use client::{FhirClient, MockRecordApi, RecordApi};
pub use store::RecordStore;

/// The resource types Trialine fetches. Doubles as the cache key namespace
/// and the bundle classification discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    ResearchStudy,
    ResearchSubject,
    PlanDefinition,
    Encounter,
    Observation,
}

impl ResourceType {
    /// The `resourceType` discriminator string the server uses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResearchStudy => "ResearchStudy",
            Self::ResearchSubject => "ResearchSubject",
            Self::PlanDefinition => "PlanDefinition",
            Self::Encounter => "Encounter",
            Self::Observation => "Observation",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the record API layer.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("Cannot connect to record server at {0}")]
    Connection(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    #[error("Record server returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse server response: {0}")]
    ResponseParsing(String),
    #[error("Expected a {expected} resource but the bundle carried {found}")]
    UnexpectedResourceType { expected: ResourceType, found: String },
}
