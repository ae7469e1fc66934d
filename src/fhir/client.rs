//! HTTP client for the clinical record server.
//!
//! Search endpoints return FHIR bundles (`{"entry": [{"resource": ...}]}`);
//! the client unwraps entries and classifies each one by its `resourceType`
//! discriminator before typed deserialization, so a mixed or mislabeled
//! bundle surfaces as an error instead of a silently mis-tagged event.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{FhirError, ResourceType};
use crate::models::{Encounter, Observation, PlanDefinition, ResearchStudy, ResearchSubject};

/// The record API Trialine consumes, one method per resolved collection.
///
/// `encounters` and `observations` take the subject's patient reference
/// (`"Patient/<id>"`) and return records already filtered to that patient.
pub trait RecordApi {
    fn studies(&self) -> Result<Vec<ResearchStudy>, FhirError>;
    fn subjects(&self, study_id: &str) -> Result<Vec<ResearchSubject>, FhirError>;
    fn protocol(&self, reference: &str) -> Result<PlanDefinition, FhirError>;
    fn encounters(&self, patient_ref: &str) -> Result<Vec<Encounter>, FhirError>;
    fn observations(&self, patient_ref: &str) -> Result<Vec<Observation>, FhirError>;
}

/// Blocking HTTP client against a FHIR base URL.
pub struct FhirClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl FhirClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client for the configured default record server.
    pub fn from_config() -> Self {
        Self::new(&crate::config::base_url(), crate::config::REQUEST_TIMEOUT_SECS)
    }

    fn get_json(&self, path: &str) -> Result<serde_json::Value, FhirError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "fetching record resource");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    FhirError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    FhirError::Timeout(self.timeout_secs)
                } else {
                    FhirError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FhirError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| FhirError::ResponseParsing(e.to_string()))
    }

    fn search<T: DeserializeOwned>(
        &self,
        path: &str,
        expected: ResourceType,
    ) -> Result<Vec<T>, FhirError> {
        let body = self.get_json(path)?;
        let bundle: Bundle = serde_json::from_value(body)
            .map_err(|e| FhirError::ResponseParsing(e.to_string()))?;
        unwrap_entries(bundle, expected)
    }
}

/// A FHIR search bundle. An absent `entry` array is an empty result, not
/// an error.
#[derive(Deserialize)]
struct Bundle {
    #[serde(default)]
    entry: Vec<BundleEntry>,
}

#[derive(Deserialize)]
struct BundleEntry {
    resource: serde_json::Value,
}

/// Classify and deserialize each bundle entry. Classification uses the
/// explicit `resourceType` discriminator, never field-presence probing.
fn unwrap_entries<T: DeserializeOwned>(
    bundle: Bundle,
    expected: ResourceType,
) -> Result<Vec<T>, FhirError> {
    bundle
        .entry
        .into_iter()
        .map(|entry| {
            let found = entry
                .resource
                .get("resourceType")
                .and_then(|v| v.as_str())
                .unwrap_or("<missing resourceType>");
            if found != expected.as_str() {
                return Err(FhirError::UnexpectedResourceType {
                    expected,
                    found: found.to_string(),
                });
            }
            serde_json::from_value(entry.resource)
                .map_err(|e| FhirError::ResponseParsing(e.to_string()))
        })
        .collect()
}

/// `"Patient/7"` → `"7"`. Search endpoints take the bare patient id.
fn patient_id(patient_ref: &str) -> &str {
    patient_ref
        .split_once('/')
        .map_or(patient_ref, |(_, id)| id)
}

impl RecordApi for FhirClient {
    fn studies(&self) -> Result<Vec<ResearchStudy>, FhirError> {
        self.search("ResearchStudy", ResourceType::ResearchStudy)
    }

    fn subjects(&self, study_id: &str) -> Result<Vec<ResearchSubject>, FhirError> {
        self.search(
            &format!("ResearchSubject?study={study_id}"),
            ResourceType::ResearchSubject,
        )
    }

    fn protocol(&self, reference: &str) -> Result<PlanDefinition, FhirError> {
        // Protocols are fetched by their raw reference path, not a search.
        let body = self.get_json(reference)?;
        serde_json::from_value(body).map_err(|e| FhirError::ResponseParsing(e.to_string()))
    }

    fn encounters(&self, patient_ref: &str) -> Result<Vec<Encounter>, FhirError> {
        self.search(
            &format!("Encounter?patient={}", patient_id(patient_ref)),
            ResourceType::Encounter,
        )
    }

    fn observations(&self, patient_ref: &str) -> Result<Vec<Observation>, FhirError> {
        self.search(
            &format!("Observation?patient={}", patient_id(patient_ref)),
            ResourceType::Observation,
        )
    }
}

/// In-memory record API for tests. Returns configurable collections and
/// counts how often each method is hit.
#[derive(Default)]
pub struct MockRecordApi {
    pub studies: Vec<ResearchStudy>,
    pub subjects: Vec<ResearchSubject>,
    pub protocols: Vec<PlanDefinition>,
    pub encounters: Vec<Encounter>,
    pub observations: Vec<Observation>,
    calls: std::cell::Cell<usize>,
}

impl MockRecordApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total RecordApi calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    fn tick(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl RecordApi for MockRecordApi {
    fn studies(&self) -> Result<Vec<ResearchStudy>, FhirError> {
        self.tick();
        Ok(self.studies.clone())
    }

    fn subjects(&self, study_id: &str) -> Result<Vec<ResearchSubject>, FhirError> {
        self.tick();
        Ok(self
            .subjects
            .iter()
            .filter(|s| s.study.id_part() == study_id)
            .cloned()
            .collect())
    }

    fn protocol(&self, reference: &str) -> Result<PlanDefinition, FhirError> {
        self.tick();
        let id = reference.split_once('/').map_or(reference, |(_, id)| id);
        self.protocols
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| FhirError::Api {
                status: 404,
                body: format!("PlanDefinition {id} not found"),
            })
    }

    fn encounters(&self, _patient_ref: &str) -> Result<Vec<Encounter>, FhirError> {
        self.tick();
        Ok(self.encounters.clone())
    }

    fn observations(&self, _patient_ref: &str) -> Result<Vec<Observation>, FhirError> {
        self.tick();
        Ok(self.observations.clone())
    }
}
