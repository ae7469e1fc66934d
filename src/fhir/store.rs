//! Get-or-fetch composition of a [`RecordApi`] and the [`ResourceCache`].
//!
//! One store per session. Cached snapshots satisfy repeat reads within a
//! render cycle; `refresh` invalidates so the next read refetches. List
//! results are cached per query argument alongside the per-id snapshots.

use super::cache::ResourceCache;
use super::client::RecordApi;
use super::{FhirError, ResourceType};
use crate::models::{Encounter, Observation, PlanDefinition, ResearchStudy, ResearchSubject};

/// Record access front door for the UI layer: an injected API plus the
/// snapshot cache. The timeline core never sees this type.
pub struct RecordStore<C: RecordApi> {
    api: C,
    cache: ResourceCache,
}

impl<C: RecordApi> RecordStore<C> {
    pub fn new(api: C) -> Self {
        Self {
            api,
            cache: ResourceCache::new(),
        }
    }

    /// All studies on the server.
    pub fn studies(&mut self) -> Result<Vec<ResearchStudy>, FhirError> {
        if let Some(cached) = self.cache.get_list(ResourceType::ResearchStudy) {
            return Ok(cached);
        }
        let studies = self.api.studies()?;
        self.cache.insert_list(ResourceType::ResearchStudy, &studies);
        for study in &studies {
            self.cache
                .insert(ResourceType::ResearchStudy, &study.id, study);
        }
        Ok(studies)
    }

    /// A study's enrolled subjects.
    pub fn subjects(&mut self, study_id: &str) -> Result<Vec<ResearchSubject>, FhirError> {
        if let Some(cached) = self.cache.get(ResourceType::ResearchSubject, study_id) {
            return Ok(cached);
        }
        let subjects = self.api.subjects(study_id)?;
        self.cache
            .insert(ResourceType::ResearchSubject, study_id, &subjects);
        Ok(subjects)
    }

    /// A protocol by its reference path.
    pub fn protocol(&mut self, reference: &str) -> Result<PlanDefinition, FhirError> {
        if let Some(cached) = self.cache.get(ResourceType::PlanDefinition, reference) {
            return Ok(cached);
        }
        let protocol = self.api.protocol(reference)?;
        self.cache
            .insert(ResourceType::PlanDefinition, reference, &protocol);
        Ok(protocol)
    }

    /// A patient's encounters.
    pub fn encounters(&mut self, patient_ref: &str) -> Result<Vec<Encounter>, FhirError> {
        if let Some(cached) = self.cache.get(ResourceType::Encounter, patient_ref) {
            return Ok(cached);
        }
        let encounters = self.api.encounters(patient_ref)?;
        self.cache
            .insert(ResourceType::Encounter, patient_ref, &encounters);
        Ok(encounters)
    }

    /// A patient's observations.
    pub fn observations(&mut self, patient_ref: &str) -> Result<Vec<Observation>, FhirError> {
        if let Some(cached) = self.cache.get(ResourceType::Observation, patient_ref) {
            return Ok(cached);
        }
        let observations = self.api.observations(patient_ref)?;
        self.cache
            .insert(ResourceType::Observation, patient_ref, &observations);
        Ok(observations)
    }

    /// Drop every cached snapshot. The next reads fetch fresh.
    pub fn refresh(&mut self) {
        self.cache.clear();
    }

    /// Drop one resource type's snapshots, e.g. after a known upstream edit.
    pub fn invalidate_type(&mut self, resource_type: ResourceType) {
        self.cache.invalidate_type(resource_type);
    }
}
