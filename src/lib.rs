//! Trialine: per-subject clinical-trial visit timelines.
//!
//! Fetches research studies, subjects, protocol definitions, encounters and
//! observations from a FHIR record server, then aligns each subject's actual
//! events to the protocol's planned action windows.

pub mod cli;
pub mod config;
pub mod fhir; // record API client, snapshot cache, get-or-fetch store
pub mod models; // typed FHIR resource snapshots
pub mod timeline; // the pure timeline builder + text rendering
