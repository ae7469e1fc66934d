//! CLI interface for Trialine.
//!
//! Non-interactive subcommands mirroring the selection flow: pick a study,
//! pick one of its subjects, render the subject's visit timeline against the
//! study protocol. Arguments in, text out.

use clap::{Parser, Subcommand};

use crate::fhir::{FhirClient, FhirError, RecordApi, RecordStore};
use crate::timeline::{build_timeline, render_blocks};

/// Trialine: per-subject clinical-trial visit timelines.
#[derive(Debug, Parser)]
#[command(name = "trialine", version)]
pub struct Cli {
    /// Record server base URL (overrides TRIALINE_BASE_URL and the default).
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List research studies and their protocol references.
    Studies,

    /// List a study's enrolled subjects.
    Subjects {
        /// Study id, as printed by `studies`.
        #[arg(long)]
        study: String,
    },

    /// Render a subject's visit timeline against the study protocol.
    Timeline {
        /// Study id, as printed by `studies`.
        #[arg(long)]
        study: String,

        /// Subject id, as printed by `subjects`.
        #[arg(long)]
        subject: String,
    },
}

/// Errors surfaced to the terminal.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Fhir(#[from] FhirError),
    #[error("Study {0} not found")]
    StudyNotFound(String),
    #[error("Subject {0} not found in study")]
    SubjectNotFound(String),
    #[error("Study {0} has no protocol reference")]
    MissingProtocol(String),
}

/// Parse arguments, run the command, print its report.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let client = match cli.base_url {
        Some(ref url) => FhirClient::new(url, crate::config::REQUEST_TIMEOUT_SECS),
        None => FhirClient::from_config(),
    };
    let mut store = RecordStore::new(client);

    let report = execute(&mut store, &cli.command)?;
    print!("{report}");
    Ok(())
}

/// Run one command against a record store and return its text report.
pub fn execute<C: RecordApi>(
    store: &mut RecordStore<C>,
    command: &Command,
) -> Result<String, CliError> {
    match command {
        Command::Studies => list_studies(store),
        Command::Subjects { study } => list_subjects(store, study),
        Command::Timeline { study, subject } => render_timeline(store, study, subject),
    }
}

fn list_studies<C: RecordApi>(store: &mut RecordStore<C>) -> Result<String, CliError> {
    let studies = store.studies()?;
    let mut out = String::new();
    for study in &studies {
        out.push_str(&format!(
            "{}  {}  (protocol: {})\n",
            study.id,
            study.title,
            study.protocol_reference().unwrap_or("none"),
        ));
    }
    Ok(out)
}

fn list_subjects<C: RecordApi>(
    store: &mut RecordStore<C>,
    study_id: &str,
) -> Result<String, CliError> {
    let subjects = store.subjects(study_id)?;
    let mut out = String::new();
    for subject in &subjects {
        out.push_str(&format!(
            "{}  {}  (enrolled: {})\n",
            subject.id,
            subject.patient_reference(),
            subject.anchor_date().unwrap_or("unknown"),
        ));
    }
    Ok(out)
}

fn render_timeline<C: RecordApi>(
    store: &mut RecordStore<C>,
    study_id: &str,
    subject_id: &str,
) -> Result<String, CliError> {
    let studies = store.studies()?;
    let study = studies
        .iter()
        .find(|s| s.id == study_id)
        .ok_or_else(|| CliError::StudyNotFound(study_id.to_string()))?;
    let protocol_ref = study
        .protocol_reference()
        .ok_or_else(|| CliError::MissingProtocol(study_id.to_string()))?
        .to_string();

    let protocol = store.protocol(&protocol_ref)?;

    let subjects = store.subjects(study_id)?;
    let subject = subjects
        .iter()
        .find(|s| s.id == subject_id)
        .ok_or_else(|| CliError::SubjectNotFound(subject_id.to_string()))?;

    let patient_ref = subject.patient_reference().to_string();
    let encounters = store.encounters(&patient_ref)?;
    let observations = store.observations(&patient_ref)?;

    tracing::info!(
        study = %study_id,
        subject = %subject_id,
        encounters = encounters.len(),
        observations = observations.len(),
        "building timeline"
    );

    let blocks = build_timeline(subject, &protocol, &encounters, &observations);
    Ok(render_blocks(&blocks))
}
