use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{PairingRecord, Participant, UNPAIRED_MARKER};

/// Errors that can occur while exporting a pairing result
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),

    #[error("Buffer error: {0}")]
    BufferError(String),
}

/// One flat export row per pairing record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Pair")]
    pub pair: usize,
    #[serde(rename = "Coach")]
    pub coach: String,
    #[serde(rename = "Coach Email")]
    pub coach_email: String,
    #[serde(rename = "Coach Location")]
    pub coach_location: String,
    #[serde(rename = "Coachee")]
    pub coachee: String,
    #[serde(rename = "Coachee Email")]
    pub coachee_email: String,
    #[serde(rename = "Coachee Location")]
    pub coachee_location: String,
}

impl ExportRow {
    fn from_record(index: usize, record: &PairingRecord) -> Self {
        let (coachee, coachee_email, coachee_location) = match record.coachee.participant() {
            Some(p) => (p.name.clone(), email_of(p), location_of(p)),
            None => (UNPAIRED_MARKER.to_string(), String::new(), String::new()),
        };

        Self {
            pair: index + 1,
            coach: record.coach.name.clone(),
            coach_email: email_of(&record.coach),
            coach_location: location_of(&record.coach),
            coachee,
            coachee_email,
            coachee_location,
        }
    }
}

fn email_of(p: &Participant) -> String {
    p.email.clone().unwrap_or_default()
}

fn location_of(p: &Participant) -> String {
    p.location().unwrap_or_default().to_string()
}

pub fn export_rows(pairings: &[PairingRecord]) -> Vec<ExportRow> {
    pairings
        .iter()
        .enumerate()
        .map(|(i, r)| ExportRow::from_record(i, r))
        .collect()
}

#[derive(Serialize)]
struct JsonExport<'a> {
    #[serde(rename = "sessionName")]
    session_name: &'a str,
    #[serde(rename = "generatedAt")]
    generated_at: DateTime<Utc>,
    pairings: Vec<ExportRow>,
}

/// Pretty JSON document of a pairing result
pub fn to_json(
    session_name: &str,
    generated_at: DateTime<Utc>,
    pairings: &[PairingRecord],
) -> Result<String, ExportError> {
    let export = JsonExport {
        session_name,
        generated_at,
        pairings: export_rows(pairings),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Delimited text of a pairing result, header row first
pub fn to_csv(pairings: &[PairingRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in export_rows(pairings) {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::BufferError(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
