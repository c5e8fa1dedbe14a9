use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::{Category, LocationPreference, PairingRecord};

/// Request to generate a round of pairings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePairingsRequest {
    #[serde(alias = "location_preference", rename = "locationPreference", default)]
    pub location_preference: Option<LocationPreference>,
    #[serde(alias = "respect_exclusions", rename = "respectExclusions", default)]
    pub respect_exclusions: Option<bool>,
}

/// Request to create or update a participant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveParticipantRequest {
    /// Present when editing an existing participant
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 200))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(email)]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// Form fields arrive as possibly-empty strings; blank means absent
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Request to save a generated round to history
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveSessionRequest {
    #[validate(length(min = 1, max = 200))]
    #[serde(default = "default_session_name")]
    pub name: String,
    #[validate(length(min = 1))]
    pub pairings: Vec<PairingRecord>,
    #[serde(alias = "location_preference", rename = "locationPreference", default)]
    pub location_preference: LocationPreference,
}

fn default_session_name() -> String {
    "Pairing Session".to_string()
}

/// Request to export a pairing result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPairingsRequest {
    #[serde(alias = "session_name", rename = "sessionName", default = "default_session_name")]
    pub session_name: String,
    pub pairings: Vec<PairingRecord>,
}

/// Query for export format
#[derive(Debug, Clone, Deserialize)]
pub struct ExportFormatQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Date range for history search, dates as YYYY-MM-DD
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySearchQuery {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

/// Request to change stored settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(alias = "location_preference", rename = "locationPreference")]
    pub location_preference: LocationPreference,
}
