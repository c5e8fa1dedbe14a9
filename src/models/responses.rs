use serde::{Deserialize, Serialize};
use crate::models::domain::PairingRecord;

/// Response for the generate pairings endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePairingsResponse {
    pub pairings: Vec<PairingRecord>,
    pub warnings: Vec<String>,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Acknowledgement for writes that create something
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedResponse {
    pub success: bool,
    pub id: String,
}
