// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Category, LocationPreference, PairingOutcome, PairingRecord, Participant, Partner,
    SessionHistoryEntry, UNPAIRED_MARKER,
};
pub use requests::{
    ExportFormat, ExportFormatQuery, ExportPairingsRequest, GeneratePairingsRequest,
    HistorySearchQuery, SaveParticipantRequest, SaveSessionRequest, UpdateSettingsRequest,
};
pub use responses::{ErrorResponse, GeneratePairingsResponse, HealthResponse, SavedResponse};
