use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::PairingSettings;
use crate::core::{history, PairingEngine, StatsCalculator};
use crate::models::{
    ErrorResponse, ExportFormat, ExportFormatQuery, ExportPairingsRequest, GeneratePairingsRequest,
    GeneratePairingsResponse, HealthResponse, HistorySearchQuery, Participant, SaveParticipantRequest,
    SaveSessionRequest, SavedResponse, SessionHistoryEntry, UpdateSettingsRequest,
};
use crate::services::{export, DocumentStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub pairing: PairingSettings,
}

/// Configure all pairing-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/participants", web::get().to(list_participants))
        .route("/participants", web::post().to(save_participant))
        .route("/participants/{id}", web::delete().to(delete_participant))
        .route("/pairings/generate", web::post().to(generate_pairings))
        .route("/pairings/export", web::post().to(export_pairings))
        .route("/sessions", web::get().to(list_sessions))
        .route("/sessions", web::post().to(save_session))
        .route("/sessions", web::delete().to(clear_sessions))
        .route("/sessions/search", web::get().to(search_sessions))
        .route("/sessions/statistics", web::get().to(session_statistics))
        .route("/settings", web::get().to(get_settings))
        .route("/settings", web::put().to(update_settings))
        .route("/data/export", web::get().to(export_data))
        .route("/data/import", web::post().to(import_data))
        .route("/data", web::delete().to(clear_data));
}

fn error_response(status: u16, error: &str, message: impl Into<String>) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status,
    };
    match status {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn store_error_response(context: &str, e: StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(_) => error_response(404, context, e.to_string()),
        StoreError::InvalidImport(_) => error_response(400, context, e.to_string()),
        _ => {
            tracing::error!("{}: {}", context, e);
            error_response(500, context, e.to_string())
        }
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn list_participants(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.store.participants().await)
}

/// Create or update a participant
///
/// POST /api/v1/participants
///
/// Request body:
/// ```json
/// {
///   "id": "optional, present when editing",
///   "name": "string",
///   "email": "string",
///   "location": "string",
///   "category": "Coach Only|Coachee Only|Both",
///   "exclusions": ["participant id"]
/// }
/// ```
async fn save_participant(
    state: web::Data<AppState>,
    req: web::Json<SaveParticipantRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for save_participant request: {:?}", errors);
        return error_response(400, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let participant = Participant {
        id: req.id.unwrap_or_default(),
        name: req.name,
        email: req.email,
        location: req.location,
        category: req.category,
        exclusions: req.exclusions,
        created_at: None,
        updated_at: None,
    };

    match state.store.save_participant(participant).await {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(e) => store_error_response("Failed to save participant", e),
    }
}

async fn delete_participant(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.store.delete_participant(&id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response("Failed to delete participant", e),
    }
}

/// Generate a round of pairings from the stored roster and history
///
/// POST /api/v1/pairings/generate
///
/// Request body:
/// ```json
/// {
///   "locationPreference": "Ignore|Same|Different",
///   "respectExclusions": true
/// }
/// ```
async fn generate_pairings(
    state: web::Data<AppState>,
    req: web::Json<GeneratePairingsRequest>,
) -> impl Responder {
    let roster = state.store.participants().await;

    if roster.len() < 2 {
        return error_response(
            400,
            "Not enough participants",
            "Need at least 2 participants to generate pairings",
        );
    }

    let history = state.store.history().await;
    let stored = state.store.settings().await;

    let location_preference = req
        .location_preference
        .unwrap_or(stored.location_preference);
    let respect_exclusions = req
        .respect_exclusions
        .unwrap_or(state.pairing.respect_exclusions);

    tracing::info!(
        "Generating pairings for {} participants ({} past sessions, location {:?}, exclusions {})",
        roster.len(),
        history.len(),
        location_preference,
        respect_exclusions
    );

    let stats = StatsCalculator::compute_stats(&history);
    let outcome = PairingEngine::new(&roster, &stats)
        .with_weights(state.pairing.weights())
        .generate_pairings(location_preference, respect_exclusions);

    for warning in &outcome.warnings {
        tracing::warn!("Pairing warning: {}", warning);
    }

    HttpResponse::Ok().json(GeneratePairingsResponse {
        pairings: outcome.pairings,
        warnings: outcome.warnings,
        generated_at: chrono::Utc::now(),
    })
}

/// Export a pairing result as JSON or CSV
///
/// POST /api/v1/pairings/export?format=csv
async fn export_pairings(
    query: web::Query<ExportFormatQuery>,
    req: web::Json<ExportPairingsRequest>,
) -> impl Responder {
    let result = match query.format {
        ExportFormat::Json => export::to_json(&req.session_name, chrono::Utc::now(), &req.pairings)
            .map(|body| ("application/json", body)),
        ExportFormat::Csv => export::to_csv(&req.pairings).map(|body| ("text/csv; charset=utf-8", body)),
    };

    match result {
        Ok((content_type, body)) => HttpResponse::Ok().content_type(content_type).body(body),
        Err(e) => {
            tracing::error!("Failed to export pairings: {}", e);
            error_response(500, "Failed to export pairings", e.to_string())
        }
    }
}

async fn list_sessions(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.store.history().await)
}

/// Save a generated round to history
///
/// POST /api/v1/sessions
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "pairings": [{ "coach": {...}, "coachee": {...} | "UNPAIRED" }],
///   "locationPreference": "Ignore|Same|Different"
/// }
/// ```
async fn save_session(
    state: web::Data<AppState>,
    req: web::Json<SaveSessionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let participant_count = state.store.participants().await.len();
    let entry = SessionHistoryEntry {
        location_preference: req.location_preference,
        participant_count,
        ..SessionHistoryEntry::new(req.name, chrono::Utc::now(), req.pairings)
    };

    match state.store.save_session(entry).await {
        Ok(saved) => HttpResponse::Ok().json(SavedResponse {
            success: true,
            id: saved.id,
        }),
        Err(e) => store_error_response("Failed to save session", e),
    }
}

async fn clear_sessions(state: web::Data<AppState>) -> impl Responder {
    match state.store.clear_history().await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response("Failed to clear history", e),
    }
}

/// Sessions within a date range
///
/// GET /api/v1/sessions/search?start=2024-01-01&end=2024-01-31
async fn search_sessions(
    state: web::Data<AppState>,
    query: web::Query<HistorySearchQuery>,
) -> impl Responder {
    if query.start > query.end {
        return error_response(400, "Invalid date range", "start must not be after end");
    }

    let all = state.store.history().await;
    let found = history::search_by_date_range(&all, query.start, query.end);
    tracing::debug!(
        "History search {}..{} matched {} of {} sessions",
        query.start,
        query.end,
        found.len(),
        all.len()
    );
    HttpResponse::Ok().json(found)
}

async fn session_statistics(state: web::Data<AppState>) -> impl Responder {
    let all = history::dedupe(state.store.history().await);
    HttpResponse::Ok().json(history::history_statistics(&all))
}

async fn get_settings(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.store.settings().await)
}

async fn update_settings(
    state: web::Data<AppState>,
    req: web::Json<UpdateSettingsRequest>,
) -> impl Responder {
    match state.store.update_settings(req.location_preference).await {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(e) => store_error_response("Failed to update settings", e),
    }
}

async fn export_data(state: web::Data<AppState>) -> impl Responder {
    match state.store.export_document().await {
        Ok(json) => HttpResponse::Ok().content_type("application/json").body(json),
        Err(e) => store_error_response("Failed to export data", e),
    }
}

async fn import_data(state: web::Data<AppState>, body: String) -> impl Responder {
    match state.store.import_document(&body).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response("Failed to import data", e),
    }
}

async fn clear_data(state: web::Data<AppState>) -> impl Responder {
    match state.store.clear_all().await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response("Failed to clear data", e),
    }
}
