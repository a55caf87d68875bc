use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{EngineSettings, FixedClock, MatchingEngine, SearchPreset};
use crate::error::DiscoveryError;
use crate::models::{
    ErrorResponse, HealthResponse, SearchRequest, SearchResponse, MEDICAL_SPECIALTIES,
};
use crate::services::{ProviderDirectory, StaticLocationProvider};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn ProviderDirectory>,
    pub engine_settings: EngineSettings,
}

/// Configure all doctor discovery routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/specialties", web::get().to(list_specialties))
        .route("/doctors/search", web::post().to(search_doctors))
        .route("/doctors/presets/{preset}", web::post().to(search_with_preset));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let directory_healthy = state.directory.health_check().await;

    let status = if directory_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn list_specialties() -> impl Responder {
    HttpResponse::Ok().json(MEDICAL_SPECIALTIES)
}

/// Search doctors endpoint
///
/// POST /api/v1/doctors/search
///
/// Request body:
/// ```json
/// {
///   "latitude": 10.4806,
///   "longitude": -66.9036,
///   "accuracyMeters": 12.0,
///   "filters": { "specialty": "Cardiología", "rating": 4 },
///   "sortBy": "rating",
///   "limit": 20,
///   "localTime": "14:30"
/// }
/// ```
async fn search_doctors(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> HttpResponse {
    run_search(&state, req.into_inner(), None).await
}

/// Preset search endpoint
///
/// POST /api/v1/doctors/presets/{emergency|virtual-now|home-visit-today}
///
/// Same body and response as the search endpoint. The preset is merged on
/// top of any filters sent in the body.
async fn search_with_preset(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<SearchRequest>,
) -> HttpResponse {
    let preset = match path.parse::<SearchPreset>() {
        Ok(preset) => preset,
        Err(e) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "unknown_preset".to_string(),
                message: e.to_string(),
                status_code: 404,
            });
        }
    };

    run_search(&state, req.into_inner(), Some(preset)).await
}

async fn run_search(
    state: &AppState,
    req: SearchRequest,
    preset: Option<SearchPreset>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let search_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        "Search {}: ({}, {}) preset={:?} limit={}",
        search_id,
        req.latitude,
        req.longitude,
        preset,
        req.limit
    );

    let mut engine = MatchingEngine::new(
        Arc::new(StaticLocationProvider::granted(req.position_fix())),
        state.directory.clone(),
        state.engine_settings.clone(),
    );
    if let Some(local_time) = req.local_time {
        engine = engine.with_clock(Arc::new(FixedClock(local_time)));
    }

    if let Err(e) = engine.initialize_location().await {
        return discovery_error_response(&e);
    }
    if let Some(patch) = &req.filters {
        engine.update_filters(patch).await;
    }

    let outcome = match &preset {
        Some(preset) => engine.search_preset(preset).await,
        None => engine.search_doctors_with_filters(None).await,
    };
    if let Err(e) = outcome {
        tracing::error!("Search {} failed: {}", search_id, e);
        return discovery_error_response(&e);
    }

    let stats = engine.get_search_stats().await;
    let mut doctors = engine.get_sorted_doctors(req.sort_by.unwrap_or_default()).await;
    let total_results = doctors.len();
    doctors.truncate(req.limit as usize);

    let response = SearchResponse {
        search_id,
        doctors: doctors.into_iter().map(|d| engine.annotate(d)).collect(),
        filters: engine.filters().await.as_ref().clone(),
        stats,
        total_results,
    };

    HttpResponse::Ok().json(response)
}

fn discovery_error_response(err: &DiscoveryError) -> HttpResponse {
    let body = |status_code: u16| ErrorResponse {
        error: err.kind().to_string(),
        message: err.to_string(),
        status_code,
    };

    match err {
        DiscoveryError::PermissionDenied => HttpResponse::Forbidden().json(body(403)),
        DiscoveryError::LocationUnavailable(_) => HttpResponse::UnprocessableEntity().json(body(422)),
        DiscoveryError::SearchFailed(_) => HttpResponse::BadGateway().json(body(502)),
    }
}
