use serde::{Deserialize, Serialize};

use super::domain::{DoctorLocation, SearchStats};
use super::filters::SearchFilters;

/// Doctor with the facts derived for the current fix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedDoctor {
    #[serde(flatten)]
    pub doctor: DoctorLocation,
    pub available_now: bool,
    pub can_visit_home: bool,
    pub eta_minutes: u32,
}

/// Response for the search and preset endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_id: String,
    pub doctors: Vec<AnnotatedDoctor>,
    pub filters: SearchFilters,
    pub stats: SearchStats,
    pub total_results: usize,
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
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
