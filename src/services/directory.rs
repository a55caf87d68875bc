use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ConsultationType, Coordinates, DoctorLocation, SearchFilters};

/// Errors that can occur when querying the provider directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("directory query timed out")]
    Timeout,
}

/// The subset of the filters the directory applies on its side
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryQuery {
    pub specialty: Option<String>,
    pub consultation_type: Option<ConsultationType>,
    pub max_distance_km: f64,
}

impl From<&SearchFilters> for DirectoryQuery {
    fn from(filters: &SearchFilters) -> Self {
        Self {
            specialty: filters.specialty.clone(),
            consultation_type: filters.consultation_type,
            max_distance_km: filters.max_distance,
        }
    }
}

/// Source of candidate providers around a point
///
/// The directory may return candidates that fail the query; the engine
/// re-checks every filter. Candidates come back without `distance`.
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn find_nearby(
        &self,
        origin: Coordinates,
        query: &DirectoryQuery,
    ) -> Result<Vec<DoctorLocation>, DirectoryError>;

    /// Whether the backing service is reachable
    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_filters() {
        let filters = SearchFilters {
            specialty: Some("Cardiología".to_string()),
            consultation_type: Some(ConsultationType::Virtual),
            rating: 4.5,
            max_distance: 12.0,
            ..SearchFilters::default()
        };

        let query = DirectoryQuery::from(&filters);

        assert_eq!(query.specialty.as_deref(), Some("Cardiología"));
        assert_eq!(query.consultation_type, Some(ConsultationType::Virtual));
        assert_eq!(query.max_distance_km, 12.0);
    }
}
