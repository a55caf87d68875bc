use thiserror::Error;

use crate::services::{DirectoryError, LocationError};

/// Errors surfaced by the matching engine
///
/// All of them are recoverable; the caller decides whether and when to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("doctor search failed: {0}")]
    SearchFailed(String),
}

impl DiscoveryError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            DiscoveryError::PermissionDenied => "permission_denied",
            DiscoveryError::LocationUnavailable(_) => "location_unavailable",
            DiscoveryError::SearchFailed(_) => "search_failed",
        }
    }
}

impl From<LocationError> for DiscoveryError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::PermissionRequestFailed(_) => DiscoveryError::PermissionDenied,
            other => DiscoveryError::LocationUnavailable(other.to_string()),
        }
    }
}

impl From<DirectoryError> for DiscoveryError {
    fn from(err: DirectoryError) -> Self {
        DiscoveryError::SearchFailed(err.to_string())
    }
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
