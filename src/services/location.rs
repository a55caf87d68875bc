use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::PositionFix;

/// Errors reported by the device location service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("permission request failed: {0}")]
    PermissionRequestFailed(String),

    #[error("position fix failed: {0}")]
    PositionFailed(String),

    #[error("position fix timed out")]
    Timeout,
}

/// Permission state and single position fixes
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn has_permission(&self) -> bool;

    /// Ask the user for permission; `Ok(false)` when they refuse
    async fn request_permission(&self) -> Result<bool, LocationError>;

    async fn current_position(&self) -> Result<PositionFix, LocationError>;
}

/// Location provider that always reports the same fix
///
/// Used where the caller already holds a fix, such as the HTTP surface
/// where the client sends its coordinates with each request.
#[derive(Debug)]
pub struct StaticLocationProvider {
    fix: Option<PositionFix>,
    permission: RwLock<bool>,
    grant_on_request: bool,
}

impl StaticLocationProvider {
    /// Permission already granted
    pub fn granted(fix: PositionFix) -> Self {
        Self {
            fix: Some(fix),
            permission: RwLock::new(true),
            grant_on_request: true,
        }
    }

    /// Permission not yet granted; a request will be accepted
    pub fn prompting(fix: PositionFix) -> Self {
        Self {
            fix: Some(fix),
            permission: RwLock::new(false),
            grant_on_request: true,
        }
    }

    /// The user refuses every permission request
    pub fn denied() -> Self {
        Self {
            fix: None,
            permission: RwLock::new(false),
            grant_on_request: false,
        }
    }

    /// Permission granted but the device never gets a fix
    pub fn without_fix() -> Self {
        Self {
            fix: None,
            permission: RwLock::new(true),
            grant_on_request: true,
        }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn has_permission(&self) -> bool {
        *self.permission.read().await
    }

    async fn request_permission(&self) -> Result<bool, LocationError> {
        let mut permission = self.permission.write().await;
        *permission = self.grant_on_request;
        Ok(*permission)
    }

    async fn current_position(&self) -> Result<PositionFix, LocationError> {
        if !*self.permission.read().await {
            return Err(LocationError::PositionFailed("permission not granted".to_string()));
        }
        self.fix
            .ok_or_else(|| LocationError::PositionFailed("no fix available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn fix() -> PositionFix {
        PositionFix {
            coordinates: Coordinates::new(10.4806, -66.9036),
            accuracy_meters: 8.0,
        }
    }

    #[tokio::test]
    async fn test_prompting_provider_grants_on_request() {
        let provider = StaticLocationProvider::prompting(fix());

        assert!(!provider.has_permission().await);
        assert!(provider.current_position().await.is_err());
        assert_eq!(provider.request_permission().await, Ok(true));
        assert_eq!(provider.current_position().await, Ok(fix()));
    }

    #[tokio::test]
    async fn test_denied_provider() {
        let provider = StaticLocationProvider::denied();

        assert_eq!(provider.request_permission().await, Ok(false));
        assert!(!provider.has_permission().await);
    }

    #[tokio::test]
    async fn test_provider_without_fix() {
        let provider = StaticLocationProvider::without_fix();
        assert!(matches!(
            provider.current_position().await,
            Err(LocationError::PositionFailed(_))
        ));
    }
}
