use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Coordinates, DoctorLocation};
use super::directory::{DirectoryError, DirectoryQuery, ProviderDirectory};

/// Origins are snapped to a grid of this many degrees
const SNAP_DEGREES: f64 = 0.001;

/// Radius padding covering the distance from any origin to its snapped
/// point (half a grid cell diagonal is under 80 m)
pub const SNAP_SLACK_KM: f64 = 0.1;

/// Short-lived cache in front of a provider directory
///
/// Only raw candidates are cached, keyed by the origin snapped to a
/// 0.001° grid and the server-side filter fields. The inner directory is
/// queried from the snapped origin with the radius widened by
/// [`SNAP_SLACK_KM`], so a cached entry holds every candidate in range of
/// any origin that maps to its key. Distances are computed by the engine
/// for every search and never stored here.
pub struct CachedDirectory<D> {
    inner: D,
    cache: moka::future::Cache<String, Arc<Vec<DoctorLocation>>>,
}

impl<D: ProviderDirectory> CachedDirectory<D> {
    pub fn new(inner: D, capacity: u64, ttl: Duration) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<D: ProviderDirectory> ProviderDirectory for CachedDirectory<D> {
    async fn find_nearby(
        &self,
        origin: Coordinates,
        query: &DirectoryQuery,
    ) -> Result<Vec<DoctorLocation>, DirectoryError> {
        let snapped = snap(origin);
        let key = CacheKey::nearby(snapped, query);

        if let Some(hit) = self.cache.get(&key).await {
            tracing::trace!("Directory cache hit: {}", key);
            return Ok(hit.as_ref().clone());
        }

        let widened = DirectoryQuery {
            max_distance_km: query.max_distance_km + SNAP_SLACK_KM,
            ..query.clone()
        };

        // Failures are not cached
        let candidates = self.inner.find_nearby(snapped, &widened).await?;
        self.cache.insert(key.clone(), Arc::new(candidates.clone())).await;

        tracing::trace!("Directory cache set: {}", key);
        Ok(candidates)
    }

    async fn health_check(&self) -> bool {
        self.inner.health_check().await
    }
}

fn snap(origin: Coordinates) -> Coordinates {
    let round = |value: f64| (value / SNAP_DEGREES).round() * SNAP_DEGREES;
    Coordinates::new(round(origin.latitude), round(origin.longitude))
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Origin formatted to 3 decimals (about 100 m)
    pub fn nearby(origin: Coordinates, query: &DirectoryQuery) -> String {
        format!(
            "nearby:{:.3}:{:.3}:{}:{}:{}",
            origin.latitude,
            origin.longitude,
            query.specialty.as_deref().unwrap_or("*"),
            query.consultation_type.map_or("*", |c| c.as_str()),
            query.max_distance_km
        )
    }
}
