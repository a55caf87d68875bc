use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::core::distance::calculate_bounding_box;
use crate::models::{Coordinates, DoctorLocation};
use super::directory::{DirectoryError, DirectoryQuery, ProviderDirectory};

/// REST client for the provider directory backend
///
/// Sends the origin, a coarse bounding box and the server-side filters,
/// with `minLon > maxLon` when the box crosses the antimeridian,
/// and reads back a `providers` (or `documents`) array. Records that do
/// not parse are skipped with a warning instead of failing the search.
pub struct RemoteDirectory {
    base_url: String,
    api_key: String,
    client: Client,
}

impl RemoteDirectory {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn nearby_url(&self, origin: Coordinates, query: &DirectoryQuery) -> String {
        let bbox = calculate_bounding_box(origin, query.max_distance_km);

        let mut params = vec![
            format!("lat={}", origin.latitude),
            format!("lon={}", origin.longitude),
            format!("radiusKm={}", query.max_distance_km),
            format!("minLat={}", bbox.min_lat),
            format!("maxLat={}", bbox.max_lat),
            format!("minLon={}", bbox.min_lon),
            format!("maxLon={}", bbox.max_lon),
        ];

        if let Some(specialty) = &query.specialty {
            params.push(format!("specialty={}", urlencoding::encode(specialty)));
        }
        if let Some(consultation) = query.consultation_type {
            params.push(format!("consultationType={}", consultation.as_str()));
        }

        format!(
            "{}/providers/nearby?{}",
            self.base_url.trim_end_matches('/'),
            params.join("&")
        )
    }
}

#[async_trait]
impl ProviderDirectory for RemoteDirectory {
    async fn find_nearby(
        &self,
        origin: Coordinates,
        query: &DirectoryQuery,
    ) -> Result<Vec<DoctorLocation>, DirectoryError> {
        let url = self.nearby_url(origin, query);

        tracing::debug!("Querying provider directory: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DirectoryError::Timeout
                } else {
                    DirectoryError::RequestError(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DirectoryError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Directory query failed: {} - {}", status, body);
            return Err(DirectoryError::ApiError(format!(
                "Failed to query providers: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("providers")
            .or_else(|| json.get("documents"))
            .and_then(|d| d.as_array())
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing providers array".into()))?;

        let providers: Vec<DoctorLocation> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                match serde_json::from_value::<DoctorLocation>(data.clone()) {
                    Ok(mut doctor) => {
                        // Distances from the backend are not trusted
                        doctor.distance = None;
                        Some(doctor)
                    }
                    Err(e) => {
                        tracing::warn!("Skipping malformed provider record: {}", e);
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(
            "Directory returned {} providers ({} records)",
            providers.len(),
            documents.len()
        );

        Ok(providers)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));
        match self.client.get(&url).header("X-Api-Key", &self.api_key).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Directory health check failed: {}", e);
                false
            }
        }
    }
}
