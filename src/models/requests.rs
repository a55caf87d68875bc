use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::domain::{is_known_specialty, Coordinates, PositionFix, SortCriteria};
use super::filters::FilterPatch;

/// Request to search for doctors around a position fix
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_patch"))]
pub struct SearchRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(alias = "accuracy_meters", rename = "accuracyMeters", default)]
    #[validate(range(min = 0.0))]
    pub accuracy_meters: Option<f64>,
    #[serde(default)]
    pub filters: Option<FilterPatch>,
    #[serde(alias = "sort_by", rename = "sortBy", default)]
    pub sort_by: Option<SortCriteria>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u16,
    /// The user's local wall-clock time; the server clock when absent
    #[serde(
        alias = "local_time",
        rename = "localTime",
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::domain::optional_clock"
    )]
    pub local_time: Option<NaiveTime>,
}

fn default_limit() -> u16 {
    20
}

impl SearchRequest {
    pub fn position_fix(&self) -> PositionFix {
        PositionFix {
            coordinates: Coordinates::new(self.latitude, self.longitude),
            accuracy_meters: self.accuracy_meters.unwrap_or(0.0),
        }
    }
}

fn validate_patch(request: &SearchRequest) -> Result<(), ValidationError> {
    let Some(patch) = &request.filters else {
        return Ok(());
    };

    if let Some(Some(specialty)) = &patch.specialty {
        if !is_known_specialty(specialty) {
            return Err(ValidationError::new("unknown_specialty"));
        }
    }
    if let Some(rating) = patch.rating {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ValidationError::new("rating_out_of_range"));
        }
    }
    if let Some(range) = patch.price_range {
        if range.min < 0.0 || range.min > range.max {
            return Err(ValidationError::new("invalid_price_range"));
        }
    }
    if let Some(km) = patch.max_distance {
        if km <= 0.0 {
            return Err(ValidationError::new("invalid_max_distance"));
        }
    }

    Ok(())
}
