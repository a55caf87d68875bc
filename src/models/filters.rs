use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{Availability, ConsultationType, PriceRange};

pub const DEFAULT_MAX_DISTANCE_KM: f64 = 25.0;
pub const DEFAULT_PRICE_RANGE: PriceRange = PriceRange::new(0.0, 200.0);

/// User-adjustable search criteria
///
/// Held by the engine as a single record. Changes go through
/// [`SearchFilters::merged`], which returns a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub specialty: Option<String>,
    pub consultation_type: Option<ConsultationType>,
    pub availability: Option<Availability>,
    /// Minimum rating, 0 accepts everyone
    pub rating: f64,
    pub price_range: PriceRange,
    pub max_distance: f64,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            specialty: None,
            consultation_type: None,
            availability: None,
            rating: 0.0,
            price_range: DEFAULT_PRICE_RANGE,
            max_distance: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}

impl SearchFilters {
    /// Defaults with a configured distance and price range
    pub fn with_defaults(max_distance: f64, price_range: PriceRange) -> Self {
        Self {
            max_distance,
            price_range,
            ..Self::default()
        }
    }

    /// Apply a patch field by field; fields the patch leaves out keep their value
    pub fn merged(&self, patch: &FilterPatch) -> Self {
        Self {
            specialty: patch.specialty.clone().unwrap_or_else(|| self.specialty.clone()),
            consultation_type: patch.consultation_type.unwrap_or(self.consultation_type),
            availability: patch.availability.unwrap_or(self.availability),
            rating: patch.rating.unwrap_or(self.rating),
            price_range: patch.price_range.unwrap_or(self.price_range),
            max_distance: patch.max_distance.unwrap_or(self.max_distance),
        }
    }
}

/// Partial update for [`SearchFilters`]
///
/// The nullable fields use a double `Option`: `None` leaves the field
/// alone, `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPatch {
    #[serde(default, deserialize_with = "present_field", skip_serializing_if = "Option::is_none")]
    pub specialty: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_field", skip_serializing_if = "Option::is_none")]
    pub consultation_type: Option<Option<ConsultationType>>,
    #[serde(default, deserialize_with = "present_field", skip_serializing_if = "Option::is_none")]
    pub availability: Option<Option<Availability>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
}

/// A field that is present in the JSON, even as `null`, becomes `Some`
fn present_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = Some(Some(specialty.into()));
        self
    }

    pub fn clear_specialty(mut self) -> Self {
        self.specialty = Some(None);
        self
    }

    pub fn consultation_type(mut self, consultation: ConsultationType) -> Self {
        self.consultation_type = Some(Some(consultation));
        self
    }

    pub fn clear_consultation_type(mut self) -> Self {
        self.consultation_type = Some(None);
        self
    }

    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = Some(Some(availability));
        self
    }

    pub fn clear_availability(mut self) -> Self {
        self.availability = Some(None);
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(PriceRange::new(min, max));
        self
    }

    pub fn max_distance(mut self, km: f64) -> Self {
        self.max_distance = Some(km);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
