use std::fmt;
use std::str::FromStr;

use crate::models::{Availability, ConsultationType, FilterPatch, EMERGENCY_SPECIALTY};

/// Named filter shortcuts
///
/// Each preset only touches the fields it names; the rest of the user's
/// filters stay as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPreset {
    /// Emergency doctors who can come to the user right now
    Emergency,
    VirtualNow,
    HomeVisitToday,
    Specialty(String),
}

impl SearchPreset {
    pub fn patch(&self) -> FilterPatch {
        match self {
            SearchPreset::Emergency => FilterPatch::new()
                .specialty(EMERGENCY_SPECIALTY)
                .consultation_type(ConsultationType::HomeVisit)
                .availability(Availability::Now)
                .max_distance(30.0),
            SearchPreset::VirtualNow => FilterPatch::new()
                .consultation_type(ConsultationType::Virtual)
                .availability(Availability::Now),
            SearchPreset::HomeVisitToday => FilterPatch::new()
                .consultation_type(ConsultationType::HomeVisit)
                .availability(Availability::Today)
                .max_distance(20.0),
            SearchPreset::Specialty(specialty) => FilterPatch::new().specialty(specialty.clone()),
        }
    }
}

impl fmt::Display for SearchPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchPreset::Emergency => write!(f, "emergency"),
            SearchPreset::VirtualNow => write!(f, "virtual-now"),
            SearchPreset::HomeVisitToday => write!(f, "home-visit-today"),
            SearchPreset::Specialty(specialty) => write!(f, "specialty:{}", specialty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset: {0}")]
pub struct UnknownPreset(pub String);

impl FromStr for SearchPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emergency" => Ok(SearchPreset::Emergency),
            "virtual-now" | "virtual_now" => Ok(SearchPreset::VirtualNow),
            "home-visit-today" | "home_visit_today" => Ok(SearchPreset::HomeVisitToday),
            other => other
                .strip_prefix("specialty:")
                .filter(|s| !s.is_empty())
                .map(|s| SearchPreset::Specialty(s.to_string()))
                .ok_or_else(|| UnknownPreset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchFilters;

    #[test]
    fn test_emergency_preset_fields() {
        let filters = SearchFilters::default().merged(&SearchPreset::Emergency.patch());

        assert_eq!(filters.specialty.as_deref(), Some("Emergencia Médica"));
        assert_eq!(filters.consultation_type, Some(ConsultationType::HomeVisit));
        assert_eq!(filters.availability, Some(Availability::Now));
        assert_eq!(filters.max_distance, 30.0);
    }

    #[test]
    fn test_virtual_now_leaves_distance_alone() {
        let current = SearchFilters {
            max_distance: 7.0,
            rating: 4.0,
            ..SearchFilters::default()
        };

        let filters = current.merged(&SearchPreset::VirtualNow.patch());

        assert_eq!(filters.max_distance, 7.0);
        assert_eq!(filters.rating, 4.0);
        assert_eq!(filters.consultation_type, Some(ConsultationType::Virtual));
    }

    #[test]
    fn test_home_visit_today() {
        let filters = SearchFilters::default().merged(&SearchPreset::HomeVisitToday.patch());

        assert_eq!(filters.availability, Some(Availability::Today));
        assert_eq!(filters.max_distance, 20.0);
        assert_eq!(filters.specialty, None);
    }

    #[test]
    fn test_parse_round_trip_names() {
        for preset in [SearchPreset::Emergency, SearchPreset::VirtualNow, SearchPreset::HomeVisitToday] {
            assert_eq!(preset.to_string().parse::<SearchPreset>().unwrap(), preset);
        }
        assert_eq!(
            "specialty:Pediatría".parse::<SearchPreset>().unwrap(),
            SearchPreset::Specialty("Pediatría".to_string())
        );
        assert!("weekend".parse::<SearchPreset>().is_err());
        assert!("specialty:".parse::<SearchPreset>().is_err());
    }
}
