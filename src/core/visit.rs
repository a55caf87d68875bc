use serde::Deserialize;

use crate::models::{ConsultationType, DoctorLocation};

/// Assumptions behind the home-visit arrival estimate
///
/// These are fixed planning figures, not measurements.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TravelModel {
    #[serde(default = "default_average_speed_kmh")]
    pub average_speed_kmh: f64,
    #[serde(default = "default_preparation_minutes")]
    pub preparation_minutes: u32,
}

impl Default for TravelModel {
    fn default() -> Self {
        Self {
            average_speed_kmh: default_average_speed_kmh(),
            preparation_minutes: default_preparation_minutes(),
        }
    }
}

fn default_average_speed_kmh() -> f64 { 25.0 }
fn default_preparation_minutes() -> u32 { 15 }

/// Home visit is possible when offered and the user is inside the service radius
#[inline]
pub fn can_doctor_visit_home(doctor: &DoctorLocation) -> bool {
    if !doctor.offers(ConsultationType::HomeVisit) {
        return false;
    }

    matches!(doctor.distance, Some(km) if km <= doctor.service_radius)
}

/// Estimated minutes until the doctor arrives, 0 when the distance is unknown
#[inline]
pub fn estimated_arrival_minutes(doctor: &DoctorLocation, model: &TravelModel) -> u32 {
    let Some(km) = doctor.distance else {
        return 0;
    };
    if model.average_speed_kmh <= 0.0 {
        return model.preparation_minutes;
    }

    let travel = (km / model.average_speed_kmh * 60.0).round();
    travel as u32 + model.preparation_minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, PriceRange, WorkingHours};

    fn doctor(types: Vec<ConsultationType>, distance: Option<f64>, radius: f64) -> DoctorLocation {
        DoctorLocation {
            id: "doc-3".to_string(),
            doctor_id: "doctor-003".to_string(),
            doctor_name: "Dra. Ana Martínez".to_string(),
            specialty: "Pediatría".to_string(),
            coordinates: Coordinates::new(10.4750, -66.9150),
            avatar: None,
            address: None,
            consultation_types: types,
            working_hours: WorkingHours::parse("07:00", "15:00").unwrap(),
            service_radius: radius,
            price_range: PriceRange::new(30.0, 70.0),
            rating: 4.7,
            is_available: true,
            distance,
        }
    }

    #[test]
    fn test_home_visit_inside_radius() {
        let doc = doctor(vec![ConsultationType::HomeVisit], Some(12.0), 20.0);
        assert!(can_doctor_visit_home(&doc));
    }

    #[test]
    fn test_home_visit_requires_offering() {
        let doc = doctor(vec![ConsultationType::Virtual], Some(1.0), 20.0);
        assert!(!can_doctor_visit_home(&doc));
    }

    #[test]
    fn test_home_visit_outside_radius_or_unknown() {
        assert!(!can_doctor_visit_home(&doctor(vec![ConsultationType::HomeVisit], Some(25.0), 20.0)));
        assert!(!can_doctor_visit_home(&doctor(vec![ConsultationType::HomeVisit], None, 20.0)));
    }

    #[test]
    fn test_eta() {
        let model = TravelModel::default();

        // 10 km at 25 km/h = 24 min, plus 15 preparation
        assert_eq!(estimated_arrival_minutes(&doctor(vec![], Some(10.0), 20.0), &model), 39);
        assert_eq!(estimated_arrival_minutes(&doctor(vec![], Some(0.0), 20.0), &model), 15);
        assert_eq!(estimated_arrival_minutes(&doctor(vec![], None, 20.0), &model), 0);
    }

    #[test]
    fn test_eta_with_custom_model() {
        let model = TravelModel { average_speed_kmh: 60.0, preparation_minutes: 5 };
        assert_eq!(estimated_arrival_minutes(&doctor(vec![], Some(30.0), 20.0), &model), 35);
    }
}
