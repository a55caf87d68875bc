use chrono::NaiveTime;

use crate::models::{Availability, DoctorLocation, SearchFilters};
use super::schedule::is_doctor_available_now;

/// Check a distance-annotated doctor against every filter dimension
///
/// This is the client-side pass run after the directory query, so the
/// result honors the filters whatever the directory enforced. A doctor
/// without a computed distance never passes the distance check.
#[inline]
pub fn matches_filters(doctor: &DoctorLocation, filters: &SearchFilters, now: NaiveTime) -> bool {
    // Distance
    match doctor.distance {
        Some(km) if km <= filters.max_distance => {}
        _ => return false,
    }

    // Specialty
    if let Some(specialty) = &filters.specialty {
        if &doctor.specialty != specialty {
            return false;
        }
    }

    // Consultation type
    if let Some(consultation) = filters.consultation_type {
        if !doctor.offers(consultation) {
            return false;
        }
    }

    // Rating floor
    if doctor.rating < filters.rating {
        return false;
    }

    // Price range overlap
    if !doctor.price_range.overlaps(&filters.price_range) {
        return false;
    }

    matches_availability(doctor, filters.availability, now)
}

/// `now` needs the working-hours window; `today` and `this_week` only the
/// provider's on/off switch, since the directory carries no calendar.
#[inline]
pub fn matches_availability(
    doctor: &DoctorLocation,
    availability: Option<Availability>,
    now: NaiveTime,
) -> bool {
    match availability {
        None => true,
        Some(Availability::Now) => is_doctor_available_now(doctor, now),
        Some(Availability::Today) | Some(Availability::ThisWeek) => doctor.is_available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsultationType, Coordinates, PriceRange, WorkingHours};

    fn doctor(specialty: &str, distance: Option<f64>) -> DoctorLocation {
        DoctorLocation {
            id: "doc-1".to_string(),
            doctor_id: "doctor-001".to_string(),
            doctor_name: "Dr. Test".to_string(),
            specialty: specialty.to_string(),
            coordinates: Coordinates::new(10.48, -66.90),
            avatar: None,
            address: None,
            consultation_types: vec![ConsultationType::Virtual, ConsultationType::InPerson],
            working_hours: WorkingHours::parse("08:00", "17:00").unwrap(),
            service_radius: 10.0,
            price_range: PriceRange::new(60.0, 120.0),
            rating: 4.2,
            is_available: true,
            distance,
        }
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_filters_accept_nearby_doctor() {
        let filters = SearchFilters::default();
        assert!(matches_filters(&doctor("Cardiología", Some(3.0)), &filters, noon()));
    }

    #[test]
    fn test_distance_limit() {
        let filters = SearchFilters::default();
        assert!(!matches_filters(&doctor("Cardiología", Some(30.0)), &filters, noon()));
        assert!(!matches_filters(&doctor("Cardiología", None), &filters, noon()));
    }

    #[test]
    fn test_specialty_and_consultation() {
        let filters = SearchFilters {
            specialty: Some("Pediatría".to_string()),
            ..SearchFilters::default()
        };
        assert!(!matches_filters(&doctor("Cardiología", Some(3.0)), &filters, noon()));

        let filters = SearchFilters {
            consultation_type: Some(ConsultationType::HomeVisit),
            ..SearchFilters::default()
        };
        assert!(!matches_filters(&doctor("Cardiología", Some(3.0)), &filters, noon()));
    }

    #[test]
    fn test_rating_floor_and_price() {
        let filters = SearchFilters {
            rating: 4.5,
            ..SearchFilters::default()
        };
        assert!(!matches_filters(&doctor("Cardiología", Some(3.0)), &filters, noon()));

        let filters = SearchFilters {
            price_range: PriceRange::new(0.0, 30.0),
            ..SearchFilters::default()
        };
        assert!(!matches_filters(&doctor("Cardiología", Some(3.0)), &filters, noon()));
    }

    #[test]
    fn test_availability_now_uses_working_hours() {
        let doc = doctor("Cardiología", Some(3.0));
        let evening = NaiveTime::from_hms_opt(20, 0, 0).unwrap();

        assert!(matches_availability(&doc, Some(Availability::Now), noon()));
        assert!(!matches_availability(&doc, Some(Availability::Now), evening));
        assert!(matches_availability(&doc, Some(Availability::Today), evening));
    }

    #[test]
    fn test_switched_off_doctor_fails_every_availability() {
        let mut doc = doctor("Cardiología", Some(3.0));
        doc.is_available = false;

        assert!(!matches_availability(&doc, Some(Availability::Now), noon()));
        assert!(!matches_availability(&doc, Some(Availability::Today), noon()));
        assert!(!matches_availability(&doc, Some(Availability::ThisWeek), noon()));
        assert!(matches_availability(&doc, None, noon()));
    }
}
