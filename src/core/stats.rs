use chrono::NaiveTime;

use crate::models::{ConsultationType, DoctorLocation, SearchStats};
use super::{schedule::is_doctor_available_now, visit::can_doctor_visit_home};

/// Aggregate statistics over a result set
///
/// Means are rounded to one decimal place; an empty set yields all zeros.
pub fn compute_search_stats(doctors: &[DoctorLocation], now: NaiveTime) -> SearchStats {
    let total_doctors = doctors.len();
    if total_doctors == 0 {
        return SearchStats::default();
    }

    let available_now = doctors.iter().filter(|d| is_doctor_available_now(d, now)).count();
    let virtual_available = doctors.iter().filter(|d| d.offers(ConsultationType::Virtual)).count();
    let home_visit_available = doctors.iter().filter(|d| can_doctor_visit_home(d)).count();

    let count = total_doctors as f64;
    let average_rating = doctors.iter().map(|d| d.rating).sum::<f64>() / count;
    let average_distance = doctors.iter().map(|d| d.distance.unwrap_or(0.0)).sum::<f64>() / count;

    SearchStats {
        total_doctors,
        available_now,
        virtual_available,
        home_visit_available,
        average_rating: round_one_decimal(average_rating),
        average_distance: round_one_decimal(average_distance),
    }
}

#[inline]
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
