use std::cmp::Ordering;

use crate::models::{DoctorLocation, SortCriteria};

/// Sort doctors in place by the given criteria
///
/// The sort is stable, so ties keep their previous relative order.
/// - `Distance`: ascending, doctors without a distance last
/// - `Rating`: descending
/// - `Price`: ascending by the low end of the price range
pub fn sort_doctors(doctors: &mut [DoctorLocation], criteria: SortCriteria) {
    match criteria {
        SortCriteria::Distance => doctors.sort_by(|a, b| compare_distance(a.distance, b.distance)),
        SortCriteria::Rating => doctors.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortCriteria::Price => {
            doctors.sort_by(|a, b| a.price_range.min.total_cmp(&b.price_range.min))
        }
    }
}

/// Return a sorted copy, leaving the input untouched
pub fn sorted_doctors(doctors: &[DoctorLocation], criteria: SortCriteria) -> Vec<DoctorLocation> {
    let mut sorted = doctors.to_vec();
    sort_doctors(&mut sorted, criteria);
    sorted
}

#[inline]
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
