use crate::models::Coordinates;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers (haversine)
///
/// Pure and infallible; identical inputs give identical output.
#[inline]
pub fn calculate_distance(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Geospatial bounding box
///
/// Longitudes stay within [-180, 180]. A box crossing the antimeridian has
/// `min_lon > max_lon`; a box reaching a pole spans every longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.min_lon > self.max_lon
    }
}

/// Calculate a bounding box around a center point
///
/// Used as the coarse pre-filter sent to the directory. Every point within
/// `radius_km` of the center (haversine) lies inside the box.
pub fn calculate_bounding_box(center: Coordinates, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;
    let min_lat = center.latitude - angular.to_degrees();
    let max_lat = center.latitude + angular.to_degrees();

    if min_lat <= -90.0 || max_lat >= 90.0 {
        return BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            min_lon: -180.0,
            max_lon: 180.0,
        };
    }

    let lon_delta = (angular.sin() / center.latitude.to_radians().cos())
        .min(1.0)
        .asin()
        .to_degrees();

    BoundingBox {
        min_lat,
        max_lat,
        min_lon: wrap_longitude(center.longitude - lon_delta),
        max_lon: wrap_longitude(center.longitude + lon_delta),
    }
}

#[inline]
fn wrap_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else if longitude < -180.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: Coordinates, bbox: &BoundingBox) -> bool {
    if point.latitude < bbox.min_lat || point.latitude > bbox.max_lat {
        return false;
    }

    if bbox.crosses_antimeridian() {
        point.longitude >= bbox.min_lon || point.longitude <= bbox.max_lon
    } else {
        point.longitude >= bbox.min_lon && point.longitude <= bbox.max_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_YORK: Coordinates = Coordinates::new(40.7128, -74.0060);
    const LOS_ANGELES: Coordinates = Coordinates::new(34.0522, -118.2437);

    #[test]
    fn test_new_york_to_los_angeles() {
        let distance = calculate_distance(NEW_YORK, LOS_ANGELES);
        assert!((distance - 3935.0).abs() < 5.0, "Distance should be ~3935km, got {}", distance);
    }

    #[test]
    fn test_distance_symmetry() {
        assert_eq!(
            calculate_distance(NEW_YORK, LOS_ANGELES),
            calculate_distance(LOS_ANGELES, NEW_YORK)
        );
    }

    #[test]
    fn test_distance_identity() {
        assert_eq!(calculate_distance(NEW_YORK, NEW_YORK), 0.0);
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        let distance = calculate_distance(a, b);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1.0);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(NEW_YORK, 10.0);

        assert!(bbox.min_lat < NEW_YORK.latitude);
        assert!(bbox.max_lat > NEW_YORK.latitude);
        assert!(bbox.min_lon < NEW_YORK.longitude);
        assert!(bbox.max_lon > NEW_YORK.longitude);

        // Check approximate size (20km / 111km per degree = ~0.18 degrees)
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = calculate_bounding_box(NEW_YORK, 10.0);

        assert!(is_within_bounding_box(NEW_YORK, &bbox));
        assert!(is_within_bounding_box(Coordinates::new(40.71, -74.0), &bbox));
        assert!(!is_within_bounding_box(Coordinates::new(50.0, -80.0), &bbox));
    }

    #[test]
    fn test_bbox_wraps_across_antimeridian() {
        let center = Coordinates::new(0.0, 179.9);
        let across = Coordinates::new(0.0, -179.95);
        let bbox = calculate_bounding_box(center, 25.0);

        assert!(calculate_distance(center, across) < 25.0);
        assert!(bbox.crosses_antimeridian());
        assert!((-180.0..=180.0).contains(&bbox.min_lon));
        assert!((-180.0..=180.0).contains(&bbox.max_lon));
        assert!(is_within_bounding_box(across, &bbox));
        assert!(is_within_bounding_box(center, &bbox));
        assert!(!is_within_bounding_box(Coordinates::new(0.0, 0.0), &bbox));
        assert!(!is_within_bounding_box(Coordinates::new(0.0, -179.0), &bbox));
    }

    #[test]
    fn test_bbox_touching_pole_spans_all_longitudes() {
        let center = Coordinates::new(89.9, 10.0);
        // Just over the pole, on the opposite meridian
        let over_the_pole = Coordinates::new(89.95, -170.0);
        let bbox = calculate_bounding_box(center, 25.0);

        assert!(calculate_distance(center, over_the_pole) < 25.0);
        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!((bbox.min_lon, bbox.max_lon), (-180.0, 180.0));
        assert!(is_within_bounding_box(over_the_pole, &bbox));
    }

    #[test]
    fn test_bbox_covers_the_radius_at_high_latitude() {
        let center = Coordinates::new(70.0, 25.0);
        let bbox = calculate_bounding_box(center, 50.0);

        // Points on the circle at several bearings must fall inside the box
        for bearing in (0..360).step_by(15) {
            let b = (bearing as f64).to_radians();
            let d = 49.9 / EARTH_RADIUS_KM;
            let lat1 = center.latitude.to_radians();
            let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * b.cos()).asin();
            let lon2 = center.longitude.to_radians()
                + (b.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());
            let point = Coordinates::new(lat2.to_degrees(), lon2.to_degrees());

            assert!(is_within_bounding_box(point, &bbox), "bearing {} outside box", bearing);
        }
    }
}
