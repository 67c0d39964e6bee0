/// Mean Earth radius in meters (WGS-84).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two (lat, lon) points
/// given in decimal degrees, via the haversine formula.
///
/// Distances in this domain are local (a few km at most), so no
/// antipodal special-casing is needed.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Render a distance for user-facing messages: meters below 1 km,
/// kilometers with two decimals above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

/// Check-in/out location stored as a fixed-precision "lat,lon" string.
pub fn location_string(lat: f64, lon: f64) -> String {
    format!("{:.6},{:.6}", lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        assert!(haversine_distance_m(12.9716, 77.5946, 12.9716, 77.5946) < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let d1 = haversine_distance_m(12.9716, 77.5946, 12.9816, 77.5946);
        let d2 = haversine_distance_m(12.9816, 77.5946, 12.9716, 77.5946);
        assert!((d1 - d2).abs() / d1 < 1e-6);
    }

    #[test]
    fn nearby_point_is_about_22_m() {
        // 0.0002 deg of latitude is roughly 22 m
        let d = haversine_distance_m(12.9716, 77.5946, 12.9718, 77.5946);
        assert!(d > 20.0 && d < 25.0, "got {}", d);
    }

    #[test]
    fn far_point_is_about_1_1_km() {
        let d = haversine_distance_m(12.9716, 77.5946, 12.9816, 77.5946);
        assert!(d > 1050.0 && d < 1150.0, "got {}", d);
    }

    #[test]
    fn formats_meters_below_1km() {
        assert_eq!(format_distance(22.4), "22 m");
        assert_eq!(format_distance(999.4), "999 m");
    }

    #[test]
    fn formats_km_with_two_decimals() {
        assert_eq!(format_distance(1112.0), "1.11 km");
        assert_eq!(format_distance(1000.0), "1.00 km");
    }

    #[test]
    fn location_string_has_six_decimals() {
        assert_eq!(location_string(12.9716, 77.5946), "12.971600,77.594600");
        assert_eq!(location_string(-1.5, 103.0), "-1.500000,103.000000");
    }
}
