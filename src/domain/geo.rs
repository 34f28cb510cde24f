/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two WGS84 coordinates, in kilometers.
///
/// Haversine formula:
/// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
/// c = 2·atan2(√a, √(1−a))
/// d = R·c
///
/// Inputs are degrees. Callers validate presence and numeric range before
/// invoking; this function has no error cases for finite inputs.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round a distance to 2 decimal places for API responses. Raw precision is
/// kept for sorting; only the wire representation is rounded.
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let d = haversine_km(28.6139, 77.2090, 28.6139, 77.2090);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = haversine_km(28.6139, 77.2090, 19.0760, 72.8777);
        let b = haversine_km(19.0760, 72.8777, 28.6139, 77.2090);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_half_degree_of_latitude() {
        // 0.5 degrees of latitude is roughly 55.5 km
        let d = haversine_km(28.0, 77.0, 28.5, 77.0);
        assert!((d - 55.5).abs() < 0.2, "got {}", d);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(12.3456), 12.35);
        assert_eq!(round_km(5.004), 5.0);
        assert_eq!(round_km(0.0), 0.0);
    }
}
