//! Great-circle distance between two coordinates.
//!
//! Uses the Haversine formula on a sphere of radius 6 371 km.

use warmer_location::Coordinate;

/// Earth's mean radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters
pub fn distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{HaversineDistance, Point};

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_zero_distance() {
        for c in [coord(0.0, 0.0), coord(52.52, 13.405), coord(-90.0, 180.0)] {
            assert_eq!(distance(&c, &c), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (coord(10.0, 20.0), coord(10.001, 20.002)),
            (coord(40.7128, -74.0060), coord(34.0522, -118.2437)),
            (coord(-33.8688, 151.2093), coord(51.5074, -0.1278)),
        ];
        for (a, b) in pairs {
            assert_eq!(distance(&a, &b), distance(&b, &a));
        }
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = distance(&coord(0.0, 0.0), &coord(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let d = distance(&coord(0.0, 0.0), &coord(0.0, 180.0));
        assert!(d.is_finite());
        assert_relative_eq!(d, std::f64::consts::PI * EARTH_RADIUS_M, max_relative = 1e-9);

        let d = distance(&coord(90.0, 0.0), &coord(-90.0, 0.0));
        assert_relative_eq!(d, std::f64::consts::PI * EARTH_RADIUS_M, max_relative = 1e-9);
    }

    #[test]
    fn test_agrees_with_geo() {
        // geo uses a slightly larger mean radius (6 371 008.8 m)
        let nyc = coord(40.7128, -74.0060);
        let la = coord(34.0522, -118.2437);

        let ours = distance(&nyc, &la);
        let theirs = Point::from(nyc).haversine_distance(&Point::from(la));
        assert_relative_eq!(ours, theirs, max_relative = 1e-5);
        assert!((ours - 3_936_000.0).abs() < 50_000.0);
    }
}
