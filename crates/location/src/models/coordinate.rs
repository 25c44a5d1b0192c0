//! Validated geographic coordinates.
//!
//! A [`Coordinate`] can only be built from finite values inside
//! latitude [-90, 90] and longitude [-180, 180]. Everything downstream relies
//! on that, so distance math never has to re-check its inputs.

use std::fmt;

use geo::Point;

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("Coordinate values must be finite numbers")]
    NotFinite,

    #[error("Latitude {0} is outside -90 to 90")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside -180 to 180")]
    LongitudeOutOfRange(f64),
}

/// WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// (latitude, longitude) in radians
    pub fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

impl From<Coordinate> for Point {
    fn from(c: Coordinate) -> Self {
        Point::new(c.longitude, c.latitude)
    }
}

impl TryFrom<Point> for Coordinate {
    type Error = CoordinateError;

    fn try_from(point: Point) -> Result<Self, Self::Error> {
        Coordinate::new(point.y(), point.x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.01),
            Err(CoordinateError::LongitudeOutOfRange(-180.01))
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(Coordinate::new(f64::NAN, 0.0), Err(CoordinateError::NotFinite));
        assert_eq!(
            Coordinate::new(0.0, f64::INFINITY),
            Err(CoordinateError::NotFinite)
        );
    }

    #[test]
    fn test_point_conversion_swaps_axes() {
        let c = Coordinate::new(40.7128, -74.0060).unwrap();
        let p: Point = c.into();
        assert_eq!(p.x(), -74.0060);
        assert_eq!(p.y(), 40.7128);

        let back = Coordinate::try_from(p).unwrap();
        assert_eq!(back, c);

        // geo points carry no range checks of their own
        assert!(Coordinate::try_from(Point::new(0.0, 120.0)).is_err());
    }

    #[test]
    fn test_display() {
        let c = Coordinate::new(10.0, 20.5).unwrap();
        assert_eq!(format!("{}", c), "10.000000, 20.500000");
    }
}
