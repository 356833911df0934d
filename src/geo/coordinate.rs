//! Coordinate type.

use serde::{Deserialize, Serialize};

use super::error::GeoError;

/// Geohash length stored alongside every location record.
///
/// Precision 8 is a ~38m x 19m cell.
pub const GEOHASH_PRECISION: usize = 8;

/// Geohash length of the coarse area cell shown to a provider (~4.9km x 4.9km).
pub const AREA_GEOHASH_PRECISION: usize = 5;

/// A point on Earth's surface as a `(longitude, latitude)` pair in degrees.
///
/// The origin `(0, 0)` is reserved as "unset": it marks a provider that has
/// never written a location (or explicitly cleared it) and is never a valid
/// place to match against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees, `-180.0..=180.0`.
    pub longitude: f64,
    /// Latitude in degrees, `-90.0..=90.0`.
    pub latitude: f64,
}

impl Coordinate {
    /// The reserved "no location" value.
    pub const UNSET: Self = Self {
        longitude: 0.0,
        latitude: 0.0,
    };

    /// Creates a coordinate from longitude and latitude (in that order).
    ///
    /// No validation is performed; see [`Coordinate::validate`].
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns whether this is the reserved `(0, 0)` "unset" value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unset(&self) -> bool {
        self.longitude == 0.0 && self.latitude == 0.0
    }

    /// Checks that both components are finite and in range.
    ///
    /// `(0, 0)` passes this check; callers that need a real location must
    /// additionally check [`Coordinate::is_unset`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] naming the first out-of-range component.
    pub fn validate(self) -> Result<Self, GeoError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeoError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeoError::InvalidLongitude(self.longitude));
        }
        Ok(self)
    }

    /// Encodes this coordinate as a geohash of the given length.
    ///
    /// Returns an empty string for the unset value or if encoding fails
    /// (out-of-range input).
    #[must_use]
    pub fn geohash(&self, precision: usize) -> String {
        if self.is_unset() {
            return String::new();
        }
        geohash::encode(
            geohash::Coord {
                x: self.longitude,
                y: self.latitude,
            },
            precision,
        )
        .unwrap_or_default()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_longitude_first() {
        let c = Coordinate::new(77.2090, 28.6139);
        assert!((c.longitude - 77.2090).abs() < f64::EPSILON);
        assert!((c.latitude - 28.6139).abs() < f64::EPSILON);
    }

    #[test]
    fn origin_is_unset() {
        assert!(Coordinate::UNSET.is_unset());
        assert!(Coordinate::new(0.0, 0.0).is_unset());
        assert!(Coordinate::new(-0.0, 0.0).is_unset());
    }

    #[test]
    fn single_zero_component_is_not_unset() {
        assert!(!Coordinate::new(0.0, 51.4779).is_unset());
        assert!(!Coordinate::new(32.5, 0.0).is_unset());
    }

    #[test]
    fn validate_accepts_boundaries() {
        assert!(Coordinate::new(180.0, 90.0).validate().is_ok());
        assert!(Coordinate::new(-180.0, -90.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_latitude() {
        assert_eq!(
            Coordinate::new(10.0, 90.5).validate(),
            Err(GeoError::InvalidLatitude(90.5))
        );
    }

    #[test]
    fn validate_rejects_out_of_range_longitude() {
        assert_eq!(
            Coordinate::new(-180.5, 10.0).validate(),
            Err(GeoError::InvalidLongitude(-180.5))
        );
    }

    #[test]
    fn validate_rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 10.0).validate().is_err());
        assert!(Coordinate::new(10.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn geohash_has_requested_length() {
        let c = Coordinate::new(77.2090, 28.6139);
        assert_eq!(c.geohash(GEOHASH_PRECISION).len(), GEOHASH_PRECISION);
        assert!(c.geohash(8).starts_with(&c.geohash(5)));
    }

    #[test]
    fn geohash_of_unset_is_empty() {
        assert!(Coordinate::UNSET.geohash(GEOHASH_PRECISION).is_empty());
    }

    #[test]
    fn display_is_longitude_then_latitude() {
        assert_eq!(Coordinate::new(1.5, -2.25).to_string(), "(1.5, -2.25)");
    }
}
