//! Great-circle distance and radius bounding boxes.
//!
//! Earth is treated as a sphere. The error against the WGS84 ellipsoid is
//! below 0.5%, which is fine for ranking nearby providers.

use super::coordinate::Coordinate;

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Padding added to every bounding box edge (~0.1 m).
const BOX_MARGIN_DEGREES: f64 = 1e-6;

/// Computes the Haversine distance between two coordinates in meters.
///
/// Symmetric, and exactly `0.0` for identical inputs. The intermediate term is
/// clamped to `[0, 1]` so antipodal points do not produce NaN.
///
/// # Examples
///
/// ```
/// use nearby_core::geo::{distance_meters, Coordinate};
///
/// let delhi = Coordinate::new(77.2090, 28.6139);
/// let agra = Coordinate::new(78.0081, 27.1767);
///
/// let km = distance_meters(delhi, agra) / 1000.0;
/// assert!((km - 178.0).abs() < 5.0);
/// ```
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Rounds a distance to one decimal place for display.
#[must_use]
pub fn round_to_tenth(meters: f64) -> f64 {
    (meters * 10.0).round() / 10.0
}

/// A latitude band plus one or two longitude ranges enclosing a radius.
///
/// Every point within `radius` of the center lies inside the box. The box is
/// larger than the circle, so it only narrows the candidate pool; exact
/// filtering still uses [`distance_meters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge in degrees.
    pub min_latitude: f64,
    /// Northern edge in degrees.
    pub max_latitude: f64,
    /// Primary longitude range `(west, east)`.
    pub longitudes: (f64, f64),
    /// Second range when the box crosses the antimeridian.
    pub wrapped_longitudes: Option<(f64, f64)>,
}

impl BoundingBox {
    /// Computes the box around `center` for a radius in meters.
    ///
    /// Near the poles (or when the radius reaches one) the longitude range
    /// widens to the full `-180.0..=180.0`.
    #[must_use]
    pub fn around(center: Coordinate, radius_meters: f64) -> Self {
        let angular = radius_meters.max(0.0) / EARTH_RADIUS_METERS;
        let lat_delta = angular.to_degrees() + BOX_MARGIN_DEGREES;

        let min_latitude = center.latitude - lat_delta;
        let max_latitude = center.latitude + lat_delta;

        if min_latitude <= -90.0 || max_latitude >= 90.0 {
            return Self {
                min_latitude: min_latitude.max(-90.0),
                max_latitude: max_latitude.min(90.0),
                longitudes: (-180.0, 180.0),
                wrapped_longitudes: None,
            };
        }

        let ratio = angular.sin() / center.latitude.to_radians().cos();
        if !ratio.is_finite() || ratio >= 1.0 {
            return Self {
                min_latitude,
                max_latitude,
                longitudes: (-180.0, 180.0),
                wrapped_longitudes: None,
            };
        }

        let lon_delta = ratio.asin().to_degrees() + BOX_MARGIN_DEGREES;
        let west = center.longitude - lon_delta;
        let east = center.longitude + lon_delta;

        let (longitudes, wrapped_longitudes) = if west < -180.0 {
            ((west + 360.0, 180.0), Some((-180.0, east)))
        } else if east > 180.0 {
            ((west, 180.0), Some((-180.0, east - 360.0)))
        } else {
            ((west, east), None)
        };

        Self {
            min_latitude,
            max_latitude,
            longitudes,
            wrapped_longitudes,
        }
    }

    /// Returns whether a coordinate falls inside the box.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        let in_range = |(west, east): (f64, f64)| (west..=east).contains(&point.longitude);
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (in_range(self.longitudes) || self.wrapped_longitudes.is_some_and(in_range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELHI: Coordinate = Coordinate::new(77.2090, 28.6139);

    #[test]
    fn identical_points_are_zero_apart() {
        assert!(distance_meters(DELHI, DELHI).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let mumbai = Coordinate::new(72.8777, 19.0760);
        let there = distance_meters(DELHI, mumbai);
        let back = distance_meters(mumbai, DELHI);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn london_to_paris_is_about_344_km() {
        let london = Coordinate::new(-0.1278, 51.5074);
        let paris = Coordinate::new(2.3522, 48.8566);
        let km = distance_meters(london, paris) / 1000.0;
        assert!((km - 343.5).abs() < 3.0, "got {km}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let a = Coordinate::new(0.0, 45.0);
        let b = Coordinate::new(180.0, -45.0);
        let d = distance_meters(a, b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }

    #[test]
    fn round_to_tenth_keeps_one_decimal() {
        assert!((round_to_tenth(1234.56) - 1234.6).abs() < 1e-9);
        assert!((round_to_tenth(0.04) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_contains_points_on_radius() {
        let bbox = BoundingBox::around(DELHI, 20_000.0);
        // ~19.9 km due north and due east
        assert!(bbox.contains(Coordinate::new(77.2090, 28.7929)));
        assert!(bbox.contains(Coordinate::new(77.4131, 28.6139)));
        // ~30 km north
        assert!(!bbox.contains(Coordinate::new(77.2090, 28.8839)));
    }

    #[test]
    fn bounding_box_splits_across_antimeridian() {
        let fiji = Coordinate::new(179.99, -17.7);
        let bbox = BoundingBox::around(fiji, 10_000.0);
        assert!(bbox.wrapped_longitudes.is_some());
        assert!(bbox.contains(Coordinate::new(-179.99, -17.7)));
        assert!(bbox.contains(Coordinate::new(179.95, -17.7)));
        assert!(!bbox.contains(Coordinate::new(0.0, -17.7)));
    }

    #[test]
    fn bounding_box_near_pole_spans_all_longitudes() {
        let bbox = BoundingBox::around(Coordinate::new(10.0, 89.99), 5_000.0);
        assert_eq!(bbox.longitudes, (-180.0, 180.0));
        assert!(bbox.contains(Coordinate::new(-170.0, 89.995)));
    }
}
