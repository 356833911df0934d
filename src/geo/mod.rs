//! Geographic primitives for provider discovery.
//!
//! Provides:
//! - [`Coordinate`]: a validated `(longitude, latitude)` pair where `(0, 0)`
//!   is reserved as "unset"
//! - Haversine great-circle distance in meters
//! - [`BoundingBox`]: a conservative lat/lon box around a radius, used to
//!   pre-filter candidates before exact distance checks
//!
//! # Example Usage
//!
//! ```
//! use nearby_core::geo::{distance_meters, Coordinate};
//!
//! let connaught_place = Coordinate::new(77.2167, 28.6315);
//! let india_gate = Coordinate::new(77.2295, 28.6129);
//!
//! let meters = distance_meters(connaught_place, india_gate);
//! assert!(meters > 2_000.0 && meters < 2_600.0);
//! assert_eq!(distance_meters(india_gate, india_gate), 0.0);
//! ```

mod coordinate;
mod distance;
mod error;

pub use coordinate::{Coordinate, AREA_GEOHASH_PRECISION, GEOHASH_PRECISION};
pub use distance::{distance_meters, round_to_tenth, BoundingBox, EARTH_RADIUS_METERS};
pub use error::GeoError;
