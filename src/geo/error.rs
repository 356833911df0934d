//! Error types for coordinate validation.

use thiserror::Error;

/// Errors raised when a coordinate cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude is NaN, infinite, or outside `-90.0..=90.0`.
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude is NaN, infinite, or outside `-180.0..=180.0`.
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),
}
