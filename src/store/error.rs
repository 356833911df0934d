//! Error types for location store operations.

use thiserror::Error;

use crate::geo::GeoError;

/// Error type for location store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error from `SQLite`.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No location record exists for the provider.
    #[error("Location record not found: {0}")]
    NotFound(String),

    /// Coordinates are out of range or not finite.
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(#[from] GeoError),

    /// `(0, 0)` submitted as a regular update instead of an explicit clear.
    #[error("Unset coordinates (0, 0) rejected for provider {0}; use clear instead")]
    UnsetCoordinates(String),

    /// A stored row could not be decoded.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for location store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
