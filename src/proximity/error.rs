//! Error types for proximity operations.
//!
//! `InvalidArgument` and `Unauthorized` are terminal for the request and are
//! never retried. `NotFound` is only raised by direct lookups; the query path
//! turns missing data into an empty result.

use thiserror::Error;

use crate::store::StoreError;

/// Error type for proximity queries and location writes.
#[derive(Error, Debug)]
pub enum ProximityError {
    /// Malformed or out-of-range parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No location record (or profile) for the provider.
    #[error("Provider not found: {0}")]
    NotFound(String),

    /// The provider exists but is not sharing a location.
    #[error("Provider location not available: {0}")]
    LocationUnavailable(String),

    /// Caller is not the owner of the record.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Profile collaborator failed.
    #[error("Profile lookup failed: {0}")]
    Directory(String),

    /// Location store failed.
    #[error("Store error: {0}")]
    Store(StoreError),
}

/// Result type alias for proximity operations.
pub type Result<T> = std::result::Result<T, ProximityError>;

impl From<StoreError> for ProximityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::InvalidCoordinates(_) | StoreError::UnsetCoordinates(_) => {
                Self::InvalidArgument(err.to_string())
            }
            other => Self::Store(other),
        }
    }
}
