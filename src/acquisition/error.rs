//! Device location failures.

use thiserror::Error;

/// Why the device could not provide a location.
///
/// None of these are fatal: callers fall back to the configured default
/// location and show the message as an informational notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    /// The user or platform denied location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// No position could be determined.
    #[error("Location unavailable")]
    Unavailable,

    /// The device did not answer within the timeout.
    #[error("Location request timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            AcquisitionError::PermissionDenied.to_string(),
            "Location permission denied"
        );
        assert_eq!(AcquisitionError::Unavailable.to_string(), "Location unavailable");
        assert_eq!(
            AcquisitionError::Timeout.to_string(),
            "Location request timed out"
        );
    }
}
