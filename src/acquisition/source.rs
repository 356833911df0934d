//! Location sources and timeout handling.

use std::future::Future;
use std::time::Duration;

use log::warn;

use super::error::AcquisitionError;
use crate::geo::Coordinate;

/// A device capability that reports the current position.
///
/// Implemented by platform bridges (browser geolocation, mobile location
/// services). Implementations report failures through the three
/// [`AcquisitionError`] variants and need not enforce a timeout themselves.
pub trait LocationSource: Send + Sync {
    /// Asks the device for its current coordinates.
    fn current_location(&self) -> impl Future<Output = Result<Coordinate, AcquisitionError>> + Send;
}

/// A source that always reports the same coordinate, e.g. a location the
/// user picked manually.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationSource(pub Coordinate);

impl LocationSource for FixedLocationSource {
    async fn current_location(&self) -> Result<Coordinate, AcquisitionError> {
        Ok(self.0)
    }
}

/// The outcome of [`acquire_or_default`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acquired {
    /// Device coordinate, or the default when acquisition failed.
    pub coordinate: Coordinate,
    /// Set when `coordinate` is the fallback.
    pub fallback: Option<AcquisitionError>,
}

impl Acquired {
    /// Returns whether the default location is in use.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Informational, non-blocking message for the user when degraded.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.fallback.map(fallback_notice)
    }
}

/// User-facing text for a fall back to the default location.
#[must_use]
pub fn fallback_notice(reason: AcquisitionError) -> String {
    format!(
        "{}. Showing providers near the default location.",
        reason_text(reason)
    )
}

/// User-facing text for a refresh that kept the previous location.
#[must_use]
pub fn stale_location_notice(reason: AcquisitionError) -> String {
    format!(
        "{}. Showing providers near your last known location.",
        reason_text(reason)
    )
}

const fn reason_text(reason: AcquisitionError) -> &'static str {
    match reason {
        AcquisitionError::PermissionDenied => "Location access was denied",
        AcquisitionError::Unavailable => "Your location could not be determined",
        AcquisitionError::Timeout => "Getting your location took too long",
    }
}

/// Gets the current location, giving up after `timeout`.
///
/// A reported coordinate that is out of range or equal to the reserved
/// `(0, 0)` counts as [`AcquisitionError::Unavailable`].
///
/// # Errors
///
/// Returns the source's error, or [`AcquisitionError::Timeout`].
pub async fn acquire_current_location<S: LocationSource>(
    source: &S,
    timeout: Duration,
) -> Result<Coordinate, AcquisitionError> {
    match tokio::time::timeout(timeout, source.current_location()).await {
        Ok(Ok(coordinate)) => match coordinate.validate() {
            Ok(c) if !c.is_unset() => Ok(c),
            _ => Err(AcquisitionError::Unavailable),
        },
        Ok(Err(e)) => Err(e),
        Err(_) => Err(AcquisitionError::Timeout),
    }
}

/// Gets the current location, falling back to `default` on any failure.
pub async fn acquire_or_default<S: LocationSource>(
    source: &S,
    timeout: Duration,
    default: Coordinate,
) -> Acquired {
    match acquire_current_location(source, timeout).await {
        Ok(coordinate) => Acquired {
            coordinate,
            fallback: None,
        },
        Err(reason) => {
            warn!("Location acquisition failed ({reason}); using default location");
            Acquired {
                coordinate: default,
                fallback: Some(reason),
            }
        }
    }
}

/// Sources for exercising failure paths in tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::future::Future;

    use super::{AcquisitionError, Coordinate, LocationSource};

    /// A source that always fails with the given error.
    #[derive(Debug, Clone, Copy)]
    pub struct FailingLocationSource(pub AcquisitionError);

    impl LocationSource for FailingLocationSource {
        async fn current_location(&self) -> Result<Coordinate, AcquisitionError> {
            Err(self.0)
        }
    }

    /// A source that never answers.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PendingLocationSource;

    impl LocationSource for PendingLocationSource {
        fn current_location(
            &self,
        ) -> impl Future<Output = Result<Coordinate, AcquisitionError>> + Send {
            std::future::pending()
        }
    }
}
