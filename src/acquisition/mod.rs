//! Device location acquisition.
//!
//! The device is an unreliable dependency: it may deny permission, fail to
//! fix a position, or never answer. [`acquire_or_default`] turns all three
//! into a usable origin (the configured default) plus an informational
//! notice, so discovery keeps working with degraded accuracy.
//!
//! ```
//! use std::time::Duration;
//!
//! use nearby_core::acquisition::{acquire_or_default, FixedLocationSource};
//! use nearby_core::geo::Coordinate;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let here = Coordinate::new(72.8777, 19.0760);
//! let default = Coordinate::new(77.2090, 28.6139);
//!
//! let acquired = acquire_or_default(&FixedLocationSource(here), Duration::from_secs(10), default).await;
//! assert_eq!(acquired.coordinate, here);
//! assert!(acquired.notice().is_none());
//! # });
//! ```

mod error;
mod source;

pub use error::AcquisitionError;
#[cfg(any(test, feature = "test-utils"))]
pub use source::testing;
pub use source::{
    acquire_current_location, acquire_or_default, fallback_notice, stale_location_notice, Acquired,
    FixedLocationSource, LocationSource,
};
