//! Provider location records.
//!
//! One record per provider holding their current coordinates, the
//! location-sharing consent flag and the server-side time of the last
//! coordinate write. Records are only ever mutated by the owning provider's
//! explicit actions; authorization is enforced one layer up.
//!
//! # Architecture
//!
//! ```text
//! LocationStore (SQLite)
//!     └── provider_locations
//!           index (sharing_enabled, latitude, longitude) for radius pre-filtering
//! ```
//!
//! # Write ordering
//!
//! Timestamps come from the server clock, never from the client. Coordinate
//! writes are last-write-wins keyed on that timestamp, so a delayed write can
//! never replace a fresher location.

mod error;
mod storage;
mod types;

pub use error::{Result, StoreError};
pub use storage::LocationStore;
pub use types::{LocationRecord, ProviderId};
