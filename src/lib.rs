//! Nearby Core Library
//!
//! Proximity-based provider discovery for the marketplace: provider location
//! storage, consent-gated sharing, radius-bounded ranking and the client-side
//! query/refresh protocol.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod acquisition;
mod api;
pub mod config;
pub mod geo;
pub mod proximity;
pub mod refresh;
pub mod store;

pub use api::{
    DistanceRequest, DistanceResponse, Identity, LocationStatus, NearbyRequest, NearbyResponse,
    ProximityService, UpdateLocationRequest,
};
pub use config::{ConfigError, ProximityConfig};
pub use geo::Coordinate;
pub use store::ProviderId;
