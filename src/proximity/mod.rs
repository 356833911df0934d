//! Proximity matching: consent-gated radius queries ranked by distance.
//!
//! # Query pipeline
//!
//! ```text
//! ProximityQuery
//!     ├── validate radius / origin / category
//!     ├── LocationStore::candidates_within(bounding box)   spatial pre-filter
//!     ├── consent::is_discoverable                         sharing && location set
//!     ├── ProfileDirectory::fetch_profiles                 active + category + type
//!     ├── Haversine distance, drop > radius
//!     └── sort (distance, provider_id), truncate, round for display
//! ```
//!
//! # Types
//!
//! - [`ProximityQuery`]: origin, radius and optional filters
//! - [`ProximityResult`]: a ranked provider with display attributes
//! - [`ProviderProfile`]: attributes read from the profile collaborator

pub mod consent;
mod directory;
mod engine;
mod error;
pub mod types;

pub use consent::is_discoverable;
pub use directory::{
    CategoryCatalog, InMemoryProfileDirectory, ProfileDirectory, StaticCategoryCatalog,
};
pub use engine::ProximityEngine;
pub use error::{ProximityError, Result};
pub use types::{ProviderProfile, ProviderType, ProximityQuery, ProximityResult};
