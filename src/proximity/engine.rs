//! Radius query engine.
//!
//! The engine is stateless per call: it reads the store and the profile
//! directory, ranks, and returns. Superseded queries are dropped by the
//! consumer, so there is nothing here to cancel.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::consent::is_discoverable;
use super::directory::{CategoryCatalog, ProfileDirectory};
use super::error::{ProximityError, Result};
use super::types::{ProximityQuery, ProximityResult};
use crate::config::ProximityConfig;
use crate::geo::{distance_meters, round_to_tenth, BoundingBox, Coordinate};
use crate::store::{LocationStore, ProviderId};

/// Ranks discoverable providers by distance from an origin.
///
/// # Example
///
/// ```ignore
/// let engine = ProximityEngine::new(store, profiles, &ProximityConfig::default());
/// let results = engine.query(&ProximityQuery::new(origin, 5_000))?;
/// ```
pub struct ProximityEngine {
    store: Arc<LocationStore>,
    profiles: Arc<dyn ProfileDirectory>,
    catalog: Option<Arc<dyn CategoryCatalog>>,
    max_radius_meters: u32,
    max_results: usize,
}

impl std::fmt::Debug for ProximityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityEngine")
            .field("max_radius_meters", &self.max_radius_meters)
            .field("max_results", &self.max_results)
            .field("has_catalog", &self.catalog.is_some())
            .finish_non_exhaustive()
    }
}

/// A candidate that survived the consent gate, filters and radius check.
struct Ranked {
    provider_id: ProviderId,
    distance: f64,
}

impl ProximityEngine {
    /// Creates an engine using the radius and result limits from `config`.
    #[must_use]
    pub fn new(
        store: Arc<LocationStore>,
        profiles: Arc<dyn ProfileDirectory>,
        config: &ProximityConfig,
    ) -> Self {
        Self {
            store,
            profiles,
            catalog: None,
            max_radius_meters: config.max_radius_meters,
            max_results: config.max_results,
        }
    }

    /// Validates `category` filters against a taxonomy.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn CategoryCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Returns discoverable providers within the radius, nearest first.
    ///
    /// Ties are broken by provider id. Distances are compared at full
    /// precision and only rounded in the returned `distance_meters`.
    ///
    /// # Errors
    ///
    /// - [`ProximityError::InvalidArgument`] for a radius outside
    ///   `1..=max_radius_meters`, an invalid origin, or an unknown category
    /// - [`ProximityError::Store`] / [`ProximityError::Directory`] if a
    ///   collaborator fails
    pub fn query(&self, query: &ProximityQuery) -> Result<Vec<ProximityResult>> {
        self.validate(query)?;

        let radius = f64::from(query.radius_meters);
        let bbox = BoundingBox::around(query.origin, radius);

        let candidates: Vec<_> = self
            .store
            .candidates_within(&bbox)?
            .into_iter()
            .filter(is_discoverable)
            .collect();

        debug!(
            "Proximity query radius={}m category={:?} type={:?}: {} candidate(s)",
            query.radius_meters,
            query.category,
            query.provider_type,
            candidates.len()
        );

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ProviderId> = candidates.iter().map(|r| r.provider_id.clone()).collect();
        let mut profiles: HashMap<ProviderId, _> = self
            .profiles
            .fetch_profiles(&ids)?
            .into_iter()
            .filter(|p| p.active)
            .filter(|p| p.matches(query.category.as_deref(), query.provider_type))
            .map(|p| (p.provider_id.clone(), p))
            .collect();

        let mut ranked: Vec<Ranked> = candidates
            .into_iter()
            .filter(|r| profiles.contains_key(&r.provider_id))
            .map(|r| Ranked {
                distance: distance_meters(query.origin, r.coordinates),
                provider_id: r.provider_id,
            })
            .filter(|r| r.distance <= radius)
            .collect();

        ranked.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.provider_id.cmp(&b.provider_id))
        });
        ranked.truncate(self.max_results);

        debug!("Proximity query matched {} provider(s)", ranked.len());

        Ok(ranked
            .into_iter()
            .filter_map(|r| {
                profiles
                    .remove(&r.provider_id)
                    .map(|p| ProximityResult::from_profile(p, round_to_tenth(r.distance)))
            })
            .collect())
    }

    /// Distance from `origin` to one provider, behind the consent gate.
    ///
    /// # Errors
    ///
    /// - [`ProximityError::InvalidArgument`] for an invalid origin
    /// - [`ProximityError::NotFound`] if the provider has no record
    /// - [`ProximityError::LocationUnavailable`] if the provider is not
    ///   sharing a real location
    pub fn distance_to(&self, provider_id: &ProviderId, origin: Coordinate) -> Result<f64> {
        validate_origin(origin)?;

        let record = self
            .store
            .get(provider_id)?
            .ok_or_else(|| ProximityError::NotFound(provider_id.to_string()))?;

        if !is_discoverable(&record) {
            return Err(ProximityError::LocationUnavailable(provider_id.to_string()));
        }

        Ok(round_to_tenth(distance_meters(origin, record.coordinates)))
    }

    fn validate(&self, query: &ProximityQuery) -> Result<()> {
        if query.radius_meters == 0 || query.radius_meters > self.max_radius_meters {
            return Err(ProximityError::InvalidArgument(format!(
                "radius must be in 1..={} meters, got {}",
                self.max_radius_meters, query.radius_meters
            )));
        }

        validate_origin(query.origin)?;

        if let (Some(category), Some(catalog)) = (query.category.as_deref(), &self.catalog) {
            if !catalog.contains(category) {
                return Err(ProximityError::InvalidArgument(format!(
                    "unknown category: {category}"
                )));
            }
        }

        Ok(())
    }
}

fn validate_origin(origin: Coordinate) -> Result<()> {
    let origin = origin
        .validate()
        .map_err(|e| ProximityError::InvalidArgument(format!("origin: {e}")))?;
    if origin.is_unset() {
        return Err(ProximityError::InvalidArgument(
            "origin must not be (0, 0)".to_string(),
        ));
    }
    Ok(())
}
