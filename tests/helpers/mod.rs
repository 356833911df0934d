//! Shared fixtures for the integration tests.
//!
//! Every fixture runs against a real SQLite store (in memory) and the
//! in-memory profile directory. Nothing is mocked below the service.

#![allow(dead_code)]

use std::sync::Arc;

use nearby_core::geo::{Coordinate, EARTH_RADIUS_METERS};
use nearby_core::proximity::{InMemoryProfileDirectory, ProviderProfile, ProviderType};
use nearby_core::store::LocationStore;
use nearby_core::{
    Identity, NearbyRequest, ProviderId, ProximityConfig, ProximityService, UpdateLocationRequest,
};

/// Connaught Place, New Delhi.
pub const DELHI: Coordinate = Coordinate::new(77.2090, 28.6139);

/// A service plus handles to seed it.
pub struct Marketplace {
    pub service: Arc<ProximityService>,
    pub profiles: Arc<InMemoryProfileDirectory>,
}

impl Marketplace {
    pub fn new() -> Self {
        Self::with_config(ProximityConfig::default())
    }

    pub fn with_config(config: ProximityConfig) -> Self {
        let store = Arc::new(LocationStore::in_memory().expect("should open store"));
        let profiles = Arc::new(InMemoryProfileDirectory::new());
        let service = ProximityService::new(store, profiles.clone(), config)
            .expect("config should be valid");
        Self {
            service: Arc::new(service),
            profiles,
        }
    }

    /// Registers a provider profile, writes their location as the provider
    /// and sets their sharing flag.
    pub fn add_provider(&self, profile: ProviderProfile, at: Coordinate, sharing: bool) -> ProviderId {
        let id = profile.provider_id.clone();
        self.profiles.upsert(profile).expect("should store profile");

        let me = Identity::authenticated(id.clone());
        self.service
            .update_location(&me, &id, &update_at(at))
            .expect("should write location");
        self.service
            .set_sharing(&me, &id, sharing)
            .expect("should set sharing");
        id
    }

    /// Ids returned by a nearby query, in order.
    pub fn nearby_ids(&self, request: &NearbyRequest) -> Vec<String> {
        self.service
            .nearby(request)
            .expect("query should succeed")
            .data
            .into_iter()
            .map(|r| r.provider_id.to_string())
            .collect()
    }
}

/// An active provider offering one category.
pub fn provider(id: &str, category: &str, provider_type: ProviderType) -> ProviderProfile {
    let mut profile = ProviderProfile::new(id, format!("Provider {id}"));
    profile.services = vec![category.to_string()];
    profile.categories = vec![category.to_string()];
    profile.provider_type = Some(provider_type);
    profile
}

/// A nearby request around `origin` with an explicit radius.
pub fn nearby_request(origin: Coordinate, max_distance: Option<i64>) -> NearbyRequest {
    NearbyRequest {
        latitude: Some(origin.latitude),
        longitude: Some(origin.longitude),
        max_distance,
        ..NearbyRequest::default()
    }
}

pub fn update_at(at: Coordinate) -> UpdateLocationRequest {
    UpdateLocationRequest {
        latitude: Some(at.latitude),
        longitude: Some(at.longitude),
    }
}

/// The point `meters` due north of `origin` along the meridian.
pub fn north_of(origin: Coordinate, meters: f64) -> Coordinate {
    let degrees = (meters / EARTH_RADIUS_METERS).to_degrees();
    Coordinate::new(origin.longitude, origin.latitude + degrees)
}
