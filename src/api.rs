//! Endpoint surface of the proximity service.
//!
//! Request/response shapes here are the only contract that map views,
//! provider lists and order screens may depend on. Writes require the caller
//! to be authenticated as the provider whose record is touched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ProximityConfig};
use crate::geo::{Coordinate, AREA_GEOHASH_PRECISION};
use crate::proximity::{
    CategoryCatalog, ProfileDirectory, ProviderType, ProximityEngine, ProximityError,
    ProximityQuery, ProximityResult, Result,
};
use crate::store::{LocationRecord, LocationStore, ProviderId};

/// The authenticated caller, as established by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    provider_id: ProviderId,
}

impl Identity {
    /// Wraps an identity the auth layer has already verified.
    #[must_use]
    pub fn authenticated(provider_id: impl Into<ProviderId>) -> Self {
        Self {
            provider_id: provider_id.into(),
        }
    }

    /// The caller's provider id.
    #[must_use]
    pub const fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn ensure_owner(&self, target: &ProviderId) -> Result<()> {
        if &self.provider_id == target {
            Ok(())
        } else {
            warn!(
                "Rejected location write by {} on record of {target}",
                self.provider_id
            );
            Err(ProximityError::Unauthorized(format!(
                "{} cannot modify the location of {target}",
                self.provider_id
            )))
        }
    }
}

/// Query parameters of the nearby endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRequest {
    /// Origin latitude. Required.
    pub latitude: Option<f64>,
    /// Origin longitude. Required.
    pub longitude: Option<f64>,
    /// Radius in meters; the configured default when absent.
    pub max_distance: Option<i64>,
    /// Exact service category.
    pub category: Option<String>,
    /// `"Technical"` or `"Non-Technical"`.
    pub provider_type: Option<String>,
}

/// Ranked providers plus their count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyResponse {
    /// Number of entries in `data`.
    pub count: usize,
    /// Providers ordered by ascending distance.
    pub data: Vec<ProximityResult>,
}

/// Body of the coordinate update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLocationRequest {
    /// New latitude. Required.
    pub latitude: Option<f64>,
    /// New longitude. Required.
    pub longitude: Option<f64>,
}

/// Query parameters of the point-to-point distance endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceRequest {
    /// Requester latitude. Required.
    pub latitude: Option<f64>,
    /// Requester longitude. Required.
    pub longitude: Option<f64>,
}

/// How far the requester is from one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResponse {
    /// Provider identifier.
    pub provider_id: ProviderId,
    /// Provider display name.
    pub provider_name: String,
    /// Distance rounded to one decimal.
    pub distance_meters: f64,
}

/// A provider's view of their own location settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStatus {
    /// Provider identifier.
    pub provider_id: ProviderId,
    /// Current coordinates; `None` when cleared.
    pub coordinates: Option<Coordinate>,
    /// Coarse geohash cell around the stored location; `None` when cleared.
    pub area_cell: Option<String>,
    /// Consent flag.
    pub sharing_enabled: bool,
    /// Server time of the last coordinate write.
    pub last_updated_at: DateTime<Utc>,
    /// e.g. `"Last updated: 5 minutes ago"`.
    pub last_updated_label: String,
}

impl LocationStatus {
    fn from_record(record: LocationRecord, now: DateTime<Utc>) -> Self {
        Self {
            last_updated_label: record.last_updated_label(now),
            area_cell: record.area_cell(AREA_GEOHASH_PRECISION),
            coordinates: record.has_location().then_some(record.coordinates),
            provider_id: record.provider_id,
            sharing_enabled: record.sharing_enabled,
            last_updated_at: record.last_updated_at,
        }
    }
}

/// Proximity service: the store, the engine and the profile collaborator
/// behind one set of endpoints.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use nearby_core::proximity::{InMemoryProfileDirectory, ProviderProfile};
/// use nearby_core::store::LocationStore;
/// use nearby_core::{Identity, NearbyRequest, ProximityConfig, ProximityService, UpdateLocationRequest};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = Arc::new(LocationStore::open(&dir.path().join("locations.db")).unwrap());
/// let profiles = Arc::new(InMemoryProfileDirectory::new());
/// profiles.upsert(ProviderProfile::new("p1", "Asha")).unwrap();
///
/// let service = ProximityService::new(store, profiles, ProximityConfig::default()).unwrap();
/// let me = Identity::authenticated("p1");
/// let here = UpdateLocationRequest { latitude: Some(28.6139), longitude: Some(77.2090) };
/// service.update_location(&me, me.provider_id(), &here).unwrap();
/// service.set_sharing(&me, me.provider_id(), true).unwrap();
///
/// let response = service
///     .nearby(&NearbyRequest { latitude: Some(28.6139), longitude: Some(77.2090), ..Default::default() })
///     .unwrap();
/// assert_eq!(response.count, 1);
/// ```
pub struct ProximityService {
    store: Arc<LocationStore>,
    profiles: Arc<dyn ProfileDirectory>,
    engine: ProximityEngine,
    config: ProximityConfig,
}

impl std::fmt::Debug for ProximityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProximityService")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProximityService {
    /// Creates a service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(
        store: Arc<LocationStore>,
        profiles: Arc<dyn ProfileDirectory>,
        config: ProximityConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let engine = ProximityEngine::new(store.clone(), profiles.clone(), &config);
        Ok(Self {
            store,
            profiles,
            engine,
            config,
        })
    }

    /// Rejects `category` values unknown to the job taxonomy.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn CategoryCatalog>) -> Self {
        self.engine = self.engine.with_catalog(catalog);
        self
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Finds discoverable providers near the requested point.
    ///
    /// # Errors
    ///
    /// Returns [`ProximityError::InvalidArgument`] for missing coordinates, a
    /// non-positive or too large `max_distance`, an unknown `provider_type`
    /// or an unknown category.
    pub fn nearby(&self, request: &NearbyRequest) -> Result<NearbyResponse> {
        let origin = required_origin(request.latitude, request.longitude)?;

        let radius_meters = match request.max_distance {
            None => self.config.default_radius_meters,
            Some(d) if d <= 0 => {
                return Err(ProximityError::InvalidArgument(format!(
                    "maxDistance must be positive, got {d}"
                )))
            }
            Some(d) => u32::try_from(d).map_err(|_| {
                ProximityError::InvalidArgument(format!("maxDistance too large: {d}"))
            })?,
        };

        let mut query = ProximityQuery::new(origin, radius_meters);
        if let Some(category) = non_empty(request.category.as_deref()) {
            query = query.with_category(category);
        }
        if let Some(raw) = non_empty(request.provider_type.as_deref()) {
            let provider_type = ProviderType::parse(raw).ok_or_else(|| {
                ProximityError::InvalidArgument(format!("unknown providerType: {raw}"))
            })?;
            query = query.with_provider_type(provider_type);
        }

        let data = self.engine.query(&query)?;
        Ok(NearbyResponse {
            count: data.len(),
            data,
        })
    }

    /// Records the caller's current coordinates.
    ///
    /// # Errors
    ///
    /// - [`ProximityError::Unauthorized`] unless `identity` owns `provider_id`
    /// - [`ProximityError::InvalidArgument`] for missing, out-of-range or
    ///   `(0, 0)` coordinates
    pub fn update_location(
        &self,
        identity: &Identity,
        provider_id: &ProviderId,
        request: &UpdateLocationRequest,
    ) -> Result<LocationRecord> {
        identity.ensure_owner(provider_id)?;
        let coordinates = required_origin(request.latitude, request.longitude)?;
        Ok(self.store.update_coordinates(provider_id, coordinates)?)
    }

    /// Removes the caller's stored location.
    ///
    /// # Errors
    ///
    /// [`ProximityError::Unauthorized`] or [`ProximityError::NotFound`].
    pub fn clear_location(
        &self,
        identity: &Identity,
        provider_id: &ProviderId,
    ) -> Result<LocationRecord> {
        identity.ensure_owner(provider_id)?;
        Ok(self.store.clear_coordinates(provider_id)?)
    }

    /// Turns the caller's location sharing on or off.
    ///
    /// # Errors
    ///
    /// [`ProximityError::Unauthorized`], or [`ProximityError::NotFound`] if
    /// no location was ever written.
    pub fn set_sharing(
        &self,
        identity: &Identity,
        provider_id: &ProviderId,
        enabled: bool,
    ) -> Result<LocationRecord> {
        identity.ensure_owner(provider_id)?;
        Ok(self.store.set_sharing(provider_id, enabled)?)
    }

    /// How far the requester is from a provider who shares their location.
    ///
    /// # Errors
    ///
    /// - [`ProximityError::InvalidArgument`] for missing coordinates
    /// - [`ProximityError::NotFound`] for an unknown provider
    /// - [`ProximityError::LocationUnavailable`] if the provider is not
    ///   sharing a location
    pub fn distance_to_provider(
        &self,
        provider_id: &ProviderId,
        request: &DistanceRequest,
    ) -> Result<DistanceResponse> {
        let origin = required_origin(request.latitude, request.longitude)?;
        let distance_meters = self.engine.distance_to(provider_id, origin)?;

        let profile = self
            .profiles
            .fetch_profile(provider_id)?
            .ok_or_else(|| ProximityError::NotFound(provider_id.to_string()))?;

        debug!("Distance to provider {provider_id}: {distance_meters}m");

        Ok(DistanceResponse {
            provider_id: profile.provider_id,
            provider_name: profile.name,
            distance_meters,
        })
    }

    /// The caller's own location settings. Not subject to the consent gate.
    ///
    /// # Errors
    ///
    /// [`ProximityError::Unauthorized`], or [`ProximityError::NotFound`] if
    /// no location was ever written.
    pub fn own_location(
        &self,
        identity: &Identity,
        provider_id: &ProviderId,
    ) -> Result<LocationStatus> {
        identity.ensure_owner(provider_id)?;
        let record = self
            .store
            .get(provider_id)?
            .ok_or_else(|| ProximityError::NotFound(provider_id.to_string()))?;
        Ok(LocationStatus::from_record(record, Utc::now()))
    }
}

fn required_origin(latitude: Option<f64>, longitude: Option<f64>) -> Result<Coordinate> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Ok(Coordinate::new(longitude, latitude)),
        _ => Err(ProximityError::InvalidArgument(
            "latitude and longitude are required".to_string(),
        )),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
