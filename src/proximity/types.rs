//! Query and result types for proximity matching.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::store::ProviderId;

/// Class of provider. The two classes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    /// Technical services (electrical, IT, appliance repair, ...).
    #[serde(rename = "Technical")]
    Technical,
    /// Non-technical services (cleaning, painting, moving, ...).
    #[serde(rename = "Non-Technical")]
    NonTechnical,
}

impl ProviderType {
    /// Converts to the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::NonTechnical => "Non-Technical",
        }
    }

    /// Parses from the wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Technical" => Some(Self::Technical),
            "Non-Technical" => Some(Self::NonTechnical),
            _ => None,
        }
    }
}

/// A radius query around an origin point.
///
/// # Example
///
/// ```
/// use nearby_core::geo::Coordinate;
/// use nearby_core::proximity::{ProviderType, ProximityQuery};
///
/// let query = ProximityQuery::new(Coordinate::new(77.2090, 28.6139), 5_000)
///     .with_category("Plumbing")
///     .with_provider_type(ProviderType::Technical);
/// assert_eq!(query.category.as_deref(), Some("Plumbing"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityQuery {
    /// Where the requester is. Need not be a registered provider.
    pub origin: Coordinate,
    /// Search radius, `1..=max_radius_meters`.
    pub radius_meters: u32,
    /// Exact service category to match, if any.
    pub category: Option<String>,
    /// Provider class to match, if any.
    pub provider_type: Option<ProviderType>,
}

impl ProximityQuery {
    /// Creates an unfiltered query.
    #[must_use]
    pub const fn new(origin: Coordinate, radius_meters: u32) -> Self {
        Self {
            origin,
            radius_meters,
            category: None,
            provider_type: None,
        }
    }

    /// Restricts results to providers offering `category`.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts results to one provider class.
    #[must_use]
    pub const fn with_provider_type(mut self, provider_type: ProviderType) -> Self {
        self.provider_type = Some(provider_type);
        self
    }
}

/// Provider attributes owned by the external profile service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    /// Provider identifier.
    pub provider_id: ProviderId,
    /// Display name.
    pub name: String,
    /// Average review rating.
    pub rating: f64,
    /// Number of completed jobs.
    pub completed_jobs: u32,
    /// Services offered, as displayed.
    pub services: Vec<String>,
    /// Service categories from the job taxonomy; matched by `category`.
    pub categories: Vec<String>,
    /// Hourly rate, if published.
    pub hourly_rate: Option<f64>,
    /// City, if published.
    pub city: Option<String>,
    /// Provider class, if set.
    pub provider_type: Option<ProviderType>,
    /// Inactive accounts are never matched.
    pub active: bool,
}

impl ProviderProfile {
    /// Creates an active profile with no services or optional attributes.
    #[must_use]
    pub fn new(provider_id: impl Into<ProviderId>, name: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            name: name.into(),
            rating: 0.0,
            completed_jobs: 0,
            services: Vec::new(),
            categories: Vec::new(),
            hourly_rate: None,
            city: None,
            provider_type: None,
            active: true,
        }
    }

    /// Returns whether the profile matches the optional filters (AND).
    #[must_use]
    pub fn matches(&self, category: Option<&str>, provider_type: Option<ProviderType>) -> bool {
        let category_ok = category.is_none_or(|c| self.categories.iter().any(|own| own == c));
        let type_ok = provider_type.is_none_or(|t| self.provider_type == Some(t));
        category_ok && type_ok
    }
}

/// One ranked provider in a proximity response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityResult {
    /// Provider identifier.
    pub provider_id: ProviderId,
    /// Distance from the origin, rounded to one decimal.
    pub distance_meters: f64,
    /// Display name.
    pub name: String,
    /// Average review rating.
    pub rating: f64,
    /// Number of completed jobs.
    pub completed_jobs: u32,
    /// Services offered.
    pub services: Vec<String>,
    /// Hourly rate, if published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    /// City, if published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Provider class, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderType>,
}

impl ProximityResult {
    /// Builds a result from a profile and an already-rounded distance.
    #[must_use]
    pub fn from_profile(profile: ProviderProfile, distance_meters: f64) -> Self {
        Self {
            provider_id: profile.provider_id,
            distance_meters,
            name: profile.name,
            rating: profile.rating,
            completed_jobs: profile.completed_jobs,
            services: profile.services,
            hourly_rate: profile.hourly_rate,
            city: profile.city,
            provider_type: profile.provider_type,
        }
    }
}
