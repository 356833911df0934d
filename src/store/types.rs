//! Location record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Opaque provider identifier, shared with the external profile service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A provider's stored location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Owner of the record.
    pub provider_id: ProviderId,
    /// Last written coordinates; [`Coordinate::UNSET`] after a clear.
    pub coordinates: Coordinate,
    /// Consent flag. `false` until the provider opts in.
    pub sharing_enabled: bool,
    /// Server time of the last coordinate write.
    pub last_updated_at: DateTime<Utc>,
    /// Geohash of `coordinates`, empty when unset.
    pub geohash: String,
}

impl LocationRecord {
    /// Returns whether the record holds a real location.
    #[must_use]
    pub fn has_location(&self) -> bool {
        !self.coordinates.is_unset()
    }

    /// Coarse geohash cell of the stored location, `None` when unset.
    ///
    /// Read from the stored geohash, which is always at least `precision`
    /// characters long for a real location.
    #[must_use]
    pub fn area_cell(&self, precision: usize) -> Option<String> {
        if !self.has_location() || self.geohash.is_empty() {
            return None;
        }
        Some(self.geohash.chars().take(precision).collect())
    }

    /// Human-readable age of the last coordinate write, e.g.
    /// `"Last updated: 5 minutes ago"`.
    #[must_use]
    pub fn last_updated_label(&self, now: DateTime<Utc>) -> String {
        let age = now.signed_duration_since(self.last_updated_at);
        let minutes = age.num_minutes();

        if minutes < 1 {
            return "Last updated: just now".to_string();
        }
        let (value, unit) = if minutes < 60 {
            (minutes, "minute")
        } else if age.num_hours() < 24 {
            (age.num_hours(), "hour")
        } else {
            (age.num_days(), "day")
        };
        let plural = if value == 1 { "" } else { "s" };
        format!("Last updated: {value} {unit}{plural} ago")
    }
}
