//! Deployment configuration for proximity matching.
//!
//! All values have defaults; a deployment overrides them with a JSON
//! document, e.g. to move the fallback location to another region.
//!
//! ```
//! use nearby_core::ProximityConfig;
//!
//! let config = ProximityConfig::from_json(
//!     r#"{ "default_location": { "longitude": 72.8777, "latitude": 19.0760 } }"#,
//! )
//! .unwrap();
//! assert_eq!(config.max_radius_meters, 50_000);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document is not valid JSON for [`ProximityConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for proximity queries and location acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Upper bound on a query radius.
    pub max_radius_meters: u32,
    /// Radius used when a request omits one.
    pub default_radius_meters: u32,
    /// Maximum number of providers returned per query.
    pub max_results: usize,
    /// How long to wait for the device location.
    pub acquisition_timeout_ms: u64,
    /// Origin used when the device location cannot be obtained.
    pub default_location: Coordinate,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            max_radius_meters: 50_000,
            default_radius_meters: 10_000,
            max_results: 50,
            acquisition_timeout_ms: 10_000,
            // New Delhi
            default_location: Coordinate::new(77.2090, 28.6139),
        }
    }
}

impl ProximityConfig {
    /// Parses and validates a JSON config. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values are usable together.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_radius_meters == 0 {
            return Err(ConfigError::Invalid(
                "max_radius_meters must be positive".to_string(),
            ));
        }
        if self.default_radius_meters == 0 || self.default_radius_meters > self.max_radius_meters
        {
            return Err(ConfigError::Invalid(format!(
                "default_radius_meters must be in 1..={}",
                self.max_radius_meters
            )));
        }
        if self.max_results == 0 {
            return Err(ConfigError::Invalid(
                "max_results must be positive".to_string(),
            ));
        }
        self.default_location
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("default_location: {e}")))?;
        if self.default_location.is_unset() {
            return Err(ConfigError::Invalid(
                "default_location must not be (0, 0)".to_string(),
            ));
        }
        Ok(())
    }

    /// Acquisition timeout as a [`Duration`].
    #[must_use]
    pub const fn acquisition_timeout(&self) -> Duration {
        Duration::from_millis(self.acquisition_timeout_ms)
    }
}
