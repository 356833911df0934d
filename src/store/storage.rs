//! `SQLite` storage for provider location records.

// SQLite operations need to hold the lock for the duration of the operation.
#![allow(clippy::significant_drop_tightening)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::error::{Result, StoreError};
use super::types::{LocationRecord, ProviderId};
use crate::geo::{BoundingBox, Coordinate, GEOHASH_PRECISION};

const SELECT_COLUMNS: &str =
    "provider_id, longitude, latitude, sharing_enabled, updated_at, geohash";

/// `SQLite`-based store of provider locations.
///
/// Thread-safe wrapper around a `SQLite` connection. Many concurrent queries
/// and occasional per-provider writes are serialised through the connection
/// lock.
pub struct LocationStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for LocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationStore").finish_non_exhaustive()
    }
}

impl LocationStore {
    /// Opens (or creates) a store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Creates an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("Failed to acquire database lock: {e}")))
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS provider_locations (
                provider_id TEXT PRIMARY KEY,
                longitude REAL NOT NULL,
                latitude REAL NOT NULL,
                sharing_enabled INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL,
                geohash TEXT NOT NULL DEFAULT ''
            );

            -- Radius pre-filter: consent first, then the latitude band.
            CREATE INDEX IF NOT EXISTS idx_provider_locations_shared_position
                ON provider_locations (sharing_enabled, latitude, longitude);
            ",
        )?;

        Ok(())
    }

    /// Retrieves a provider's record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, provider_id: &ProviderId) -> Result<Option<LocationRecord>> {
        let conn = self.lock()?;
        Self::fetch(&conn, provider_id)
    }

    /// Writes new coordinates for a provider, creating the record on first
    /// write with sharing disabled.
    ///
    /// The timestamp is taken from the server clock.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidCoordinates`] for out-of-range values
    /// - [`StoreError::UnsetCoordinates`] for `(0, 0)`; use
    ///   [`LocationStore::clear_coordinates`] to remove a location
    pub fn update_coordinates(
        &self,
        provider_id: &ProviderId,
        coordinates: Coordinate,
    ) -> Result<LocationRecord> {
        self.write_coordinates(provider_id, coordinates, Utc::now())
    }

    fn write_coordinates(
        &self,
        provider_id: &ProviderId,
        coordinates: Coordinate,
        now: DateTime<Utc>,
    ) -> Result<LocationRecord> {
        let coordinates = coordinates.validate()?;
        if coordinates.is_unset() {
            warn!("Rejected (0, 0) coordinate update for provider {provider_id}");
            return Err(StoreError::UnsetCoordinates(provider_id.to_string()));
        }

        let conn = self.lock()?;
        let changed = conn.execute(
            r"
            INSERT INTO provider_locations (provider_id, longitude, latitude, sharing_enabled, updated_at, geohash)
            VALUES (?1, ?2, ?3, 0, ?4, ?5)
            ON CONFLICT(provider_id) DO UPDATE SET
                longitude = excluded.longitude,
                latitude = excluded.latitude,
                updated_at = excluded.updated_at,
                geohash = excluded.geohash
            WHERE excluded.updated_at >= provider_locations.updated_at
            ",
            params![
                provider_id.as_str(),
                coordinates.longitude,
                coordinates.latitude,
                now.timestamp_millis(),
                coordinates.geohash(GEOHASH_PRECISION),
            ],
        )?;

        if changed == 0 {
            warn!("Ignored stale coordinate write for provider {provider_id}");
        } else {
            info!("Updated location for provider {provider_id}");
        }

        Self::fetch(&conn, provider_id)?
            .ok_or_else(|| StoreError::NotFound(provider_id.to_string()))
    }

    /// Explicitly removes a provider's location, leaving the record (and its
    /// consent flag) in place with [`Coordinate::UNSET`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the provider has no record.
    pub fn clear_coordinates(&self, provider_id: &ProviderId) -> Result<LocationRecord> {
        self.clear_coordinates_at(provider_id, Utc::now())
    }

    fn clear_coordinates_at(
        &self,
        provider_id: &ProviderId,
        now: DateTime<Utc>,
    ) -> Result<LocationRecord> {
        let conn = self.lock()?;
        let changed = conn.execute(
            r"
            UPDATE provider_locations
            SET longitude = 0, latitude = 0, geohash = '', updated_at = ?2
            WHERE provider_id = ?1 AND updated_at <= ?2
            ",
            params![provider_id.as_str(), now.timestamp_millis()],
        )?;

        let record = Self::fetch(&conn, provider_id)?
            .ok_or_else(|| StoreError::NotFound(provider_id.to_string()))?;

        if changed == 0 {
            warn!("Ignored stale location clear for provider {provider_id}");
        } else {
            info!("Cleared location for provider {provider_id}");
        }
        Ok(record)
    }

    /// Sets the location-sharing consent flag. Coordinates are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the provider has never written a
    /// location.
    pub fn set_sharing(&self, provider_id: &ProviderId, enabled: bool) -> Result<LocationRecord> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE provider_locations SET sharing_enabled = ?2 WHERE provider_id = ?1",
            params![provider_id.as_str(), enabled],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(provider_id.to_string()));
        }

        info!(
            "Location sharing {} for provider {provider_id}",
            if enabled { "enabled" } else { "disabled" }
        );

        Self::fetch(&conn, provider_id)?
            .ok_or_else(|| StoreError::NotFound(provider_id.to_string()))
    }

    /// Returns sharing-enabled records with a real location inside `bbox`.
    ///
    /// This is a coarse pre-filter: callers must still compute exact
    /// distances.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a row is corrupt.
    pub fn candidates_within(&self, bbox: &BoundingBox) -> Result<Vec<LocationRecord>> {
        let conn = self.lock()?;

        let (west, east) = bbox.longitudes;
        let (wrap_west, wrap_east) = bbox.wrapped_longitudes.unwrap_or(bbox.longitudes);

        let sql = format!(
            r"
            SELECT {SELECT_COLUMNS}
            FROM provider_locations
            WHERE sharing_enabled = 1
              AND NOT (latitude = 0 AND longitude = 0)
              AND latitude BETWEEN ?1 AND ?2
              AND (longitude BETWEEN ?3 AND ?4 OR longitude BETWEEN ?5 AND ?6)
            ORDER BY provider_id
            "
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(
                params![
                    bbox.min_latitude,
                    bbox.max_latitude,
                    west,
                    east,
                    wrap_west,
                    wrap_east,
                ],
                RawRecord::from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Spatial pre-filter returned {} candidate(s)", rows.len());

        rows.into_iter().map(RawRecord::into_record).collect()
    }

    fn fetch(conn: &Connection, provider_id: &ProviderId) -> Result<Option<LocationRecord>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM provider_locations WHERE provider_id = ?1");
        conn.query_row(&sql, params![provider_id.as_str()], RawRecord::from_row)
            .optional()?
            .map(RawRecord::into_record)
            .transpose()
    }
}

/// Row as read from `SQLite`, before timestamp decoding.
struct RawRecord {
    provider_id: String,
    longitude: f64,
    latitude: f64,
    sharing_enabled: bool,
    updated_at: i64,
    geohash: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            provider_id: row.get(0)?,
            longitude: row.get(1)?,
            latitude: row.get(2)?,
            sharing_enabled: row.get(3)?,
            updated_at: row.get(4)?,
            geohash: row.get(5)?,
        })
    }

    fn into_record(self) -> Result<LocationRecord> {
        let last_updated_at = DateTime::from_timestamp_millis(self.updated_at).ok_or_else(|| {
            StoreError::InvalidData(format!("Invalid updated_at: {}", self.updated_at))
        })?;

        Ok(LocationRecord {
            provider_id: ProviderId::from(self.provider_id),
            coordinates: Coordinate::new(self.longitude, self.latitude),
            sharing_enabled: self.sharing_enabled,
            last_updated_at,
            geohash: self.geohash,
        })
    }
}
