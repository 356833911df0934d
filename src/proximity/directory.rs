//! Collaborator interfaces consumed by the engine.
//!
//! Provider profiles and the job category taxonomy are owned by other
//! services. The engine only reads them, in batches, after the spatial
//! candidate set is known.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::error::{ProximityError, Result};
use super::types::ProviderProfile;
use crate::store::ProviderId;

/// Batch lookup of provider display attributes.
pub trait ProfileDirectory: Send + Sync {
    /// Returns the profiles that exist among `ids`, in any order.
    ///
    /// Unknown ids are silently skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ProximityError::Directory`] if the lookup fails.
    fn fetch_profiles(&self, ids: &[ProviderId]) -> Result<Vec<ProviderProfile>>;

    /// Looks up a single profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProximityError::Directory`] if the lookup fails.
    fn fetch_profile(&self, id: &ProviderId) -> Result<Option<ProviderProfile>> {
        Ok(self
            .fetch_profiles(std::slice::from_ref(id))?
            .into_iter()
            .next())
    }
}

/// The set of valid values for the `category` filter.
pub trait CategoryCatalog: Send + Sync {
    /// Returns whether `category` exists in the taxonomy.
    fn contains(&self, category: &str) -> bool;
}

/// Profile directory held in memory, keyed by provider id.
#[derive(Debug, Default)]
pub struct InMemoryProfileDirectory {
    profiles: RwLock<HashMap<ProviderId, ProviderProfile>>,
}

impl InMemoryProfileDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory lock is poisoned.
    pub fn upsert(&self, profile: ProviderProfile) -> Result<()> {
        self.profiles
            .write()
            .map_err(|e| ProximityError::Directory(format!("Failed to acquire lock: {e}")))?
            .insert(profile.provider_id.clone(), profile);
        Ok(())
    }
}

impl ProfileDirectory for InMemoryProfileDirectory {
    fn fetch_profiles(&self, ids: &[ProviderId]) -> Result<Vec<ProviderProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|e| ProximityError::Directory(format!("Failed to acquire lock: {e}")))?;
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }
}

/// A fixed category taxonomy.
#[derive(Debug, Clone, Default)]
pub struct StaticCategoryCatalog {
    categories: HashSet<String>,
}

impl StaticCategoryCatalog {
    /// Creates a catalog from a list of category names.
    #[must_use]
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}

impl CategoryCatalog for StaticCategoryCatalog {
    fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_skips_unknown_ids() {
        let directory = InMemoryProfileDirectory::new();
        directory.upsert(ProviderProfile::new("p1", "Asha")).unwrap();

        let found = directory
            .fetch_profiles(&[ProviderId::new("p1"), ProviderId::new("ghost")])
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Asha");
    }

    #[test]
    fn upsert_replaces_existing_profile() {
        let directory = InMemoryProfileDirectory::new();
        directory.upsert(ProviderProfile::new("p1", "Asha")).unwrap();
        directory.upsert(ProviderProfile::new("p1", "Asha K.")).unwrap();

        let profile = directory.fetch_profile(&ProviderId::new("p1")).unwrap().unwrap();
        assert_eq!(profile.name, "Asha K.");
    }

    #[test]
    fn fetch_profile_missing_is_none() {
        let directory = InMemoryProfileDirectory::new();
        assert!(directory
            .fetch_profile(&ProviderId::new("nobody"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn static_catalog_lookup_is_exact() {
        let catalog = StaticCategoryCatalog::new(["Plumbing", "Painting"]);
        assert!(catalog.contains("Plumbing"));
        assert!(!catalog.contains("plumbing"));
        assert!(!catalog.contains("Gardening"));
    }
}
