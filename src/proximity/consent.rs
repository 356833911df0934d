//! Location-sharing consent gate.
//!
//! Every path that shows a provider's location to someone else (nearby
//! lists, map markers, point-to-point distances) must pass records through
//! [`is_discoverable`]. The provider's own settings view must not.

use crate::store::LocationRecord;

/// Returns whether a record may be shown to third parties.
///
/// Requires the consent flag AND a real location: an enabled flag on an
/// unset `(0, 0)` record is not a valid share.
#[must_use]
pub fn is_discoverable(record: &LocationRecord) -> bool {
    record.sharing_enabled && record.has_location()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::geo::Coordinate;
    use crate::store::ProviderId;

    fn record(sharing_enabled: bool, coordinates: Coordinate) -> LocationRecord {
        LocationRecord {
            provider_id: ProviderId::new("p1"),
            coordinates,
            sharing_enabled,
            last_updated_at: Utc::now(),
            geohash: String::new(),
        }
    }

    #[test]
    fn enabled_with_location_is_discoverable() {
        assert!(is_discoverable(&record(true, Coordinate::new(77.2, 28.6))));
    }

    #[test]
    fn disabled_is_hidden() {
        assert!(!is_discoverable(&record(false, Coordinate::new(77.2, 28.6))));
    }

    #[test]
    fn enabled_but_unset_is_hidden() {
        assert!(!is_discoverable(&record(true, Coordinate::UNSET)));
    }
}
