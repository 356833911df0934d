//! Per-view refresh state machine.

use serde::{Deserialize, Serialize};

/// Where a consuming view is in its discovery cycle.
///
/// There is no terminal state: a view stays refreshable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewState {
    /// Not mounted yet.
    #[default]
    Idle,
    /// Waiting for the device location.
    AcquiringLocation,
    /// Query in flight for the device (or cached) location.
    Querying,
    /// Query in flight for the configured default location.
    QueryingWithDefault,
    /// Results (or an explanatory notice) are showing.
    Ready,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// The view was mounted.
    Mount,
    /// The device reported a location.
    LocationAcquired,
    /// The device failed; the default location is used.
    LocationFailed,
    /// The current query answered (successfully or not).
    Response,
    /// Radius, category or provider type changed.
    FiltersChanged,
    /// The user asked for a refresh.
    Refresh,
}

impl ViewState {
    /// Returns the next state, or `None` if the event is ignored here.
    ///
    /// A filter change while a query is in flight supersedes it with a new
    /// query; the older response is then dropped by its generation.
    #[must_use]
    pub const fn transition(self, event: ViewEvent) -> Option<Self> {
        match (self, event) {
            (Self::Idle, ViewEvent::Mount) => Some(Self::AcquiringLocation),
            (Self::AcquiringLocation, ViewEvent::LocationAcquired) => Some(Self::Querying),
            (Self::AcquiringLocation, ViewEvent::LocationFailed) => Some(Self::QueryingWithDefault),
            (Self::Querying | Self::QueryingWithDefault, ViewEvent::Response) => Some(Self::Ready),
            (
                Self::Ready | Self::Querying | Self::QueryingWithDefault,
                ViewEvent::FiltersChanged,
            )
            | (Self::Ready, ViewEvent::Refresh) => Some(Self::Querying),
            _ => None,
        }
    }

    /// Returns whether a query is in flight.
    #[must_use]
    pub const fn is_querying(self) -> bool {
        matches!(self, Self::Querying | Self::QueryingWithDefault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_EVENTS: [ViewEvent; 6] = [
        ViewEvent::Mount,
        ViewEvent::LocationAcquired,
        ViewEvent::LocationFailed,
        ViewEvent::Response,
        ViewEvent::FiltersChanged,
        ViewEvent::Refresh,
    ];

    #[test]
    fn mount_starts_acquisition() {
        assert_eq!(
            ViewState::Idle.transition(ViewEvent::Mount),
            Some(ViewState::AcquiringLocation)
        );
    }

    #[test]
    fn acquisition_outcomes() {
        assert_eq!(
            ViewState::AcquiringLocation.transition(ViewEvent::LocationAcquired),
            Some(ViewState::Querying)
        );
        assert_eq!(
            ViewState::AcquiringLocation.transition(ViewEvent::LocationFailed),
            Some(ViewState::QueryingWithDefault)
        );
    }

    #[test]
    fn responses_lead_to_ready() {
        for state in [ViewState::Querying, ViewState::QueryingWithDefault] {
            assert_eq!(state.transition(ViewEvent::Response), Some(ViewState::Ready));
        }
    }

    #[test]
    fn ready_requeries_on_filter_change_and_refresh() {
        assert_eq!(
            ViewState::Ready.transition(ViewEvent::FiltersChanged),
            Some(ViewState::Querying)
        );
        assert_eq!(
            ViewState::Ready.transition(ViewEvent::Refresh),
            Some(ViewState::Querying)
        );
    }

    #[test]
    fn filter_change_supersedes_in_flight_query() {
        assert_eq!(
            ViewState::QueryingWithDefault.transition(ViewEvent::FiltersChanged),
            Some(ViewState::Querying)
        );
    }

    #[test]
    fn idle_ignores_everything_but_mount() {
        for event in ALL_EVENTS.into_iter().filter(|e| *e != ViewEvent::Mount) {
            assert_eq!(ViewState::Idle.transition(event), None, "{event:?}");
        }
    }

    #[test]
    fn no_state_is_terminal() {
        for state in [
            ViewState::AcquiringLocation,
            ViewState::Querying,
            ViewState::QueryingWithDefault,
            ViewState::Ready,
        ] {
            assert!(
                ALL_EVENTS.iter().any(|e| state.transition(*e).is_some()),
                "{state:?} has no way out"
            );
        }
    }

    #[test]
    fn mount_is_ignored_once_mounted() {
        assert_eq!(ViewState::Ready.transition(ViewEvent::Mount), None);
    }
}
