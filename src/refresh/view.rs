//! Consumer-side driver for a nearby-providers view.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use super::state::{ViewEvent, ViewState};
use crate::acquisition::{
    acquire_current_location, acquire_or_default, fallback_notice, stale_location_notice,
    AcquisitionError, LocationSource,
};
use crate::api::{NearbyRequest, NearbyResponse, ProximityService};
use crate::config::ProximityConfig;
use crate::geo::Coordinate;
use crate::proximity::{ProviderType, ProximityError, ProximityResult};

/// Anything that can answer a nearby request.
pub trait NearbyQuery: Send + Sync {
    /// Runs one nearby request.
    ///
    /// # Errors
    ///
    /// Returns the query-path error unchanged.
    fn nearby(&self, request: &NearbyRequest) -> Result<NearbyResponse, ProximityError>;
}

impl NearbyQuery for ProximityService {
    fn nearby(&self, request: &NearbyRequest) -> Result<NearbyResponse, ProximityError> {
        Self::nearby(self, request)
    }
}

impl<T: NearbyQuery + ?Sized> NearbyQuery for Arc<T> {
    fn nearby(&self, request: &NearbyRequest) -> Result<NearbyResponse, ProximityError> {
        (**self).nearby(request)
    }
}

/// Filters chosen in the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilters {
    /// Search radius in meters.
    pub radius_meters: u32,
    /// Exact service category.
    pub category: Option<String>,
    /// Provider class.
    pub provider_type: Option<ProviderType>,
}

impl ViewFilters {
    /// Unfiltered search within `radius_meters`.
    #[must_use]
    pub const fn within(radius_meters: u32) -> Self {
        Self {
            radius_meters,
            category: None,
            provider_type: None,
        }
    }
}

/// Non-blocking message shown alongside the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The device location failed on mount; the default origin is in use.
    LocationFallback(AcquisitionError),
    /// An explicit refresh could not update the location; the previous
    /// origin is kept.
    LocationNotRefreshed(AcquisitionError),
    /// The query succeeded with no matches.
    NoProvidersNearby {
        /// Radius that was searched.
        radius_meters: u32,
    },
    /// The query was rejected or failed.
    QueryFailed(String),
}

impl Notice {
    const fn is_query_outcome(&self) -> bool {
        matches!(self, Self::NoProvidersNearby { .. } | Self::QueryFailed(_))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocationFallback(reason) => f.write_str(&fallback_notice(*reason)),
            Self::LocationNotRefreshed(reason) => f.write_str(&stale_location_notice(*reason)),
            Self::NoProvidersNearby { radius_meters } => write!(
                f,
                "No providers found within {:.1} km. Try increasing the search radius.",
                f64::from(*radius_meters) / 1000.0
            ),
            Self::QueryFailed(message) => write!(f, "Could not load nearby providers: {message}"),
        }
    }
}

/// A query issued by a view, to be answered through
/// [`NearbyView::complete_query`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTicket {
    generation: u64,
    request: NearbyRequest,
}

impl QueryTicket {
    /// Monotonic id of this query within its view.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The request to send.
    #[must_use]
    pub const fn request(&self) -> &NearbyRequest {
        &self.request
    }
}

/// Drives one nearby-providers view through mount, filter changes and
/// refreshes.
///
/// The device location is acquired on mount and cached for the lifetime of
/// the view; only [`NearbyView::refresh`] acquires it again. Every filter
/// change issues a new query. Responses to superseded queries are dropped.
/// No failure escapes the view: the worst outcome is an empty result list
/// with a [`Notice`].
pub struct NearbyView<S, Q> {
    source: S,
    backend: Q,
    timeout: Duration,
    default_location: Coordinate,
    state: ViewState,
    origin: Option<Coordinate>,
    filters: ViewFilters,
    generation: u64,
    results: Vec<ProximityResult>,
    notices: Vec<Notice>,
}

impl<S, Q> std::fmt::Debug for NearbyView<S, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearbyView")
            .field("state", &self.state)
            .field("filters", &self.filters)
            .field("generation", &self.generation)
            .field("results", &self.results.len())
            .field("notices", &self.notices)
            .finish_non_exhaustive()
    }
}

impl<S: LocationSource, Q: NearbyQuery> NearbyView<S, Q> {
    /// Creates an unmounted view using the configured default radius,
    /// default location and acquisition timeout.
    #[must_use]
    pub fn new(source: S, backend: Q, config: &ProximityConfig) -> Self {
        Self {
            source,
            backend,
            timeout: config.acquisition_timeout(),
            default_location: config.default_location,
            state: ViewState::Idle,
            origin: None,
            filters: ViewFilters::within(config.default_radius_meters),
            generation: 0,
            results: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ViewState {
        self.state
    }

    /// Results of the latest applied query, nearest first.
    #[must_use]
    pub fn results(&self) -> &[ProximityResult] {
        &self.results
    }

    /// Notices to show next to the results.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Origin used for queries, once known.
    #[must_use]
    pub const fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    /// Active filters.
    #[must_use]
    pub const fn filters(&self) -> &ViewFilters {
        &self.filters
    }

    /// Mounts the view: acquire the location (or fall back) and query.
    pub async fn mount(&mut self) {
        if !self.apply(ViewEvent::Mount) {
            return;
        }

        let acquired = acquire_or_default(&self.source, self.timeout, self.default_location).await;
        self.origin = Some(acquired.coordinate);

        let event = match acquired.fallback {
            Some(reason) => {
                self.notices.push(Notice::LocationFallback(reason));
                ViewEvent::LocationFailed
            }
            None => ViewEvent::LocationAcquired,
        };
        self.apply(event);
        self.dispatch();
    }

    /// Replaces the filters and re-queries with the cached origin.
    ///
    /// Unchanged filters issue no query. Before mount the filters are only
    /// stored.
    pub fn set_filters(&mut self, filters: ViewFilters) {
        if self.state.is_querying() || self.state == ViewState::Ready {
            if let Some(ticket) = self.change_filters(filters) {
                self.answer(ticket);
            }
        } else {
            self.filters = filters;
        }
    }

    /// Replaces the filters and returns the query to send, for consumers
    /// that deliver requests themselves.
    ///
    /// Returns `None` when nothing needs querying.
    pub fn change_filters(&mut self, filters: ViewFilters) -> Option<QueryTicket> {
        if filters == self.filters {
            return None;
        }
        self.filters = filters;
        if self.apply(ViewEvent::FiltersChanged) {
            self.begin_query()
        } else {
            None
        }
    }

    /// Explicit refresh: re-acquire the device location, then re-query.
    ///
    /// If the device fails, the previous origin is kept.
    pub async fn refresh(&mut self) {
        if !self.apply(ViewEvent::Refresh) {
            return;
        }

        match acquire_current_location(&self.source, self.timeout).await {
            Ok(coordinate) => {
                self.origin = Some(coordinate);
                self.notices.retain(|n| {
                    !matches!(
                        n,
                        Notice::LocationFallback(_) | Notice::LocationNotRefreshed(_)
                    )
                });
            }
            Err(reason) => {
                debug!("Refresh kept previous origin: {reason}");
                self.notices.retain(|n| !matches!(n, Notice::LocationNotRefreshed(_)));
                self.notices.push(Notice::LocationNotRefreshed(reason));
            }
        }
        self.dispatch();
    }

    /// Applies a response. Returns `false` (and changes nothing) if a newer
    /// query has been issued since `ticket`.
    pub fn complete_query(
        &mut self,
        ticket: QueryTicket,
        response: Result<NearbyResponse, ProximityError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping superseded response {} (latest {})",
                ticket.generation, self.generation
            );
            return false;
        }

        match response {
            Ok(response) => {
                if response.data.is_empty() {
                    self.notices.push(Notice::NoProvidersNearby {
                        radius_meters: self.filters.radius_meters,
                    });
                }
                self.results = response.data;
            }
            Err(e) => {
                self.results.clear();
                self.notices.push(Notice::QueryFailed(e.to_string()));
            }
        }
        self.apply(ViewEvent::Response);
        true
    }

    fn begin_query(&mut self) -> Option<QueryTicket> {
        let origin = self.origin?;
        self.generation += 1;
        self.notices.retain(|n| !n.is_query_outcome());

        Some(QueryTicket {
            generation: self.generation,
            request: NearbyRequest {
                latitude: Some(origin.latitude),
                longitude: Some(origin.longitude),
                max_distance: Some(i64::from(self.filters.radius_meters)),
                category: self.filters.category.clone(),
                provider_type: self.filters.provider_type.map(|t| t.as_str().to_string()),
            },
        })
    }

    fn dispatch(&mut self) {
        if let Some(ticket) = self.begin_query() {
            self.answer(ticket);
        }
    }

    fn answer(&mut self, ticket: QueryTicket) {
        let response = self.backend.nearby(ticket.request());
        self.complete_query(ticket, response);
    }

    fn apply(&mut self, event: ViewEvent) -> bool {
        match self.state.transition(event) {
            Some(next) => {
                debug!("Nearby view {:?} --{event:?}--> {next:?}", self.state);
                self.state = next;
                true
            }
            None => {
                debug!("Nearby view ignored {event:?} in {:?}", self.state);
                false
            }
        }
    }
}
