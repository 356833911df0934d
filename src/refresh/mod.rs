//! Refresh protocol for consumer views.
//!
//! A view acquires the device location once on mount, then queries. Filter
//! changes re-query with the cached origin; only an explicit refresh asks the
//! device again. Each query carries a generation number, so a response that
//! arrives after a newer query was issued is discarded.
//!
//! ```text
//! Idle --Mount--> AcquiringLocation --LocationAcquired--> Querying ----Response--> Ready
//!                                   --LocationFailed--> QueryingWithDefault --Response--> Ready
//! Ready --FiltersChanged | Refresh--> Querying
//! ```

mod state;
mod view;

pub use state::{ViewEvent, ViewState};
pub use view::{NearbyQuery, NearbyView, Notice, QueryTicket, ViewFilters};
