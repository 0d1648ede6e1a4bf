//! Route requests.
//!
//! [`RouteRequestCoordinator`] turns origin and destination text into a
//! [`RouteResult`] using two capabilities, [`PlaceSearch`] and
//! [`RoutePlanner`]. Failures never escape as errors; they are reported
//! through [`RouteStatus`].

mod capability;
mod coordinator;
mod types;

pub use capability::{
    CapabilityError, PathResponse, PlaceCandidate, PlaceSearch, RoutePath, RoutePlanner,
};
pub use coordinator::{RouteDelivery, RouteRequestCoordinator, CURRENT_LOCATION_LABEL};
pub use types::{RouteResult, RouteStatus};
