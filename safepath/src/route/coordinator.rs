//! Route request coordinator.
//!
//! Resolves free-text endpoints through a [`PlaceSearch`], asks a
//! [`RoutePlanner`] for a path, and folds every failure into a
//! [`RouteResult`] status. Requests are independent; when results are
//! rendered through [`RouteRequestCoordinator::route_on_map`] each request is
//! tagged so a slow, superseded response never replaces a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::capability::{CapabilityError, PathResponse, PlaceSearch, RoutePlanner};
use super::types::RouteResult;
use crate::coord::Coordinate;
use crate::map::{MapClientAdapter, MapError, MapLoader};

/// Origin text meaning "wherever the user is now".
pub const CURRENT_LOCATION_LABEL: &str = "Your Current Location";

/// What happened to a route handed to the map.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteDelivery {
    /// The route is now the one on the map.
    Applied(RouteResult),
    /// A newer request was issued; this result was not rendered.
    Superseded(RouteResult),
}

impl RouteDelivery {
    pub fn result(&self) -> &RouteResult {
        match self {
            RouteDelivery::Applied(result) | RouteDelivery::Superseded(result) => result,
        }
    }

    pub fn into_result(self) -> RouteResult {
        match self {
            RouteDelivery::Applied(result) | RouteDelivery::Superseded(result) => result,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, RouteDelivery::Applied(_))
    }
}

/// Turns origin/destination text into routes.
pub struct RouteRequestCoordinator<S, R> {
    search: S,
    planner: R,
    current_location: RwLock<Option<Coordinate>>,
    issued: AtomicU64,
}

enum Resolution {
    Resolved(Coordinate),
    Unresolved(String),
}

impl<S: PlaceSearch, R: RoutePlanner> RouteRequestCoordinator<S, R> {
    pub fn new(search: S, planner: R) -> Self {
        Self {
            search,
            planner,
            current_location: RwLock::new(None),
            issued: AtomicU64::new(0),
        }
    }

    /// Record the user's position, used for an empty or
    /// [`CURRENT_LOCATION_LABEL`] origin.
    pub fn set_current_location(&self, position: Coordinate) {
        *self.current_location.write() = Some(position);
    }

    pub fn current_location(&self) -> Option<Coordinate> {
        *self.current_location.read()
    }

    /// Compute a route between two free-text endpoints.
    ///
    /// Never fails: unresolvable endpoints and "no path" answers yield
    /// `NotFound`, capability failures yield `Error`. An empty destination
    /// returns `NotFound` without contacting either capability.
    pub async fn find_route(&self, origin_text: &str, destination_text: &str) -> RouteResult {
        let destination_text = destination_text.trim();
        if destination_text.is_empty() {
            return RouteResult::not_found(None, None, "Enter a destination");
        }

        let destination = match self.resolve(destination_text).await {
            Ok(Resolution::Resolved(coord)) => coord,
            Ok(Resolution::Unresolved(detail)) => return RouteResult::not_found(None, None, detail),
            Err(e) => {
                tracing::warn!(query = destination_text, error = %e, "Destination search failed");
                return RouteResult::error(None, None, e.to_string());
            }
        };

        let origin = match self.resolve_origin(origin_text).await {
            Ok(Resolution::Resolved(coord)) => coord,
            Ok(Resolution::Unresolved(detail)) => {
                return RouteResult::not_found(None, Some(destination), detail)
            }
            Err(e) => {
                tracing::warn!(query = origin_text, error = %e, "Origin search failed");
                return RouteResult::error(None, Some(destination), e.to_string());
            }
        };

        tracing::debug!(origin = %origin, destination = %destination, "Requesting route");
        match self.planner.plan(origin, destination).await {
            Ok(PathResponse::Found(path)) => {
                tracing::info!(
                    origin = %origin,
                    destination = %destination,
                    points = path.points.len(),
                    distance_m = ?path.distance_meters,
                    "Route found"
                );
                RouteResult::found(origin, destination, path)
            }
            Ok(PathResponse::NoPath) => RouteResult::not_found(
                Some(origin),
                Some(destination),
                "No route between these places",
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Route request failed");
                RouteResult::error(Some(origin), Some(destination), e.to_string())
            }
        }
    }

    /// Compute a route and render it on `map` unless a newer request was
    /// issued meanwhile.
    ///
    /// Fails only when the map itself is unavailable.
    pub async fn route_on_map<L: MapLoader>(
        &self,
        origin_text: &str,
        destination_text: &str,
        map: &MapClientAdapter<L>,
    ) -> Result<RouteDelivery, MapError> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.find_route(origin_text, destination_text).await;

        let latest = self.issued.load(Ordering::SeqCst);
        if sequence < latest {
            tracing::debug!(sequence, latest, "Route response superseded");
            return Ok(RouteDelivery::Superseded(result));
        }

        if map.render_route_if_newer(sequence, &result)? {
            Ok(RouteDelivery::Applied(result))
        } else {
            Ok(RouteDelivery::Superseded(result))
        }
    }

    async fn resolve_origin(&self, text: &str) -> Result<Resolution, CapabilityError> {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(CURRENT_LOCATION_LABEL) {
            return Ok(match self.current_location() {
                Some(position) => Resolution::Resolved(position),
                None => Resolution::Unresolved("Current location not known yet".to_string()),
            });
        }
        self.resolve(text).await
    }

    async fn resolve(&self, text: &str) -> Result<Resolution, CapabilityError> {
        if let Ok(coord) = text.parse::<Coordinate>() {
            return Ok(Resolution::Resolved(coord));
        }

        let candidates = self.search.search(text).await?;
        match candidates.into_iter().next() {
            Some(best) => {
                tracing::debug!(query = text, place = %best.name, location = %best.location, "Place resolved");
                Ok(Resolution::Resolved(best.location))
            }
            None => Ok(Resolution::Unresolved(format!("No place found for '{}'", text))),
        }
    }
}
