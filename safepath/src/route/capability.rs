//! Place-search and routing capability traits.

use std::future::Future;

use thiserror::Error;

use crate::coord::Coordinate;

/// Failure of a search or routing capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// Network or HTTP failure.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The capability refused the request (credential, quota, malformed request).
    #[error("Request denied: {0}")]
    Denied(String),

    /// The response could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other provider-reported failure.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// One place-search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub name: String,
    pub formatted_address: Option<String>,
    pub location: Coordinate,
}

/// Free-text place search.
pub trait PlaceSearch: Send + Sync + 'static {
    /// Candidates for `query`, best-ranked first. An empty vector means no
    /// match.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, CapabilityError>> + Send;
}

/// A computed path between two points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutePath {
    pub points: Vec<Coordinate>,
    pub distance_meters: Option<f64>,
    pub duration_secs: Option<u64>,
    pub summary: Option<String>,
}

/// Routing response.
#[derive(Debug, Clone, PartialEq)]
pub enum PathResponse {
    Found(RoutePath),
    /// The capability answered but has no path between the points.
    NoPath,
}

/// Route computation between two coordinates.
pub trait RoutePlanner: Send + Sync + 'static {
    fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<PathResponse, CapabilityError>> + Send;
}
