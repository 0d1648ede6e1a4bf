//! Route result types

use std::fmt;

use serde::Serialize;

use super::capability::RoutePath;
use crate::coord::Coordinate;

/// Outcome of a route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    /// A path was found.
    Ok,
    /// An endpoint could not be resolved, or no path exists.
    NotFound,
    /// A capability failed (transport, credential, provider error).
    Error,
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteStatus::Ok => write!(f, "OK"),
            RouteStatus::NotFound => write!(f, "Not found"),
            RouteStatus::Error => write!(f, "Error"),
        }
    }
}

/// Result of one route request. Superseded by the next request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Resolved origin, if resolution got that far.
    pub origin: Option<Coordinate>,
    /// Resolved destination, if resolution got that far.
    pub destination: Option<Coordinate>,
    /// Ordered path; empty unless `status` is `Ok`.
    pub path: Vec<Coordinate>,
    pub status: RouteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// User-facing reason for a non-`Ok` status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RouteResult {
    pub fn found(origin: Coordinate, destination: Coordinate, path: RoutePath) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
            path: path.points,
            status: RouteStatus::Ok,
            distance_meters: path.distance_meters,
            duration_secs: path.duration_secs,
            summary: path.summary,
            detail: None,
        }
    }

    pub fn not_found(
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
        detail: impl Into<String>,
    ) -> Self {
        Self::failed(RouteStatus::NotFound, origin, destination, detail.into())
    }

    pub fn error(
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
        detail: impl Into<String>,
    ) -> Self {
        Self::failed(RouteStatus::Error, origin, destination, detail.into())
    }

    fn failed(
        status: RouteStatus,
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
        detail: String,
    ) -> Self {
        Self {
            origin,
            destination,
            path: Vec::new(),
            status,
            distance_meters: None,
            duration_secs: None,
            summary: None,
            detail: Some(detail),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RouteStatus::Ok
    }
}
