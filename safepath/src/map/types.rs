//! Map types and errors

use std::fmt;

use thiserror::Error;

use crate::coord::Coordinate;
use crate::route::RouteResult;

/// Default zoom for a freshly mounted map (street level).
pub const DEFAULT_ZOOM: u8 = 14;

/// Deepest zoom level the widget will fit to.
pub const MAX_ZOOM: u8 = 21;

/// Radius of the accuracy ring drawn around the live marker.
pub const LIVE_ACCURACY_RADIUS_METERS: f64 = 50.0;

/// Handle to one overlay (marker, circle, polyline) inside a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// The host element the widget is mounted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapContainer {
    /// Identifier of the host element.
    pub element_id: String,
    /// Width in CSS pixels.
    pub width_px: u32,
    /// Height in CSS pixels.
    pub height_px: u32,
}

impl MapContainer {
    pub fn new(element_id: impl Into<String>, width_px: u32, height_px: u32) -> Self {
        Self {
            element_id: element_id.into(),
            width_px,
            height_px,
        }
    }
}

impl Default for MapContainer {
    fn default() -> Self {
        Self::new("safety-map", 800, 600)
    }
}

/// Marker role, which determines its default appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// The user's live position.
    Live,
    /// End of the active route.
    Destination,
}

/// Marker appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub kind: MarkerKind,
    pub title: String,
    pub fill_color: String,
}

impl MarkerStyle {
    pub fn live() -> Self {
        Self {
            kind: MarkerKind::Live,
            title: "Your Location".to_string(),
            fill_color: "#00C49F".to_string(),
        }
    }

    pub fn destination(title: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Destination,
            title: title.into(),
            fill_color: "#2563EB".to_string(),
        }
    }
}

/// Circle appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleStyle {
    pub stroke_color: String,
    pub fill_color: String,
    pub fill_opacity: f32,
}

impl CircleStyle {
    /// Faint ring around the live marker.
    pub fn accuracy() -> Self {
        Self {
            stroke_color: "#00C49F".to_string(),
            fill_color: "#00C49F".to_string(),
            fill_opacity: 0.1,
        }
    }

    /// Filled circle in the given color.
    pub fn zone(color: &str) -> Self {
        Self {
            stroke_color: color.to_string(),
            fill_color: color.to_string(),
            fill_opacity: 0.35,
        }
    }
}

/// Polyline appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub stroke_color: String,
    pub stroke_weight: u8,
}

impl LineStyle {
    pub fn route() -> Self {
        Self {
            stroke_color: "#00C49F".to_string(),
            stroke_weight: 5,
        }
    }
}

/// Adapter lifecycle.
///
/// `Uninitialized -> Loading -> {Ready, Failed}`; both end states are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterState {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

impl fmt::Display for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::Loading => write!(f, "Loading"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed(reason) => write!(f, "Failed ({})", reason),
        }
    }
}

/// Snapshot of a mounted map session.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSession {
    pub center: Coordinate,
    pub zoom: u8,
    pub live_marker: Option<Coordinate>,
    pub active_route: Option<RouteResult>,
}

/// Map adapter errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The mapping capability could not be loaded (bad credential, network).
    /// Terminal for the adapter instance.
    #[error("Map capability failed to load: {0}")]
    CapabilityLoad(String),

    /// An operation was issued to an adapter whose load failed.
    #[error("Map unavailable: {0}")]
    Unavailable(String),
}
