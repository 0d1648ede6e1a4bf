//! Widget and loader traits.
//!
//! [`MapLoader`] is the single entry point to the external mapping
//! capability; it produces a mounted [`MapWidget`]. Everything else in the
//! crate talks to the widget only through the adapter.

use std::future::Future;

use super::types::{CircleStyle, LineStyle, MapContainer, MapError, MarkerStyle, OverlayId};
use crate::coord::{Coordinate, LatLngBounds};

/// Overlay primitives of a mounted map widget.
pub trait MapWidget: Send + 'static {
    /// Drops a marker and returns its handle.
    fn add_marker(&mut self, position: Coordinate, style: &MarkerStyle) -> OverlayId;

    /// Draws a circle and returns its handle.
    fn add_circle(&mut self, center: Coordinate, radius_meters: f64, style: &CircleStyle)
        -> OverlayId;

    /// Draws a polyline through `path` and returns its handle.
    fn add_polyline(&mut self, path: &[Coordinate], style: &LineStyle) -> OverlayId;

    /// Moves a marker or re-centers a circle. Unknown handles are ignored.
    fn move_overlay(&mut self, id: OverlayId, position: Coordinate);

    /// Removes an overlay. Unknown handles are ignored.
    fn remove_overlay(&mut self, id: OverlayId);

    /// Adjusts center and zoom so `bounds` is fully visible.
    fn fit_bounds(&mut self, bounds: &LatLngBounds);

    /// Current viewport center.
    fn center(&self) -> Coordinate;

    /// Current zoom level.
    fn zoom(&self) -> u8;
}

/// Loads the external mapping capability and mounts a widget.
pub trait MapLoader: Send + Sync + 'static {
    type Widget: MapWidget;

    /// Loads the capability and mounts a widget in `container`.
    ///
    /// Fails with [`MapError::CapabilityLoad`] when the capability cannot be
    /// obtained (missing or rejected credential, network failure).
    fn load(
        &self,
        container: &MapContainer,
        center: Coordinate,
        zoom: u8,
    ) -> impl Future<Output = Result<Self::Widget, MapError>> + Send;
}
