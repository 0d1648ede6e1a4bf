//! Map client adapter and widget abstraction.
//!
//! The external mapping capability is reached only through a [`MapLoader`],
//! and only the [`MapClientAdapter`] ever calls it. The rest of the crate
//! sees the adapter's typed operations:
//!
//! ```text
//! Uninitialized --initialize()--> Loading --+--> Ready
//!                                           +--> Failed(reason)
//! ```
//!
//! Both end states are terminal. A new adapter is required to retry a
//! failed load.
//!
//! [`SceneWidget`] is the built-in retained-mode widget; it tracks overlays,
//! fits viewports using Web Mercator math and exports GeoJSON.

mod adapter;
mod scene;
mod types;
mod widget;

pub use adapter::MapClientAdapter;
pub use scene::{zoom_for_bounds, Overlay, SceneWidget};
pub use types::{
    AdapterState, CircleStyle, LineStyle, MapContainer, MapError, MapSession, MarkerKind,
    MarkerStyle, OverlayId, DEFAULT_ZOOM, LIVE_ACCURACY_RADIUS_METERS, MAX_ZOOM,
};
pub use widget::{MapLoader, MapWidget};
