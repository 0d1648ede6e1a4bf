//! Safety map session.
//!
//! [`SafetyMap`] wires the components together for one mounted view:
//!
//! ```text
//! LocationTracker ──first fix──► MapClientAdapter::initialize(center)
//!        │                              ▲
//!        └──every update──► live marker │ render_route_if_newer
//!                           coordinator ┘
//! ```
//!
//! Dropping or closing the session cancels location updates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::coord::Coordinate;
use crate::location::{Geolocation, LocationTracker, TrackerConfig, TrackerHandle};
use crate::map::{MapClientAdapter, MapError, MapLoader};
use crate::route::{PlaceSearch, RouteDelivery, RoutePlanner, RouteRequestCoordinator};
use crate::zone::{assess, AdvisoryZone, SafetyLevel};

/// One mounted safety map.
pub struct SafetyMap<L: MapLoader, S, R> {
    adapter: Arc<MapClientAdapter<L>>,
    coordinator: Arc<RouteRequestCoordinator<S, R>>,
    zones: Vec<AdvisoryZone>,
    position: Arc<Mutex<Option<Coordinate>>>,
    using_fallback: Arc<AtomicBool>,
    tracker: TrackerHandle,
}

impl<L, S, R> SafetyMap<L, S, R>
where
    L: MapLoader,
    S: PlaceSearch,
    R: RoutePlanner,
{
    /// Mount a session.
    ///
    /// Waits for the first position (real or fallback), initializes the map
    /// centered there, then renders `zones` and the live marker. Later
    /// position updates move the marker and feed the coordinator.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the map capability fails to load;
    /// location tracking is cancelled in that case.
    pub async fn mount<G: Geolocation>(
        geolocation: G,
        tracker_config: TrackerConfig,
        adapter: Arc<MapClientAdapter<L>>,
        coordinator: Arc<RouteRequestCoordinator<S, R>>,
        zones: Vec<AdvisoryZone>,
    ) -> Result<Self, MapError> {
        let position = Arc::new(Mutex::new(None));
        let using_fallback = Arc::new(AtomicBool::new(false));
        let (first_tx, first_rx) = oneshot::channel();

        let on_update = {
            let adapter = Arc::clone(&adapter);
            let coordinator = Arc::clone(&coordinator);
            let position = Arc::clone(&position);
            let mut first_tx = Some(first_tx);
            move |update: Coordinate| {
                *position.lock() = Some(update);
                coordinator.set_current_location(update);
                if let Err(e) = adapter.set_live_marker(update) {
                    tracing::debug!(error = %e, "Live marker not updated");
                }
                if let Some(tx) = first_tx.take() {
                    let _ = tx.send(update);
                }
            }
        };
        let on_unavailable = {
            let using_fallback = Arc::clone(&using_fallback);
            move || using_fallback.store(true, Ordering::SeqCst)
        };

        let tracker = LocationTracker::with_config(geolocation, tracker_config)
            .start(on_update, on_unavailable);

        let center = first_rx.await.map_err(|_| {
            MapError::Unavailable("location tracking stopped before a position".to_string())
        })?;

        adapter.initialize(center).await?;
        adapter.render_zones(&zones)?;

        tracing::info!(
            center = %center,
            fallback = using_fallback.load(Ordering::SeqCst),
            zones = zones.len(),
            "Safety map mounted"
        );

        Ok(Self {
            adapter,
            coordinator,
            zones,
            position,
            using_fallback,
            tracker,
        })
    }

    /// Request a route and render it unless a newer request overtakes it.
    pub async fn find_route(
        &self,
        origin_text: &str,
        destination_text: &str,
    ) -> Result<RouteDelivery, MapError> {
        self.coordinator
            .route_on_map(origin_text, destination_text, &self.adapter)
            .await
    }

    pub fn current_location(&self) -> Option<Coordinate> {
        *self.position.lock()
    }

    /// True when location was unavailable and the fallback is in use.
    pub fn is_using_fallback(&self) -> bool {
        self.using_fallback.load(Ordering::SeqCst)
    }

    /// Most severe advisory level at the current location.
    pub fn safety_level(&self) -> Option<SafetyLevel> {
        self.current_location()
            .and_then(|position| assess(&position, &self.zones))
    }

    pub fn zones(&self) -> &[AdvisoryZone] {
        &self.zones
    }

    pub fn map(&self) -> &MapClientAdapter<L> {
        &self.adapter
    }

    pub fn coordinator(&self) -> &RouteRequestCoordinator<S, R> {
        &self.coordinator
    }

    /// Stop location updates. The map keeps its last state.
    pub fn close(self) {
        self.tracker.cancel();
        tracing::debug!("Safety map closed");
    }
}
