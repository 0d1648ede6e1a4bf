//! Map client adapter.
//!
//! Owns one mounted widget for the lifetime of a map session. The external
//! capability is loaded at most once, on a task of its own, so a caller that
//! stops waiting does not abort the load. Operations issued while the load
//! is in flight are buffered and replayed when it completes.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::types::{
    AdapterState, CircleStyle, LineStyle, MapContainer, MapError, MapSession, MarkerStyle,
    OverlayId, DEFAULT_ZOOM, LIVE_ACCURACY_RADIUS_METERS,
};
use super::widget::{MapLoader, MapWidget};
use crate::coord::{Coordinate, LatLngBounds};
use crate::route::{RouteResult, RouteStatus};
use crate::zone::AdvisoryZone;

/// Adapter between the application and a [`MapLoader`]'s widget.
///
/// # Operations before `Ready`
///
/// [`set_live_marker`](Self::set_live_marker),
/// [`render_zones`](Self::render_zones) and
/// [`render_route`](Self::render_route) are accepted in every state except
/// `Failed`. Before the widget is mounted the latest value of each kind is
/// kept and replayed once, in the order marker, zones, route. After a failed
/// load they return [`MapError::Unavailable`] and anything still buffered is
/// discarded.
pub struct MapClientAdapter<L: MapLoader> {
    loader: Arc<L>,
    container: MapContainer,
    zoom: u8,
    outcome: Arc<watch::Sender<LoadOutcome>>,
    inner: Arc<Mutex<AdapterInner<L::Widget>>>,
}

/// Result of the capability load, `None` until it has finished.
type LoadOutcome = Option<Result<(), MapError>>;

struct LiveMarker {
    marker: OverlayId,
    accuracy: OverlayId,
    position: Coordinate,
}

struct RenderedRoute {
    overlays: Vec<OverlayId>,
    result: RouteResult,
}

#[derive(Default)]
struct Pending {
    live_marker: Option<Coordinate>,
    zones: Option<Vec<AdvisoryZone>>,
    route: Option<RouteResult>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.live_marker.is_none() && self.zones.is_none() && self.route.is_none()
    }
}

struct AdapterInner<W> {
    state: AdapterState,
    widget: Option<W>,
    live_marker: Option<LiveMarker>,
    zones: Vec<OverlayId>,
    route: Option<RenderedRoute>,
    pending: Pending,
    /// Highest route sequence accepted by `render_route_if_newer`.
    route_seq: u64,
}

impl<L: MapLoader> MapClientAdapter<L> {
    pub fn new(loader: L, container: MapContainer) -> Self {
        Self::with_zoom(loader, container, DEFAULT_ZOOM)
    }

    /// Create an adapter whose widget mounts at `zoom`.
    pub fn with_zoom(loader: L, container: MapContainer, zoom: u8) -> Self {
        let (outcome, _) = watch::channel(None);
        Self {
            loader: Arc::new(loader),
            container,
            zoom,
            outcome: Arc::new(outcome),
            inner: Arc::new(Mutex::new(AdapterInner {
                state: AdapterState::Uninitialized,
                widget: None,
                live_marker: None,
                zones: Vec::new(),
                route: None,
                pending: Pending::default(),
                route_seq: 0,
            })),
        }
    }

    pub fn state(&self) -> AdapterState {
        self.inner.lock().state.clone()
    }

    pub fn container(&self) -> &MapContainer {
        &self.container
    }

    /// Load the mapping capability and mount the widget centered on `center`.
    ///
    /// The first call starts the load; it runs once per adapter, whatever
    /// happens to the callers. Every caller, now or later, receives its
    /// outcome, and dropping an `initialize` future only stops that caller
    /// from waiting. A failure is permanent for this instance.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn initialize(&self, center: Coordinate) -> Result<(), MapError> {
        let mut outcome = self.outcome.subscribe();
        self.start_load(center);

        let finished = match outcome.wait_for(Option::is_some).await {
            Ok(finished) => (*finished).clone(),
            Err(_) => None,
        };
        finished.unwrap_or_else(|| Err(MapError::Unavailable("map load abandoned".to_string())))
    }

    /// Spawns the load unless one was already claimed.
    fn start_load(&self, center: Coordinate) {
        {
            let mut inner = self.inner.lock();
            if inner.state != AdapterState::Uninitialized {
                return;
            }
            inner.state = AdapterState::Loading;
        }
        tracing::info!(
            container = %self.container.element_id,
            center = %center,
            zoom = self.zoom,
            "Loading map capability"
        );

        let loader = Arc::clone(&self.loader);
        let container = self.container.clone();
        let zoom = self.zoom;
        let inner = Arc::clone(&self.inner);
        let outcome = Arc::clone(&self.outcome);

        tokio::spawn(async move {
            // Separate task so a panicking loader still produces an outcome.
            let load = tokio::spawn(async move { loader.load(&container, center, zoom).await });
            let loaded = load.await.unwrap_or_else(|e| {
                Err(MapError::CapabilityLoad(format!("loader task failed: {}", e)))
            });

            let result = inner.lock().finish_load(loaded);
            outcome.send_replace(Some(result));
        });
    }

    /// Place the live-position marker, moving it if it already exists.
    pub fn set_live_marker(&self, position: Coordinate) -> Result<(), MapError> {
        let mut inner = self.inner.lock();
        if inner.accepting()? {
            inner.apply_live_marker(position);
        } else {
            inner.pending.live_marker = Some(position);
        }
        Ok(())
    }

    /// Replace every rendered zone with `zones`.
    pub fn render_zones(&self, zones: &[AdvisoryZone]) -> Result<(), MapError> {
        let mut inner = self.inner.lock();
        if inner.accepting()? {
            inner.apply_zones(zones);
        } else {
            tracing::debug!(count = zones.len(), "Buffering zones until map is ready");
            inner.pending.zones = Some(zones.to_vec());
        }
        Ok(())
    }

    /// Replace the rendered route.
    ///
    /// A result whose status is not `Ok` clears the route and leaves markers
    /// and zones in place.
    pub fn render_route(&self, route: &RouteResult) -> Result<(), MapError> {
        let mut inner = self.inner.lock();
        inner.submit_route(route)
    }

    /// Render `route` unless a route with a higher sequence number has
    /// already been accepted. Returns `Ok(false)` for a stale route.
    pub fn render_route_if_newer(&self, sequence: u64, route: &RouteResult) -> Result<bool, MapError> {
        let mut inner = self.inner.lock();
        inner.accepting()?;
        if sequence < inner.route_seq {
            tracing::debug!(
                sequence,
                latest = inner.route_seq,
                "Discarding route from superseded request"
            );
            return Ok(false);
        }
        inner.route_seq = sequence;
        inner.submit_route(route)?;
        Ok(true)
    }

    /// Snapshot of the mounted session, `None` until the map is ready.
    pub fn session(&self) -> Option<MapSession> {
        let inner = self.inner.lock();
        let widget = inner.widget.as_ref()?;
        Some(MapSession {
            center: widget.center(),
            zoom: widget.zoom(),
            live_marker: inner.live_marker.as_ref().map(|live| live.position),
            active_route: inner.route.as_ref().map(|route| route.result.clone()),
        })
    }

    /// Run `f` against the mounted widget.
    pub fn with_widget<R>(&self, f: impl FnOnce(&L::Widget) -> R) -> Option<R> {
        self.inner.lock().widget.as_ref().map(f)
    }
}

impl<W: MapWidget> AdapterInner<W> {
    fn finish_load(&mut self, loaded: Result<W, MapError>) -> Result<(), MapError> {
        match loaded {
            Ok(widget) => {
                self.widget = Some(widget);
                self.state = AdapterState::Ready;
                self.replay_pending();
                tracing::info!("Map ready");
                Ok(())
            }
            Err(error) => {
                let reason = error.to_string();
                if !self.pending.is_empty() {
                    tracing::warn!("Discarding map operations buffered before failed load");
                }
                self.pending = Pending::default();
                self.state = AdapterState::Failed(reason.clone());
                tracing::error!(error = %reason, "Map capability failed to load");
                Err(error)
            }
        }
    }

    /// `Ok(true)` when operations apply immediately, `Ok(false)` when they
    /// must be buffered.
    fn accepting(&self) -> Result<bool, MapError> {
        match &self.state {
            AdapterState::Ready => Ok(true),
            AdapterState::Failed(reason) => Err(MapError::Unavailable(reason.clone())),
            AdapterState::Uninitialized | AdapterState::Loading => Ok(false),
        }
    }

    fn submit_route(&mut self, route: &RouteResult) -> Result<(), MapError> {
        if self.accepting()? {
            self.apply_route(route);
        } else {
            self.pending.route = Some(route.clone());
        }
        Ok(())
    }

    fn replay_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if let Some(position) = pending.live_marker {
            self.apply_live_marker(position);
        }
        if let Some(zones) = pending.zones {
            tracing::debug!(count = zones.len(), "Replaying buffered zones");
            self.apply_zones(&zones);
        }
        if let Some(route) = pending.route {
            self.apply_route(&route);
        }
    }

    fn apply_live_marker(&mut self, position: Coordinate) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        match self.live_marker.as_mut() {
            Some(live) => {
                widget.move_overlay(live.marker, position);
                widget.move_overlay(live.accuracy, position);
                live.position = position;
            }
            None => {
                let marker = widget.add_marker(position, &MarkerStyle::live());
                let accuracy = widget.add_circle(
                    position,
                    LIVE_ACCURACY_RADIUS_METERS,
                    &CircleStyle::accuracy(),
                );
                self.live_marker = Some(LiveMarker {
                    marker,
                    accuracy,
                    position,
                });
            }
        }
    }

    fn apply_zones(&mut self, zones: &[AdvisoryZone]) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        for id in self.zones.drain(..) {
            widget.remove_overlay(id);
        }
        self.zones = zones
            .iter()
            .map(|zone| {
                widget.add_circle(
                    zone.center,
                    zone.radius_meters,
                    &CircleStyle::zone(zone.level.color()),
                )
            })
            .collect();
    }

    fn apply_route(&mut self, route: &RouteResult) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };
        if let Some(previous) = self.route.take() {
            for id in previous.overlays {
                widget.remove_overlay(id);
            }
        }

        if route.status != RouteStatus::Ok {
            tracing::debug!(status = %route.status, "Cleared route");
            return;
        }
        let (Some(origin), Some(destination)) = (route.origin, route.destination) else {
            tracing::warn!("Route marked Ok without resolved endpoints; not drawn");
            return;
        };

        let path = if route.path.is_empty() {
            vec![origin, destination]
        } else {
            route.path.clone()
        };
        let line = widget.add_polyline(&path, &LineStyle::route());
        let title = route
            .summary
            .clone()
            .unwrap_or_else(|| "Destination".to_string());
        let marker = widget.add_marker(destination, &MarkerStyle::destination(title));

        let mut bounds = LatLngBounds::from_point(origin);
        bounds.extend(&destination);
        for point in &path {
            bounds.extend(point);
        }
        widget.fit_bounds(&bounds);

        self.route = Some(RenderedRoute {
            overlays: vec![line, marker],
            result: route.clone(),
        });
    }
}
