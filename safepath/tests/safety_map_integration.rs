//! Integration tests for a mounted safety map.
//!
//! These tests verify the complete flows:
//! - Geolocation → LocationTracker → MapClientAdapter (initial center, live marker)
//! - Location denial → fallback center
//! - Zone rendering before the map is ready
//! - RouteRequestCoordinator → MapClientAdapter (stale responses discarded)
//! - Google Maps provider stack against a mock HTTP client
//!
//! Run with: `cargo test --test safety_map_integration`

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use safepath::coord::Coordinate;
use safepath::location::{
    ChannelGeolocation, FixedGeolocation, TrackerConfig, UnavailableGeolocation,
};
use safepath::map::{
    AdapterState, MapClientAdapter, MapContainer, MapError, MapLoader, SceneWidget,
};
use safepath::provider::{GoogleMapsClient, GoogleMapsLoader, MockAsyncHttpClient};
use safepath::route::{
    CapabilityError, PathResponse, PlaceCandidate, PlaceSearch, RoutePath, RoutePlanner,
    RouteRequestCoordinator, RouteStatus,
};
use safepath::session::SafetyMap;
use safepath::zone::{AdvisoryZone, SafetyLevel};

// ============================================================================
// Test Doubles
// ============================================================================

/// Map loader that counts loads, waits before mounting and can fail.
#[derive(Clone)]
struct TestLoader {
    loads: Arc<AtomicUsize>,
    delay: Duration,
    failure: Option<&'static str>,
}

impl TestLoader {
    fn new() -> Self {
        Self {
            loads: Arc::new(AtomicUsize::new(0)),
            delay: Duration::from_millis(5),
            failure: None,
        }
    }

    fn slow(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            ..Self::new()
        }
    }

    fn failing(reason: &'static str) -> Self {
        Self {
            failure: Some(reason),
            ..Self::new()
        }
    }
}

impl MapLoader for TestLoader {
    type Widget = SceneWidget;

    async fn load(
        &self,
        container: &MapContainer,
        center: Coordinate,
        zoom: u8,
    ) -> Result<SceneWidget, MapError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match self.failure {
            Some(reason) => Err(MapError::CapabilityLoad(reason.to_string())),
            None => Ok(SceneWidget::new(container.clone(), center, zoom)),
        }
    }
}

/// Place search backed by a table, with an optional delay per query.
#[derive(Default)]
struct TableSearch {
    places: HashMap<&'static str, (Coordinate, u64)>,
}

impl TableSearch {
    fn with(mut self, name: &'static str, location: Coordinate, delay_ms: u64) -> Self {
        self.places.insert(name, (location, delay_ms));
        self
    }
}

impl PlaceSearch for TableSearch {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, CapabilityError> {
        let Some((location, delay_ms)) = self.places.get(query).copied() else {
            return Ok(Vec::new());
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(vec![PlaceCandidate {
            name: query.to_string(),
            formatted_address: None,
            location,
        }])
    }
}

/// Planner that draws straight lines and counts calls.
#[derive(Default)]
struct StraightPlanner {
    calls: Arc<AtomicUsize>,
}

impl RoutePlanner for StraightPlanner {
    async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<PathResponse, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PathResponse::Found(RoutePath {
            points: vec![origin, destination],
            distance_meters: Some(origin.distance_to(&destination)),
            ..Default::default()
        }))
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

type TestMap = SafetyMap<TestLoader, TableSearch, StraightPlanner>;

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

fn india_gate() -> Coordinate {
    coord(28.6129, 77.2295)
}

fn red_fort() -> Coordinate {
    coord(28.6562, 77.2410)
}

fn chandni_chowk() -> Coordinate {
    coord(28.6506, 77.2303)
}

fn delhi_zones() -> Vec<AdvisoryZone> {
    vec![
        AdvisoryZone::new(Coordinate::NEW_DELHI, 800.0, SafetyLevel::Safe)
            .unwrap()
            .named("Connaught Place"),
        AdvisoryZone::new(chandni_chowk(), 400.0, SafetyLevel::Caution)
            .unwrap()
            .named("Chandni Chowk market"),
        AdvisoryZone::new(chandni_chowk(), 150.0, SafetyLevel::Danger).unwrap(),
    ]
}

fn adapter(loader: TestLoader) -> Arc<MapClientAdapter<TestLoader>> {
    Arc::new(MapClientAdapter::new(loader, MapContainer::default()))
}

fn coordinator() -> Arc<RouteRequestCoordinator<TableSearch, StraightPlanner>> {
    let search = TableSearch::default()
        .with("India Gate", india_gate(), 0)
        .with("Red Fort", red_fort(), 0);
    Arc::new(RouteRequestCoordinator::new(search, StraightPlanner::default()))
}

async fn mount_at(position: Coordinate) -> TestMap {
    SafetyMap::mount(
        FixedGeolocation::new(position),
        TrackerConfig::default(),
        adapter(TestLoader::new()),
        coordinator(),
        delhi_zones(),
    )
    .await
    .expect("map should mount")
}

/// Poll `condition` until it holds or a second passes.
async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

// ============================================================================
// Mount & Location Tests
// ============================================================================

/// Test that a real fix centers the map and places one live marker.
#[tokio::test]
async fn test_mount_centers_on_first_fix() {
    let map = mount_at(india_gate()).await;

    assert_eq!(map.map().state(), AdapterState::Ready);
    assert!(!map.is_using_fallback());

    let session = map.map().session().expect("session should exist");
    assert_eq!(session.center, india_gate());
    assert_eq!(session.live_marker, Some(india_gate()));
    assert_eq!(map.map().with_widget(|w| w.marker_count()), Some(1));
    // three zones plus the accuracy ring
    assert_eq!(map.map().with_widget(|w| w.circle_count()), Some(4));
}

/// Test that a denied permission falls back to the New Delhi city center.
#[tokio::test]
async fn test_denied_location_uses_fallback_center() {
    let map: TestMap = SafetyMap::mount(
        UnavailableGeolocation::denied(),
        TrackerConfig::default(),
        adapter(TestLoader::new()),
        coordinator(),
        delhi_zones(),
    )
    .await
    .unwrap();

    assert!(map.is_using_fallback());
    let center = map.map().session().unwrap().center;
    assert_eq!(center.latitude(), 28.6139);
    assert_eq!(center.longitude(), 77.2090);
    assert_eq!(map.current_location(), Some(Coordinate::NEW_DELHI));
    assert_eq!(map.safety_level(), Some(SafetyLevel::Safe));
}

/// Test that live updates move the marker and change the safety level.
#[tokio::test]
async fn test_live_updates_move_marker() {
    let (source, tx) = ChannelGeolocation::new(Ok(Coordinate::NEW_DELHI), 8);
    let map: TestMap = SafetyMap::mount(
        source,
        TrackerConfig::default(),
        adapter(TestLoader::new()),
        coordinator(),
        delhi_zones(),
    )
    .await
    .unwrap();
    assert_eq!(map.safety_level(), Some(SafetyLevel::Safe));

    tx.send(Ok(chandni_chowk())).await.unwrap();
    wait_for(|| map.current_location() == Some(chandni_chowk())).await;

    assert_eq!(map.safety_level(), Some(SafetyLevel::Danger));
    assert_eq!(map.map().session().unwrap().live_marker, Some(chandni_chowk()));
    assert_eq!(map.map().with_widget(|w| w.marker_count()), Some(1));
    assert_eq!(map.coordinator().current_location(), Some(chandni_chowk()));
}

/// Test that closing the session stops location updates.
#[tokio::test]
async fn test_close_stops_updates() {
    let (source, tx) = ChannelGeolocation::new(Ok(Coordinate::NEW_DELHI), 8);
    let adapter = adapter(TestLoader::new());
    let map: TestMap = SafetyMap::mount(
        source,
        TrackerConfig::default(),
        Arc::clone(&adapter),
        coordinator(),
        Vec::new(),
    )
    .await
    .unwrap();

    map.close();
    // The tracker task exits and drops its receiver.
    wait_for(|| tx.is_closed()).await;

    assert_eq!(
        adapter.session().unwrap().live_marker,
        Some(Coordinate::NEW_DELHI)
    );
}

// ============================================================================
// Adapter Lifecycle Tests
// ============================================================================

/// Test that zones rendered while the adapter is still uninitialized are
/// shown once it becomes ready.
#[tokio::test]
async fn test_zones_before_ready_are_replayed() {
    let adapter = adapter(TestLoader::slow(30));
    adapter.render_zones(&delhi_zones()).unwrap();
    assert_eq!(adapter.state(), AdapterState::Uninitialized);

    let init = {
        let adapter = Arc::clone(&adapter);
        tokio::spawn(async move { adapter.initialize(Coordinate::NEW_DELHI).await })
    };

    wait_for(|| adapter.state() == AdapterState::Loading).await;
    // Replaces the earlier buffered set
    adapter.render_zones(&delhi_zones()[..2]).unwrap();

    init.await.unwrap().unwrap();
    assert_eq!(adapter.state(), AdapterState::Ready);
    assert_eq!(adapter.with_widget(|w| w.circle_count()), Some(2));
}

/// Test that concurrent initialization loads the capability once.
#[tokio::test]
async fn test_concurrent_initialize_coalesces() {
    let loader = TestLoader::slow(20);
    let loads = Arc::clone(&loader.loads);
    let adapter = adapter(loader);

    let (a, b, c) = tokio::join!(
        adapter.initialize(Coordinate::NEW_DELHI),
        adapter.initialize(Coordinate::NEW_DELHI),
        adapter.initialize(india_gate())
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

/// Test that a caller giving up on initialization neither restarts the load
/// nor strands the adapter in `Loading`.
#[tokio::test]
async fn test_initialize_survives_caller_timeout() {
    let loader = TestLoader::slow(30);
    let loads = Arc::clone(&loader.loads);
    let adapter = adapter(loader);
    adapter.set_live_marker(india_gate()).unwrap();

    let gave_up = tokio::time::timeout(
        Duration::from_millis(5),
        adapter.initialize(Coordinate::NEW_DELHI),
    )
    .await;
    assert!(gave_up.is_err());

    adapter.initialize(Coordinate::NEW_DELHI).await.unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(adapter.state(), AdapterState::Ready);
    assert_eq!(adapter.session().unwrap().live_marker, Some(india_gate()));
}

/// Test that a load failure fails the mount and is terminal.
#[tokio::test]
async fn test_capability_failure_fails_mount() {
    let adapter = adapter(TestLoader::failing("API key rejected"));

    let result: Result<TestMap, MapError> = SafetyMap::mount(
        FixedGeolocation::new(Coordinate::NEW_DELHI),
        TrackerConfig::default(),
        Arc::clone(&adapter),
        coordinator(),
        delhi_zones(),
    )
    .await;

    assert!(matches!(result, Err(MapError::CapabilityLoad(ref r)) if r == "API key rejected"));
    assert_eq!(
        adapter.state(),
        AdapterState::Failed("Map capability failed to load: API key rejected".to_string())
    );
    assert!(matches!(
        adapter.render_zones(&delhi_zones()),
        Err(MapError::Unavailable(_))
    ));
    // No retry on later calls
    assert!(adapter.initialize(Coordinate::NEW_DELHI).await.is_err());
}

// ============================================================================
// Route Tests
// ============================================================================

/// Test a route from the current location to a searched place.
#[tokio::test]
async fn test_route_from_current_location() {
    let map = mount_at(Coordinate::NEW_DELHI).await;

    let delivery = map.find_route("Your Current Location", "India Gate").await.unwrap();

    assert!(delivery.is_applied());
    let result = delivery.result();
    assert_eq!(result.status, RouteStatus::Ok);
    assert_eq!(result.origin, Some(Coordinate::NEW_DELHI));
    assert_eq!(result.destination, Some(india_gate()));

    let session = map.map().session().unwrap();
    assert_eq!(session.active_route.as_ref(), Some(result));
    assert_eq!(map.map().with_widget(|w| w.polyline_count()), Some(1));
}

/// Test that an empty destination never reaches the routing capability.
#[tokio::test]
async fn test_empty_destination_not_routed() {
    let planner = StraightPlanner::default();
    let calls = Arc::clone(&planner.calls);
    let search = TableSearch::default().with("Red Fort", red_fort(), 0);
    let coordinator = RouteRequestCoordinator::new(search, planner);
    coordinator.set_current_location(Coordinate::NEW_DELHI);

    let result = coordinator.find_route("Red Fort", "").await;
    assert_eq!(result.status, RouteStatus::NotFound);
    let result = coordinator.find_route("", "   ").await;
    assert_eq!(result.status, RouteStatus::NotFound);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Test that a failed route clears the old route but keeps the live marker.
#[tokio::test]
async fn test_unknown_destination_clears_route() {
    let map = mount_at(Coordinate::NEW_DELHI).await;
    map.find_route("", "Red Fort").await.unwrap();

    let delivery = map.find_route("", "Atlantis").await.unwrap();

    assert_eq!(delivery.result().status, RouteStatus::NotFound);
    let session = map.map().session().unwrap();
    assert!(session.active_route.is_none());
    assert_eq!(session.live_marker, Some(Coordinate::NEW_DELHI));
}

/// Test that the later-issued request wins even when the earlier one
/// resolves last.
#[tokio::test]
async fn test_overlapping_requests_keep_latest() {
    let search = TableSearch::default()
        .with("Red Fort", red_fort(), 100)
        .with("India Gate", india_gate(), 0);
    let coordinator = Arc::new(RouteRequestCoordinator::new(
        search,
        StraightPlanner::default(),
    ));
    let map: TestMap = SafetyMap::mount(
        FixedGeolocation::new(Coordinate::NEW_DELHI),
        TrackerConfig::default(),
        adapter(TestLoader::new()),
        coordinator,
        Vec::new(),
    )
    .await
    .unwrap();

    let (slow, fast) = tokio::join!(map.find_route("", "Red Fort"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        map.find_route("", "India Gate").await
    });

    assert!(!slow.unwrap().is_applied());
    assert!(fast.unwrap().is_applied());
    let active = map.map().session().unwrap().active_route.unwrap();
    assert_eq!(active.destination, Some(india_gate()));
}

// ============================================================================
// Google Provider Stack
// ============================================================================

const GEOCODE_OK: &str = r#"{"status":"OK","results":[]}"#;

const FIND_INDIA_GATE: &str = r#"{
    "status": "OK",
    "candidates": [
        {
            "name": "India Gate",
            "formatted_address": "Kartavya Path, New Delhi",
            "geometry": { "location": { "lat": 28.6129, "lng": 77.2295 } }
        }
    ]
}"#;

const DIRECTIONS_OK: &str = r#"{
    "status": "OK",
    "routes": [
        {
            "summary": "Kartavya Path",
            "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
            "legs": [ { "distance": { "value": 2400 }, "duration": { "value": 540 } } ]
        }
    ]
}"#;

/// Test the full Google-backed stack end to end with a mock HTTP client.
#[tokio::test]
async fn test_google_stack_routes_and_exports() {
    let http = MockAsyncHttpClient::json(GEOCODE_OK)
        .route("findplacefromtext", FIND_INDIA_GATE)
        .route("directions", DIRECTIONS_OK);
    let google = GoogleMapsClient::new(http.clone(), "test_key").with_region("in");
    let adapter = Arc::new(MapClientAdapter::new(
        GoogleMapsLoader::new(http.clone(), "test_key"),
        MapContainer::default(),
    ));
    let coordinator = Arc::new(RouteRequestCoordinator::new(google.clone(), google));

    let map = SafetyMap::mount(
        FixedGeolocation::new(Coordinate::NEW_DELHI),
        TrackerConfig::default(),
        adapter,
        coordinator,
        delhi_zones(),
    )
    .await
    .unwrap();

    let delivery = map.find_route("", "India Gate").await.unwrap();
    let result = delivery.result();
    assert_eq!(result.status, RouteStatus::Ok);
    assert_eq!(result.summary.as_deref(), Some("Kartavya Path"));
    assert_eq!(result.duration_secs, Some(540));

    let geojson = map.map().with_widget(|w| w.to_geojson()).unwrap();
    let kinds: Vec<&str> = geojson["features"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["properties"]["overlay"].as_str())
        .collect();
    assert!(kinds.contains(&"polyline"));
    assert_eq!(kinds.iter().filter(|k| **k == "marker").count(), 2);

    let requests = http.requests();
    assert!(requests[0].contains("/geocode/json"));
    assert!(requests.iter().all(|url| url.contains("key=test_key")));
}

/// Test that the placeholder key fails the mount without any network call.
#[tokio::test]
async fn test_google_placeholder_key_fails_mount() {
    let http = MockAsyncHttpClient::json(GEOCODE_OK);
    let google = GoogleMapsClient::new(http.clone(), "YOUR_API_KEY_HERE");
    let adapter = Arc::new(MapClientAdapter::new(
        GoogleMapsLoader::new(http.clone(), "YOUR_API_KEY_HERE"),
        MapContainer::default(),
    ));

    let result = SafetyMap::mount(
        UnavailableGeolocation::unsupported(),
        TrackerConfig::default(),
        adapter,
        Arc::new(RouteRequestCoordinator::new(google.clone(), google)),
        Vec::new(),
    )
    .await;

    assert!(matches!(result, Err(MapError::CapabilityLoad(_))));
    assert!(http.requests().is_empty());
}
