//! SafePath - live location, advisory zones and routes on a mapping capability
//!
//! The library is a thin client around external capabilities (a mapping
//! widget loader, place search, routing, device geolocation). It provides:
//!
//! - [`location`]: a tracker that always produces a position, falling back to
//!   a fixed city center when location is unavailable
//! - [`map`]: a single-load map adapter that owns markers, zones and routes
//! - [`route`]: a coordinator that resolves free text to routes and keeps a
//!   slow, superseded response from replacing a newer one
//! - [`provider`]: the Google Maps Platform implementation of the capabilities
//!
//! # High-Level API
//!
//! [`session::SafetyMap`] wires everything together for one mounted view:
//!
//! ```ignore
//! use std::sync::Arc;
//! use safepath::location::{FixedGeolocation, TrackerConfig};
//! use safepath::map::{MapClientAdapter, MapContainer};
//! use safepath::provider::{AsyncReqwestClient, GoogleMapsClient, GoogleMapsLoader};
//! use safepath::route::RouteRequestCoordinator;
//! use safepath::session::SafetyMap;
//!
//! let http = AsyncReqwestClient::new()?;
//! let adapter = Arc::new(MapClientAdapter::new(
//!     GoogleMapsLoader::new(http.clone(), &api_key),
//!     MapContainer::default(),
//! ));
//! let google = GoogleMapsClient::new(http, &api_key);
//! let coordinator = Arc::new(RouteRequestCoordinator::new(google.clone(), google));
//!
//! let map = SafetyMap::mount(geolocation, TrackerConfig::default(), adapter, coordinator, zones).await?;
//! let delivery = map.find_route("", "India Gate").await?;
//! ```

pub mod config;
pub mod coord;
pub mod location;
pub mod logging;
pub mod map;
pub mod provider;
pub mod route;
pub mod session;
pub mod zone;

/// Version of the SafePath library and CLI.
///
/// Defined in the workspace `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
