//! Mapping capability providers.
//!
//! The provider layer is where the crate touches the network. Everything is
//! generic over [`AsyncHttpClient`] so tests run against
//! `MockAsyncHttpClient` (the `test-util` feature exposes it to other crates).
//!
//! - [`GoogleMapsClient`] implements [`PlaceSearch`](crate::route::PlaceSearch)
//!   and [`RoutePlanner`](crate::route::RoutePlanner)
//! - [`GoogleMapsLoader`] implements [`MapLoader`](crate::map::MapLoader)

mod google;
mod http;
mod types;

pub use google::{is_placeholder_key, GoogleMapsClient, GoogleMapsLoader, PLACEHOLDER_API_KEY};
#[cfg(any(test, feature = "test-util"))]
pub use http::tests::MockAsyncHttpClient;
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::ProviderError;
