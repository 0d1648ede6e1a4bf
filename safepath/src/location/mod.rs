//! User location tracking.
//!
//! - [`source`] - the [`Geolocation`] capability trait and stock sources
//! - [`tracker`] - [`LocationTracker`], which turns a source into a stream of
//!   position callbacks with a fallback when location is unavailable
//!
//! # Usage
//!
//! ```ignore
//! use safepath::location::{LocationTracker, UnavailableGeolocation};
//!
//! let tracker = LocationTracker::new(UnavailableGeolocation::denied());
//! let handle = tracker.start(
//!     |position| println!("now at {}", position),
//!     || println!("location unavailable, using fallback"),
//! );
//! // ... view lifetime ...
//! handle.cancel();
//! ```

mod source;
mod tracker;

pub use source::{
    ChannelGeolocation, FixedGeolocation, Geolocation, LocationError, PositionWatch,
    UnavailableGeolocation,
};
pub use tracker::{
    LocationTracker, TrackerConfig, TrackerHandle, DEFAULT_FIX_TIMEOUT, FALLBACK_LOCATION,
};
