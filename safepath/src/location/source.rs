//! Geolocation capability abstraction.
//!
//! The platform position service is modelled as a trait with a one-shot
//! query and a continuous watch, so the tracker can run against a real
//! device feed, a fixed position, or a scripted test double.

use std::future::Future;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::coord::Coordinate;

/// Why a position could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user denied (or dismissed) the location permission prompt.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The platform has no location capability.
    #[error("No location capability available")]
    Unsupported,

    /// The platform could not determine a position.
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// No fix arrived within the allowed time.
    #[error("Timed out waiting for a position fix")]
    Timeout,
}

/// Stream of position reports from a watch.
pub type PositionWatch = mpsc::Receiver<Result<Coordinate, LocationError>>;

/// Trait for platform geolocation services.
pub trait Geolocation: Send + Sync + 'static {
    /// Resolves the current position once.
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;

    /// Starts a continuous watch.
    ///
    /// Cadence and accuracy are platform-controlled. Dropping the receiver
    /// ends the watch; the channel closing means no further updates.
    fn watch_position(&self) -> Result<PositionWatch, LocationError>;
}

/// A source that always reports the same position and never moves.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation {
    position: Coordinate,
}

impl FixedGeolocation {
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

impl Geolocation for FixedGeolocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.position)
    }

    fn watch_position(&self) -> Result<PositionWatch, LocationError> {
        // Sender dropped immediately: the watch completes with no updates.
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }
}

/// A source that never yields a position.
#[derive(Debug, Clone)]
pub struct UnavailableGeolocation {
    error: LocationError,
}

impl UnavailableGeolocation {
    /// Permission prompt denied.
    pub fn denied() -> Self {
        Self {
            error: LocationError::PermissionDenied,
        }
    }

    /// No location hardware or service.
    pub fn unsupported() -> Self {
        Self {
            error: LocationError::Unsupported,
        }
    }
}

impl Geolocation for UnavailableGeolocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(self.error.clone())
    }

    fn watch_position(&self) -> Result<PositionWatch, LocationError> {
        Err(self.error.clone())
    }
}

/// A source fed from outside: an initial fix plus a channel of updates.
///
/// The watch can be taken once; later calls report
/// [`LocationError::PositionUnavailable`].
pub struct ChannelGeolocation {
    initial: Result<Coordinate, LocationError>,
    updates: Mutex<Option<PositionWatch>>,
}

impl ChannelGeolocation {
    /// Creates the source and the sender used to push updates into it.
    pub fn new(
        initial: Result<Coordinate, LocationError>,
        capacity: usize,
    ) -> (Self, mpsc::Sender<Result<Coordinate, LocationError>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let source = Self {
            initial,
            updates: Mutex::new(Some(rx)),
        };
        (source, tx)
    }
}

impl Geolocation for ChannelGeolocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        self.initial.clone()
    }

    fn watch_position(&self) -> Result<PositionWatch, LocationError> {
        self.updates.lock().take().ok_or_else(|| {
            LocationError::PositionUnavailable("position watch already taken".to_string())
        })
    }
}
