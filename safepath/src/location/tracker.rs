//! Location tracker - resolves a starting position, then follows the device.
//!
//! The tracker runs as an async task:
//!
//! 1. One-shot fix, bounded by [`TrackerConfig::fix_timeout`].
//! 2. On failure (denied, unsupported, unavailable, timeout) the
//!    `on_unavailable` callback fires and the fallback coordinate is
//!    delivered through `on_update` exactly like a real fix.
//! 3. After a real fix, every watch update is forwarded until the watch
//!    ends or the [`TrackerHandle`] is cancelled.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::source::{Geolocation, LocationError};
use crate::coord::Coordinate;

/// Position used when no real fix can be obtained.
pub const FALLBACK_LOCATION: Coordinate = Coordinate::NEW_DELHI;

/// Default time allowed for the initial fix.
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(10);

/// Tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Maximum wait for the initial one-shot fix.
    pub fix_timeout: Duration,
    /// Coordinate substituted when location is unavailable.
    pub fallback: Coordinate,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            fix_timeout: DEFAULT_FIX_TIMEOUT,
            fallback: FALLBACK_LOCATION,
        }
    }
}

/// Follows the user's position through a [`Geolocation`] source.
pub struct LocationTracker<G: Geolocation> {
    source: Arc<G>,
    config: TrackerConfig,
}

impl<G: Geolocation> LocationTracker<G> {
    /// Create a tracker with default configuration.
    pub fn new(source: G) -> Self {
        Self::with_config(source, TrackerConfig::default())
    }

    /// Create a tracker with custom configuration.
    pub fn with_config(source: G, config: TrackerConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    /// Start tracking.
    ///
    /// `on_update` receives the first position (real or fallback) and every
    /// later movement. `on_unavailable` fires at most once, before the
    /// fallback is delivered. Errors are never returned to the caller.
    ///
    /// Callbacks must not cancel or drop the returned handle themselves.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<U, N>(&self, mut on_update: U, on_unavailable: N) -> TrackerHandle
    where
        U: FnMut(Coordinate) + Send + 'static,
        N: FnOnce() + Send + 'static,
    {
        let gate = CallbackGate::default();
        let task_gate = gate.clone();
        let source = Arc::clone(&self.source);
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            let first = tokio::select! {
                biased;
                _ = task_gate.token.cancelled() => return,
                result = tokio::time::timeout(config.fix_timeout, source.current_position()) => {
                    result.unwrap_or(Err(LocationError::Timeout))
                }
            };

            let position = match first {
                Ok(position) => position,
                Err(error) => {
                    task_gate.run(|| {
                        tracing::warn!(
                            error = %error,
                            fallback = %config.fallback,
                            "Location unavailable, using fallback position"
                        );
                        on_unavailable();
                        on_update(config.fallback);
                    });
                    return;
                }
            };

            tracing::debug!(position = %position, "Initial position fix");
            if !task_gate.run(|| on_update(position)) {
                return;
            }

            let mut watch = match source.watch_position() {
                Ok(watch) => watch,
                Err(error) => {
                    tracing::debug!(error = %error, "Position watch not available");
                    return;
                }
            };

            loop {
                tokio::select! {
                    biased;
                    _ = task_gate.token.cancelled() => break,
                    update = watch.recv() => match update {
                        Some(Ok(position)) => {
                            tracing::trace!(position = %position, "Position update");
                            if !task_gate.run(|| on_update(position)) {
                                break;
                            }
                        }
                        Some(Err(error)) => {
                            tracing::warn!(error = %error, "Position watch error");
                        }
                        None => break,
                    }
                }
            }

            tracing::debug!("Location tracking stopped");
        });

        TrackerHandle {
            gate,
            task: Some(task),
        }
    }
}

/// Cancellation flag plus a lock held while a callback runs.
#[derive(Debug, Clone, Default)]
struct CallbackGate {
    token: CancellationToken,
    running: Arc<Mutex<()>>,
}

impl CallbackGate {
    /// Runs `callback` unless cancelled. Returns false when cancelled.
    fn run(&self, callback: impl FnOnce()) -> bool {
        let _running = self.running.lock();
        if self.token.is_cancelled() {
            return false;
        }
        callback();
        true
    }

    /// Cancels, then waits for an in-flight callback to return.
    fn close(&self) {
        self.token.cancel();
        drop(self.running.lock());
    }
}

/// Cancellation handle for a running tracker.
///
/// Dropping the handle cancels tracking, so a torn-down view never receives
/// late updates.
#[derive(Debug)]
pub struct TrackerHandle {
    gate: CallbackGate,
    task: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    /// Stop all further updates. Safe to call repeatedly or after the
    /// tracker has finished on its own.
    ///
    /// If a callback is running on another thread, waits for it to return;
    /// no callback runs once this returns.
    pub fn cancel(&self) {
        self.gate.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.gate.token.is_cancelled()
    }

    /// True once the tracking task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait for the tracking task to exit (watch ended or cancelled).
    pub async fn finished(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Location tracking task failed");
            }
        }
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.gate.close();
    }
}
