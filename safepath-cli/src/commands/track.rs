//! `safepath track`: follow positions read from stdin.
//!
//! Each input line is `lat,lon`. The first line is the initial fix; end of
//! input before any position behaves like a denied location prompt and the
//! fallback is reported instead. Unparseable lines are reported and skipped.

use std::path::PathBuf;

use clap::Args;
use safepath::coord::Coordinate;
use safepath::location::{ChannelGeolocation, LocationError, LocationTracker};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::commands::zones::status_line;
use crate::error::CliError;
use crate::runner::CliRunner;

const UPDATE_CAPACITY: usize = 32;

/// Arguments for the track command.
#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Zone file (defaults to zones.file from config.ini)
    #[arg(long)]
    pub zones: Option<PathBuf>,
}

/// Run the track command.
pub async fn run(runner: &CliRunner, args: TrackArgs) -> Result<(), CliError> {
    runner.log_startup("track");
    let zones = runner.zones(args.zones.as_deref())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let initial = next_position(&mut lines).await?;

    let (source, updates) = ChannelGeolocation::new(
        initial.ok_or(LocationError::PermissionDenied),
        UPDATE_CAPACITY,
    );
    let tracker = LocationTracker::with_config(source, runner.config().location.tracker_config());

    let handle = tracker.start(
        move |position| {
            println!("{}  {}", position, status_line(&position, &zones));
        },
        || println!("Location unavailable, using fallback position"),
    );

    let reader = tokio::spawn(forward_positions(lines, updates));

    handle.finished().await;
    match reader.await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "Input reader task failed");
            Ok(())
        }
    }
}

/// Read lines until one parses as a position. `None` at end of input.
async fn next_position<R>(
    lines: &mut tokio::io::Lines<R>,
) -> Result<Option<Coordinate>, CliError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = lines.next_line().await.map_err(CliError::Stdin)? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Coordinate>() {
            Ok(position) => return Ok(Some(position)),
            Err(e) => eprintln!("Ignoring '{}': {}", line, e),
        }
    }
    Ok(None)
}

/// Push every remaining position into the tracker's watch.
///
/// Dropping `updates` at end of input ends the watch.
async fn forward_positions<R>(
    mut lines: tokio::io::Lines<R>,
    updates: mpsc::Sender<Result<Coordinate, LocationError>>,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(position) = next_position(&mut lines).await? {
        if updates.send(Ok(position)).await.is_err() {
            // Tracker stopped; nothing is listening.
            break;
        }
    }
    Ok(())
}
