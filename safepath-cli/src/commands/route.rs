//! `safepath route`: request a route through Google Maps and export the map.
//!
//! The CLI has no device location service, so `--at` stands in for the
//! current position. Without it the configured fallback is used, exactly as
//! a denied location prompt would behave.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use safepath::coord::Coordinate;
use safepath::location::{FixedGeolocation, Geolocation, UnavailableGeolocation};
use safepath::map::{MapClientAdapter, MapContainer};
use safepath::provider::{AsyncReqwestClient, GoogleMapsClient, GoogleMapsLoader};
use safepath::route::{RouteRequestCoordinator, RouteResult, RouteStatus, CURRENT_LOCATION_LABEL};
use safepath::session::SafetyMap;
use tracing::info;

use crate::commands::zones::status_line;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Place search results are biased to this radius around the start position.
const SEARCH_BIAS_RADIUS_METERS: u32 = 50_000;

/// Arguments for the route command.
#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Destination: a place name or "lat,lon"
    #[arg(long)]
    pub to: String,

    /// Origin: a place name, "lat,lon", or the current location
    #[arg(long, default_value = CURRENT_LOCATION_LABEL)]
    pub from: String,

    /// Current position as "lat,lon" (defaults to location.fallback)
    #[arg(long)]
    pub at: Option<Coordinate>,

    /// Zone file (defaults to zones.file from config.ini)
    #[arg(long)]
    pub zones: Option<PathBuf>,

    /// Write the rendered map as GeoJSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the route result as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the route command.
pub async fn run(runner: &CliRunner, args: RouteArgs) -> Result<(), CliError> {
    runner.log_startup("route");

    match args.at {
        Some(position) => route_with(runner, FixedGeolocation::new(position), &args).await,
        None => route_with(runner, UnavailableGeolocation::unsupported(), &args).await,
    }
}

async fn route_with<G: Geolocation>(
    runner: &CliRunner,
    geolocation: G,
    args: &RouteArgs,
) -> Result<(), CliError> {
    let config = runner.config();
    let api_key = runner.api_key()?;
    let zones = runner.zones(args.zones.as_deref())?;
    let http = AsyncReqwestClient::new()?;

    let start = args.at.unwrap_or(config.location.fallback);
    let mut google = GoogleMapsClient::new(http.clone(), api_key.as_str())
        .with_location_bias(start, SEARCH_BIAS_RADIUS_METERS);
    if let Some(region) = &config.maps.region {
        google = google.with_region(region.as_str());
    }
    if let Some(language) = &config.maps.language {
        google = google.with_language(language.as_str());
    }

    let adapter = Arc::new(MapClientAdapter::with_zoom(
        GoogleMapsLoader::new(http, api_key.as_str()),
        MapContainer::default(),
        config.maps.default_zoom,
    ));
    let coordinator = Arc::new(RouteRequestCoordinator::new(google.clone(), google));

    println!("Loading map...");
    let map = SafetyMap::mount(
        geolocation,
        config.location.tracker_config(),
        adapter,
        coordinator,
        zones,
    )
    .await?;

    if map.is_using_fallback() {
        println!(
            "Location unavailable, using {} as your position",
            config.location.fallback
        );
    }

    info!(from = %args.from, to = %args.to, "Requesting route");
    let result = map.find_route(&args.from, &args.to).await?.into_result();

    if args.json {
        let json = encode_json(&result, "route result")?;
        println!("{}", String::from_utf8_lossy(&json));
    } else {
        print_result(&result);
        if let Some(position) = map.current_location() {
            println!();
            println!("{}", status_line(&position, map.zones()));
        }
    }

    if let Some(path) = &args.output {
        let scene = map
            .map()
            .with_widget(|widget| widget.to_geojson())
            .unwrap_or_default();
        let contents = encode_json(&scene, "map scene")?;
        std::fs::write(path, contents).map_err(|error| CliError::FileWrite {
            path: path.clone(),
            error,
        })?;
        println!("Map written to {}", path.display());
    }

    map.close();
    Ok(())
}

fn print_result(result: &RouteResult) {
    match result.status {
        RouteStatus::Ok => {
            println!(
                "Route: {}",
                result.summary.as_deref().unwrap_or("(no summary)")
            );
            if let (Some(origin), Some(destination)) = (result.origin, result.destination) {
                println!("  From: {}", origin);
                println!("  To:   {}", destination);
            }
            if let Some(meters) = result.distance_meters {
                println!("  Distance: {:.1} km", meters / 1000.0);
            }
            if let Some(secs) = result.duration_secs {
                println!("  Duration: {}", format_duration(secs));
            }
            println!("  Points: {}", result.path.len());
        }
        RouteStatus::NotFound | RouteStatus::Error => {
            println!(
                "Route {}: {}",
                result.status.to_string().to_lowercase(),
                result.detail.as_deref().unwrap_or("no details")
            );
        }
    }
}

/// Pretty JSON for printing or writing.
fn encode_json<T: Serialize>(value: &T, what: &str) -> Result<Vec<u8>, CliError> {
    serde_json::to_vec_pretty(value).map_err(|e| CliError::Output(format!("{}: {}", what, e)))
}

fn format_duration(secs: u64) -> String {
    let minutes = (secs + 30) / 60;
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{} h {} min", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_failure_is_output_error() {
        use std::collections::HashMap;

        let mut by_cell = HashMap::new();
        by_cell.insert((1u8, 2u8), "unencodable key");

        let err = encode_json(&by_cell, "map scene").unwrap_err();

        assert!(matches!(err, CliError::Output(ref msg) if msg.starts_with("map scene:")));
        assert!(encode_json(&RouteResult::not_found(None, None, "x"), "route result").is_ok());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0 min");
        assert_eq!(format_duration(540), "9 min");
        assert_eq!(format_duration(3_600), "1 h 0 min");
        assert_eq!(format_duration(11_100), "3 h 5 min");
    }
}
