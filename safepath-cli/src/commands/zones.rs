//! Advisory zone CLI commands.

use std::path::PathBuf;

use clap::Subcommand;
use safepath::coord::Coordinate;
use safepath::zone::{assess, AdvisoryZone};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Zone action subcommands.
#[derive(Debug, Subcommand)]
pub enum ZonesAction {
    /// Report the safety level at a position (no network access)
    Check {
        /// Position as "lat,lon"
        #[arg(long)]
        at: Coordinate,

        /// Zone file (defaults to zones.file from config.ini)
        #[arg(long)]
        zones: Option<PathBuf>,
    },
}

/// Run a zones subcommand.
pub fn run(runner: &CliRunner, action: ZonesAction) -> Result<(), CliError> {
    match action {
        ZonesAction::Check { at, zones } => {
            let zones = runner.zones(zones.as_deref())?;
            println!("Position: {}", at);
            println!("{}", status_line(&at, &zones));

            for zone in zones.iter().filter(|zone| zone.contains(&at)) {
                println!(
                    "  {} {} ({:.0} m from center, radius {:.0} m)",
                    zone.level.label(),
                    zone.name.as_deref().unwrap_or("(unnamed)"),
                    zone.center.distance_to(&at),
                    zone.radius_meters
                );
            }
            Ok(())
        }
    }
}

/// One-line summary of the advisory level at `position`.
pub fn status_line(position: &Coordinate, zones: &[AdvisoryZone]) -> String {
    match assess(position, zones) {
        Some(level) => format!("Currently in {}", level.label()),
        None if zones.is_empty() => "No advisory zones loaded".to_string(),
        None => "Outside all advisory zones".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safepath::zone::SafetyLevel;

    #[test]
    fn test_status_line() {
        let zones = vec![
            AdvisoryZone::new(Coordinate::NEW_DELHI, 500.0, SafetyLevel::Safe).unwrap(),
            AdvisoryZone::new(Coordinate::NEW_DELHI, 100.0, SafetyLevel::Caution).unwrap(),
        ];
        let far = Coordinate::new(27.1767, 78.0081).unwrap();

        assert_eq!(
            status_line(&Coordinate::NEW_DELHI, &zones),
            "Currently in Caution Zone"
        );
        assert_eq!(status_line(&far, &zones), "Outside all advisory zones");
        assert_eq!(status_line(&far, &[]), "No advisory zones loaded");
    }
}
