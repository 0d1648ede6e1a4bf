//! Advisory zones.
//!
//! An advisory zone is a circle on the map tagged with a qualitative safety
//! level. Zone data is supplied from outside the crate (a JSON file or the
//! caller); this module only validates it and answers "which level applies
//! here?".

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::Coordinate;

/// Qualitative safety level, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Safe,
    Caution,
    Danger,
}

impl SafetyLevel {
    /// Overlay color used when the zone is drawn.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Safe => "#00C49F",
            Self::Caution => "#F59E0B",
            Self::Danger => "#EF4444",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "Safe Zone",
            Self::Caution => "Caution Zone",
            Self::Danger => "Danger Zone",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Caution => write!(f, "caution"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

impl FromStr for SafetyLevel {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "caution" => Ok(Self::Caution),
            "danger" => Ok(Self::Danger),
            other => Err(ZoneError::UnknownLevel(other.to_string())),
        }
    }
}

/// Errors raised while building or loading advisory zones.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// Zone file could not be read.
    #[error("Failed to read zone file: {0}")]
    Io(#[from] std::io::Error),

    /// Zone file is not a valid JSON zone list.
    #[error("Failed to parse zone file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Radius must be finite and strictly positive.
    #[error("Invalid zone radius: {0} (must be a positive number of meters)")]
    InvalidRadius(f64),

    /// Unrecognised safety level name.
    #[error("Unknown safety level '{0}' (expected safe, caution or danger)")]
    UnknownLevel(String),
}

/// A circular region tagged with a safety level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryZone {
    pub center: Coordinate,
    pub radius_meters: f64,
    pub level: SafetyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AdvisoryZone {
    /// Creates a zone, validating the radius.
    pub fn new(center: Coordinate, radius_meters: f64, level: SafetyLevel) -> Result<Self, ZoneError> {
        let zone = Self {
            center,
            radius_meters,
            level,
            name: None,
        };
        zone.validate()?;
        Ok(zone)
    }

    /// Attaches a display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Checks invariants that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ZoneError> {
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(ZoneError::InvalidRadius(self.radius_meters));
        }
        Ok(())
    }

    /// Returns true if `position` lies inside the zone (boundary included).
    pub fn contains(&self, position: &Coordinate) -> bool {
        self.center.distance_to(position) <= self.radius_meters
    }
}

/// Returns the most severe level among the zones containing `position`.
///
/// `None` means the position is outside every known zone.
pub fn assess(position: &Coordinate, zones: &[AdvisoryZone]) -> Option<SafetyLevel> {
    zones
        .iter()
        .filter(|zone| zone.contains(position))
        .map(|zone| zone.level)
        .max()
}

/// Loads and validates a JSON array of zones.
pub fn load_zones(path: &Path) -> Result<Vec<AdvisoryZone>, ZoneError> {
    let contents = std::fs::read_to_string(path)?;
    let zones: Vec<AdvisoryZone> = serde_json::from_str(&contents)?;

    for zone in &zones {
        zone.validate()?;
    }

    tracing::debug!(path = %path.display(), count = zones.len(), "Advisory zones loaded");
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_level_ordering() {
        assert!(SafetyLevel::Danger > SafetyLevel::Caution);
        assert!(SafetyLevel::Caution > SafetyLevel::Safe);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("Danger".parse::<SafetyLevel>().unwrap(), SafetyLevel::Danger);
        assert!(matches!(
            "risky".parse::<SafetyLevel>(),
            Err(ZoneError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_zone_rejects_bad_radius() {
        let center = Coordinate::NEW_DELHI;
        assert!(matches!(
            AdvisoryZone::new(center, 0.0, SafetyLevel::Safe),
            Err(ZoneError::InvalidRadius(_))
        ));
        assert!(AdvisoryZone::new(center, f64::INFINITY, SafetyLevel::Safe).is_err());
        assert!(AdvisoryZone::new(center, -5.0, SafetyLevel::Safe).is_err());
    }

    #[test]
    fn test_zone_contains() {
        let zone = AdvisoryZone::new(Coordinate::NEW_DELHI, 1_000.0, SafetyLevel::Caution).unwrap();

        // ~550 m north
        assert!(zone.contains(&coord(28.6189, 77.2090)));
        // ~2.2 km north
        assert!(!zone.contains(&coord(28.6339, 77.2090)));
    }

    #[test]
    fn test_assess_picks_most_severe() {
        let zones = vec![
            AdvisoryZone::new(Coordinate::NEW_DELHI, 5_000.0, SafetyLevel::Safe).unwrap(),
            AdvisoryZone::new(Coordinate::NEW_DELHI, 500.0, SafetyLevel::Danger).unwrap(),
            AdvisoryZone::new(coord(28.65, 77.23), 800.0, SafetyLevel::Caution).unwrap(),
        ];

        assert_eq!(
            assess(&Coordinate::NEW_DELHI, &zones),
            Some(SafetyLevel::Danger)
        );
        // Inside the large safe zone only
        assert_eq!(assess(&coord(28.63, 77.209), &zones), Some(SafetyLevel::Safe));
        // Far away
        assert_eq!(assess(&coord(19.07, 72.87), &zones), None);
    }

    #[test]
    fn test_load_zones_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("zones.json");
        std::fs::write(
            &path,
            r#"[
                {"center": {"latitude": 28.6562, "longitude": 77.2410}, "radius_meters": 600, "level": "caution", "name": "Chandni Chowk"},
                {"center": {"latitude": 28.6129, "longitude": 77.2295}, "radius_meters": 400, "level": "safe"}
            ]"#,
        )
        .unwrap();

        let zones = load_zones(&path).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].level, SafetyLevel::Caution);
        assert_eq!(zones[0].name.as_deref(), Some("Chandni Chowk"));
        assert!(zones[1].name.is_none());
    }

    #[test]
    fn test_load_zones_validates_radius() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("zones.json");
        std::fs::write(
            &path,
            r#"[{"center": {"latitude": 28.6, "longitude": 77.2}, "radius_meters": 0, "level": "danger"}]"#,
        )
        .unwrap();

        assert!(matches!(load_zones(&path), Err(ZoneError::InvalidRadius(_))));
    }

    #[test]
    fn test_load_zones_missing_file() {
        let result = load_zones(Path::new("/nonexistent/zones.json"));
        assert!(matches!(result, Err(ZoneError::Io(_))));
    }
}
