//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;
use std::time::Duration;

use crate::coord::Coordinate;
use crate::location::TrackerConfig;

/// Environment variable that overrides `[maps] api_key`.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub maps: MapsSettings,
    pub location: LocationSettings,
    pub zones: ZonesSettings,
    pub logging: LoggingSettings,
}

/// Mapping capability settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MapsSettings {
    /// Google Maps Platform API key (user supplied, stored locally only)
    pub api_key: Option<String>,
    /// Region code biasing routing results (e.g. "in")
    pub region: Option<String>,
    /// Result language (e.g. "en")
    pub language: Option<String>,
    /// Zoom the map mounts at before any route is fitted
    pub default_zoom: u8,
}

/// Location tracking settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    /// Position used when no fix is available
    pub fallback: Coordinate,
    /// Seconds to wait for the initial fix
    pub fix_timeout_secs: u64,
}

impl LocationSettings {
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            fix_timeout: Duration::from_secs(self.fix_timeout_secs),
            fallback: self.fallback,
        }
    }
}

/// Advisory zone data.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonesSettings {
    /// JSON file with advisory zones; none means no zones are shown
    pub file: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl ConfigFile {
    /// The API key in effect: `GOOGLE_MAPS_API_KEY` if set, else the
    /// configured key.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.maps.api_key.as_deref())
    }
}

fn resolve_api_key(from_env: Option<String>, configured: Option<&str>) -> Option<String> {
    from_env
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .or_else(|| configured.map(str::to_string))
}

/// Masks a credential for display, keeping only the last four characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
