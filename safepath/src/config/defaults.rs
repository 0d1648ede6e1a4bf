//! Default values and the `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::coord::Coordinate;
use crate::location::{DEFAULT_FIX_TIMEOUT, FALLBACK_LOCATION};
use crate::map::DEFAULT_ZOOM;

/// Default routing region (ccTLD).
pub const DEFAULT_REGION: &str = "in";

/// Default fallback position.
pub const DEFAULT_FALLBACK: Coordinate = FALLBACK_LOCATION;

/// Default initial-fix timeout in seconds.
pub const DEFAULT_FIX_TIMEOUT_SECS: u64 = DEFAULT_FIX_TIMEOUT.as_secs();

/// Get the path to the config directory (~/.safepath).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".safepath")
}

/// Get the path to the config file (~/.safepath/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Get the default log file path (~/.safepath/logs/safepath.log).
pub fn default_log_file() -> PathBuf {
    config_directory()
        .join("logs")
        .join(crate::logging::default_log_file())
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            maps: MapsSettings {
                api_key: None,
                region: Some(DEFAULT_REGION.to_string()),
                language: None,
                default_zoom: DEFAULT_ZOOM,
            },
            location: LocationSettings {
                fallback: DEFAULT_FALLBACK,
                fix_timeout_secs: DEFAULT_FIX_TIMEOUT_SECS,
            },
            zones: ZonesSettings { file: None },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}
