//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;

use super::file::ConfigFileError;
use super::keys::{expand_tilde, optional_path, optional_string};
use super::settings::ConfigFile;
use crate::coord::Coordinate;
use crate::map::MAX_ZOOM;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [maps] section
    if let Some(section) = ini.section(Some("maps")) {
        if let Some(v) = section.get("api_key") {
            config.maps.api_key = optional_string(v.trim());
        }
        if let Some(v) = section.get("region") {
            let v = v.trim().to_lowercase();
            if !v.is_empty() && !is_region_code(&v) {
                return Err(invalid("maps", "region", &v, "expected a two-letter region code"));
            }
            config.maps.region = optional_string(&v);
        }
        if let Some(v) = section.get("language") {
            config.maps.language = optional_string(v.trim());
        }
        if let Some(v) = section.get("default_zoom") {
            config.maps.default_zoom = v
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|zoom| *zoom <= MAX_ZOOM)
                .ok_or_else(|| {
                    invalid("maps", "default_zoom", v, "expected an integer from 0 to 21")
                })?;
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("fallback") {
            config.location.fallback = v
                .parse::<Coordinate>()
                .map_err(|e| invalid("location", "fallback", v, &e.to_string()))?;
        }
        if let Some(v) = section.get("fix_timeout_secs") {
            config.location.fix_timeout_secs = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    invalid("location", "fix_timeout_secs", v, "expected a positive integer")
                })?;
        }
    }

    // [zones] section
    if let Some(section) = ini.section(Some("zones")) {
        if let Some(v) = section.get("file") {
            config.zones.file = optional_path(v.trim());
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

pub(super) fn is_region_code(value: &str) -> bool {
    value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic())
}
