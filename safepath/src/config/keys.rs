//! Configuration key access and validation.
//!
//! Type-safe get/set of configuration values by `section.key` name, with
//! validation through value specifications.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use super::parser::is_region_code;
use super::settings::{mask_secret, ConfigFile};
use crate::coord::Coordinate;
use crate::map::MAX_ZOOM;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    MapsApiKey,
    MapsRegion,
    MapsLanguage,
    MapsDefaultZoom,
    LocationFallback,
    LocationFixTimeoutSecs,
    ZonesFile,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == s.to_lowercase())
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical name of this key (e.g., "maps.api_key").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::MapsApiKey => "maps.api_key",
            ConfigKey::MapsRegion => "maps.region",
            ConfigKey::MapsLanguage => "maps.language",
            ConfigKey::MapsDefaultZoom => "maps.default_zoom",
            ConfigKey::LocationFallback => "location.fallback",
            ConfigKey::LocationFixTimeoutSecs => "location.fix_timeout_secs",
            ConfigKey::ZonesFile => "zones.file",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "maps").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "api_key").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Whether the value is a credential that must be masked when shown.
    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::MapsApiKey)
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::MapsApiKey => config.maps.api_key.clone().unwrap_or_default(),
            ConfigKey::MapsRegion => config.maps.region.clone().unwrap_or_default(),
            ConfigKey::MapsLanguage => config.maps.language.clone().unwrap_or_default(),
            ConfigKey::MapsDefaultZoom => config.maps.default_zoom.to_string(),
            ConfigKey::LocationFallback => format!(
                "{}, {}",
                config.location.fallback.latitude(),
                config.location.fallback.longitude()
            ),
            ConfigKey::LocationFixTimeoutSecs => config.location.fix_timeout_secs.to_string(),
            ConfigKey::ZonesFile => config
                .zones
                .file
                .as_ref()
                .map(|p| path_to_display(p))
                .unwrap_or_default(),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
        }
    }

    /// Get the value for display; secrets are masked.
    pub fn display_value(&self, config: &ConfigFile) -> String {
        let value = self.get(config);
        if self.is_secret() {
            mask_secret(&value)
        } else {
            value
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        self.validate(value)?;
        self.set_unchecked(config, value)
    }

    fn set_unchecked(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        match self {
            ConfigKey::MapsApiKey => config.maps.api_key = optional_string(value),
            ConfigKey::MapsRegion => config.maps.region = optional_string(&value.to_lowercase()),
            ConfigKey::MapsLanguage => config.maps.language = optional_string(value),
            ConfigKey::MapsDefaultZoom => config.maps.default_zoom = self.parse(value)?,
            ConfigKey::LocationFallback => config.location.fallback = self.parse(value)?,
            ConfigKey::LocationFixTimeoutSecs => {
                config.location.fix_timeout_secs = self.parse(value)?
            }
            ConfigKey::ZonesFile => config.zones.file = optional_path(value),
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigKeyError> {
        value.parse().map_err(|_| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: format!("cannot parse '{}'", value),
        })
    }

    /// Validate a value without setting it.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value)
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::MapsApiKey | ConfigKey::MapsLanguage => Box::new(AnyStringSpec),
            ConfigKey::MapsRegion => Box::new(RegionCodeSpec),
            ConfigKey::MapsDefaultZoom => Box::new(IntegerRangeSpec {
                min: 0,
                max: u64::from(MAX_ZOOM),
            }),
            ConfigKey::LocationFallback => Box::new(CoordinateSpec),
            ConfigKey::LocationFixTimeoutSecs => Box::new(IntegerRangeSpec {
                min: 1,
                max: 3600,
            }),
            ConfigKey::ZonesFile => Box::new(AnyStringSpec),
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// All keys in display order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::MapsApiKey,
            ConfigKey::MapsRegion,
            ConfigKey::MapsLanguage,
            ConfigKey::MapsDefaultZoom,
            ConfigKey::LocationFallback,
            ConfigKey::LocationFixTimeoutSecs,
            ConfigKey::ZonesFile,
            ConfigKey::LoggingFile,
        ]
    }
}

/// A rule a configuration value must satisfy.
trait ValueSpecification {
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

struct AnyStringSpec;

impl ValueSpecification for AnyStringSpec {
    fn is_satisfied_by(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Empty, or a two-letter region code.
struct RegionCodeSpec;

impl ValueSpecification for RegionCodeSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() || is_region_code(value) {
            Ok(())
        } else {
            Err("must be a two-letter region code (e.g. in)".to_string())
        }
    }
}

struct IntegerRangeSpec {
    min: u64,
    max: u64,
}

impl ValueSpecification for IntegerRangeSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u64>() {
            Ok(n) if (self.min..=self.max).contains(&n) => Ok(()),
            _ => Err(format!(
                "must be an integer from {} to {}",
                self.min, self.max
            )),
        }
    }
}

struct CoordinateSpec;

impl ValueSpecification for CoordinateSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        value
            .parse::<Coordinate>()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Non-empty path.
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err("path cannot be empty".to_string())
        } else {
            Ok(())
        }
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Convert path to display string, collapsing home dir to ~.
fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Convert empty string to None, non-empty to Some.
pub(super) fn optional_string(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Convert empty string to None, non-empty to Some path with tilde expansion.
pub(super) fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(expand_tilde(value))
    }
}
