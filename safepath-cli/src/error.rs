//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and exit code 1 for every failure.

use std::fmt;
use std::path::PathBuf;
use std::process;

use safepath::config::{ConfigFileError, API_KEY_ENV};
use safepath::map::MapError;
use safepath::provider::ProviderError;
use safepath::zone::ZoneError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// No usable API key
    MissingApiKey,
    /// Advisory zone data could not be loaded
    Zones { path: PathBuf, error: ZoneError },
    /// HTTP client could not be created
    Http(ProviderError),
    /// The map could not be mounted or updated
    Map(MapError),
    /// Failed to encode command output (JSON)
    Output(String),
    /// Failed to write output file
    FileWrite { path: PathBuf, error: std::io::Error },
    /// Failed reading standard input
    Stdin(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingApiKey => {
                eprintln!();
                eprintln!("Set a Google Maps Platform key with one of:");
                eprintln!("  safepath config set maps.api_key <KEY>");
                eprintln!("  export {}=<KEY>", API_KEY_ENV);
            }
            CliError::Map(MapError::CapabilityLoad(_)) => {
                eprintln!();
                eprintln!("Make sure:");
                eprintln!("  1. Geocoding, Places and Directions APIs are enabled for the key");
                eprintln!("  2. Billing is enabled for your project");
                eprintln!("  3. The key's restrictions allow requests from this machine");
            }
            CliError::Zones { .. } => {
                eprintln!();
                eprintln!("Zone files are JSON arrays of objects with center, radius_meters and level.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration error: {}", e),
            CliError::MissingApiKey => write!(f, "No Google Maps API key configured"),
            CliError::Zones { path, error } => {
                write!(f, "Failed to load zones from '{}': {}", path.display(), error)
            }
            CliError::Http(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Map(e) => write!(f, "{}", e),
            CliError::Output(msg) => write!(f, "Failed to encode output: {}", msg),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path.display(), error)
            }
            CliError::Stdin(e) => write!(f, "Failed to read standard input: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Zones { error, .. } => Some(error),
            CliError::Map(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            CliError::Stdin(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<MapError> for CliError {
    fn from(e: MapError) -> Self {
        CliError::Map(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_error_message_passes_through() {
        let err = CliError::from(MapError::CapabilityLoad("REQUEST_DENIED".to_string()));
        assert_eq!(
            err.to_string(),
            "Map capability failed to load: REQUEST_DENIED"
        );
    }

    #[test]
    fn test_output_error_is_not_a_config_error() {
        let err = CliError::Output("key must be a string".to_string());
        assert_eq!(err.to_string(), "Failed to encode output: key must be a string");
        assert!(!err.to_string().contains("Configuration"));
    }

    #[test]
    fn test_file_write_names_path() {
        let err = CliError::FileWrite {
            path: PathBuf::from("/tmp/route.geojson"),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/route.geojson"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
