//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and the shared
//! lookups (API key, zone data) used by the command handlers.

use std::path::{Path, PathBuf};

use safepath::config::ConfigFile;
use safepath::logging::{default_log_file, init_logging, LoggingGuard};
use safepath::provider::is_placeholder_key;
use safepath::zone::{load_zones, AdvisoryZone};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// Log output always goes to the configured file; `verbose` mirrors it
    /// to stdout and `debug` lowers the default filter to debug.
    pub fn new(verbose: bool, debug: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| default_log_file().to_string());

        let logging_guard = init_logging(&log_dir, &log_file, verbose, debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("SafePath v{}", safepath::VERSION);
        info!("SafePath CLI: {} command", command);
    }

    /// The API key in effect, rejecting an unset or placeholder key.
    pub fn api_key(&self) -> Result<String, CliError> {
        self.config
            .api_key()
            .filter(|key| !is_placeholder_key(key))
            .ok_or(CliError::MissingApiKey)
    }

    /// Load advisory zones from `override_path`, else the configured file.
    ///
    /// No file at all means no zones.
    pub fn zones(&self, override_path: Option<&Path>) -> Result<Vec<AdvisoryZone>, CliError> {
        let Some(path) = override_path.or(self.config.zones.file.as_deref()) else {
            info!("No zone file configured");
            return Ok(Vec::new());
        };

        let zones = load_zones(path).map_err(|error| CliError::Zones {
            path: path.to_path_buf(),
            error,
        })?;
        info!(path = %path.display(), count = zones.len(), "Loaded advisory zones");
        Ok(zones)
    }
}
