//! `safepath init`: create the default configuration file.

use safepath::config::{config_file_path, ConfigFile, API_KEY_ENV};

use crate::error::CliError;

/// Write `~/.safepath/config.ini` unless it already exists.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();

    if ConfigFile::ensure_exists_at(&path)? {
        println!("Created configuration file: {}", path.display());
    } else {
        println!("Configuration file already exists: {}", path.display());
    }

    let config = ConfigFile::load_from(&path)?;
    if config.api_key().is_none() {
        println!();
        println!("Next step: add your Google Maps Platform API key");
        println!("  safepath config set maps.api_key <KEY>");
        println!("or export {} before running safepath.", API_KEY_ENV);
    }

    Ok(())
}
