//! User configuration (`~/.safepath/config.ini`).
//!
//! Settings structs live in `settings`, constants in `defaults`, parsing in
//! `parser` and serialization in `writer`.
//! [`ConfigKey`] gives validated access by `section.key` name for the CLI.
//!
//! ```ini
//! [maps]
//! api_key = ...
//! region = in
//!
//! [location]
//! fallback = 28.6139, 77.209
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    config_directory, config_file_path, default_log_file, DEFAULT_FALLBACK,
    DEFAULT_FIX_TIMEOUT_SECS, DEFAULT_REGION,
};
pub use file::ConfigFileError;
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    mask_secret, ConfigFile, LocationSettings, LoggingSettings, MapsSettings, ZonesSettings,
    API_KEY_ENV,
};
