//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`init`] - Configuration initialization
//! - [`route`] - Request a route and export the map scene
//! - [`track`] - Follow positions read from stdin
//! - [`zones`] - Offline advisory zone checks

pub mod config;
pub mod init;
pub mod route;
pub mod track;
pub mod zones;
