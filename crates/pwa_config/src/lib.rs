//! Parsing and validation of `pwa.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`PwaConfig`]: web-app manifest metadata, the public path assets are served
//! from, per-category source icon specs and user-declared `<link>` tags.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{find_project_root, resolve_project_config};
pub use types::*;
