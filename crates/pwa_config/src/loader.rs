//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PwaConfig;
use std::path::Path;

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "pwa.toml";

/// Orientation values accepted by the web-app manifest.
const MANIFEST_ORIENTATIONS: &[&str] = &[
    "any",
    "natural",
    "landscape",
    "landscape-primary",
    "landscape-secondary",
    "portrait",
    "portrait-primary",
    "portrait-secondary",
];

/// Loads and validates a `pwa.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<PwaConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    load_config_from_str(&content)
}

/// Parses and validates a `pwa.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<PwaConfig, ConfigError> {
    let config: PwaConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &PwaConfig) -> Result<(), ConfigError> {
    if config.app.name.trim().is_empty() {
        return Err(ConfigError::MissingField("app.name".to_string()));
    }
    if let Some(orientation) = &config.app.orientation {
        if !MANIFEST_ORIENTATIONS.contains(&orientation.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unsupported orientation '{orientation}'"
            )));
        }
    }
    let icons = &config.icons;
    for (name, spec) in [
        ("default", &icons.default),
        ("favicon", &icons.favicon),
        ("touch", &icons.touch),
        ("chrome", &icons.chrome),
        ("splash", &icons.splash),
    ] {
        if let Some(spec) = spec {
            if spec.src.as_os_str().is_empty() {
                return Err(ConfigError::MissingField(format!("icons.{name}.src")));
            }
        }
    }
    Ok(())
}
