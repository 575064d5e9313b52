//! Project context resolution: where the configuration comes from.

use crate::error::ConfigError;
use crate::loader::{load_config, CONFIG_FILE};
use crate::types::PwaConfig;
use std::path::{Path, PathBuf};

/// Returns the configuration to generate with.
///
/// An explicit configuration always wins. Otherwise it is loaded from
/// `<project_root>/pwa.toml`. With neither available the result is
/// [`ConfigError::MissingProjectContext`].
pub fn resolve_project_config(
    explicit: Option<&PwaConfig>,
    project_root: Option<&Path>,
) -> Result<PwaConfig, ConfigError> {
    if let Some(config) = explicit {
        return Ok(config.clone());
    }
    match project_root {
        Some(root) => load_config(root),
        None => Err(ConfigError::MissingProjectContext),
    }
}

/// Walks up from `start` to the first directory containing `pwa.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(CONFIG_FILE).is_file() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(ConfigError::MissingProjectContext);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn explicit_config_wins() {
        let explicit = load_config_from_str("[app]\nname = \"Explicit\"\n").unwrap();
        let config =
            resolve_project_config(Some(&explicit), Some(Path::new("/nonexistent"))).unwrap();
        assert_eq!(config.app.name, "Explicit");
    }

    #[test]
    fn loads_from_project_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[app]\nname = \"Root\"\n").unwrap();
        let config = resolve_project_config(None, Some(dir.path())).unwrap();
        assert_eq!(config.app.name, "Root");
    }

    #[test]
    fn missing_everything_is_missing_context() {
        let err = resolve_project_config(None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingProjectContext));
    }

    #[test]
    fn find_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[app]\nname = \"x\"\n").unwrap();
        let nested = dir.path().join("src").join("components");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn find_root_without_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A temp dir has no pwa.toml above it in a sane test environment.
        let result = find_project_root(dir.path());
        if let Ok(root) = result {
            assert!(root.join(CONFIG_FILE).is_file());
        }
    }
}
