//! Configuration file location and persistence.

use crate::error::ConfigResult;
use crate::InterceptConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "MOUSEMODE_CONFIG";

/// Get the config directory for mousemode.
pub fn get_config_dir() -> PathBuf {
    let base = dirs_next::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("mousemode")
}

/// Get the app data directory for mousemode (logs live here).
pub fn get_app_data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("mousemode")
}

/// Resolve the config file path, honoring `MOUSEMODE_CONFIG`.
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => get_config_dir().join("config.yaml"),
    }
}

/// Load and validate a config file.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<InterceptConfig> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path)?;
    let config: InterceptConfig = serde_yaml::from_str(&yaml)?;
    config.validate()?;
    debug!(?path, "Loaded config");
    Ok(config)
}

/// Load the config from [`config_path`], falling back to defaults when the
/// file is missing or invalid.
pub fn load_or_default() -> InterceptConfig {
    let path = config_path();
    if !path.exists() {
        debug!(?path, "No config file found, using defaults");
        return InterceptConfig::default();
    }

    match load_config(&path) {
        Ok(config) => {
            info!(?path, "Loaded config");
            config
        }
        Err(e) => {
            warn!(?path, error = %e, "Failed to load config, using defaults");
            InterceptConfig::default()
        }
    }
}

/// Validate and write a config file, creating parent directories.
pub fn save_config(path: impl AsRef<Path>, config: &InterceptConfig) -> ConfigResult<()> {
    let path = path.as_ref();
    config.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)?;
    info!(?path, "Saved config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::WheelScale;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = InterceptConfig::default();
        config.wheel_scale_vertical = WheelScale::new(1, 1);
        config.plus_without_shift_enabled = false;
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "multi_touch_enabled: true\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_save_refuses_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut config = InterceptConfig::default();
        config.min_wheel_notch = -1;

        assert!(save_config(&path, &config).is_err());
        assert!(!path.exists());
    }
}
