//! Error types for mousemode-core.

use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures of the window subclassing primitives.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to install handler on window {window:#x}: {reason}")]
    InstallFailed { window: usize, reason: String },
    #[error("failed to restore handler on window {window:#x}: {reason}")]
    RestoreFailed { window: usize, reason: String },
}

pub type HookResult<T> = Result<T, HookError>;
