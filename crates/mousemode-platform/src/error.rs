//! Common error types for mousemode-platform.

use mousemode_core::ConfigError;
use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("not implemented")]
    NotImplemented,
    #[error("already installed")]
    AlreadyInstalled,
    #[error("injection failed: {0}")]
    InjectionFailed(String),
    #[error("hook failed: {0}")]
    HookFailed(String),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
