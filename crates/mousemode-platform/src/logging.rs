//! Logging setup for running inside the host process.
//!
//! The host has no console, so logs go to a daily rolling file under
//! `<data dir>/mousemode/logs`. The filter comes from `MOUSEMODE_LOG`
//! (same syntax as `RUST_LOG`), defaulting to `info`.

use mousemode_core::get_app_data_dir;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_ENV: &str = "MOUSEMODE_LOG";

pub fn log_dir() -> PathBuf {
    get_app_data_dir().join("logs")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Does nothing if one is already set.
pub fn init() {
    let dir = log_dir();
    let file_layer = match std::fs::create_dir_all(&dir) {
        Ok(()) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, &dir, "mousemode.log");
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(appender)
                    .with_filter(filter()),
            )
        }
        Err(e) => {
            eprintln!("mousemode: failed to create log directory {dir:?}: {e}");
            None
        }
    };

    // Attached debuggers and test runners still get stderr output.
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let initialized = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!(dir = ?dir, "logging initialized");
    }
}
