//! mousemode-platform: the Windows side of mousemode.
//!
//! This crate provides:
//! - Window subclassing and the Win32 services behind `mousemode_core::Platform`
//! - The WinEvent feed that hooks and unhooks the host's windows
//! - Keyboard injection via `SendInput`
//! - File logging for running inside the host process
//!
//! ## Module Structure
//!
//! - `error` - Common error types
//! - `events` - Window lifecycle events
//! - `host` - Process-wide install/uninstall and the Win32 platform
//! - `injector` - Input injection
//! - `logging` - Subscriber setup

mod error;
mod events;
mod host;
mod injector;
pub mod logging;

// Re-export error types
pub use error::{PlatformError, PlatformResult};

// Re-export lifecycle
pub use events::classify as classify_win_event;

// Re-export install entry points
pub use host::{install, install_default, uninstall};

#[cfg(windows)]
pub use host::Win32Platform;

// Re-export input injection
pub use injector::{InputInjector, NoopInjector};

#[cfg(windows)]
pub use injector::SendInputInjector;
