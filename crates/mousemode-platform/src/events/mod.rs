//! Window lifecycle feed.
//!
//! WinEvents tell us when the host creates, activates or destroys a window.
//! Only window objects of this process are of interest; everything else is
//! filtered out before reaching the interceptor.
//!
//! Platform implementations:
//! - Windows: in-context `SetWinEventHook` (`windows.rs`)

use mousemode_core::WindowLifecycle;

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub(crate) use windows::{start, EventHook};

pub const EVENT_SYSTEM_FOREGROUND: u32 = 0x0003;
pub const EVENT_SYSTEM_CAPTURESTART: u32 = 0x0008;
pub const EVENT_OBJECT_CREATE: u32 = 0x8000;
pub const EVENT_OBJECT_DESTROY: u32 = 0x8001;

pub const OBJID_WINDOW: i32 = 0;
pub const CHILDID_SELF: i32 = 0;

/// Map a raw WinEvent to a lifecycle notification.
pub fn classify(event: u32, id_object: i32, id_child: i32) -> Option<WindowLifecycle> {
    let is_window = id_object == OBJID_WINDOW && id_child == CHILDID_SELF;
    match event {
        EVENT_SYSTEM_FOREGROUND | EVENT_SYSTEM_CAPTURESTART => Some(WindowLifecycle::Engaged),
        EVENT_OBJECT_CREATE if is_window => Some(WindowLifecycle::Created),
        EVENT_OBJECT_DESTROY if is_window => Some(WindowLifecycle::Destroyed),
        _ => None,
    }
}
