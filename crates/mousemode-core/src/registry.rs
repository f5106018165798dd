//! Which windows are hooked, and the handler each one had before.

use crate::platform::Subclasser;
use crate::{HandlerRef, WindowHandle};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// One intercepted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookedWindow {
    pub handle: WindowHandle,
    pub original: HandlerRef,
}

/// Window lifecycle notifications that drive hooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLifecycle {
    Created,
    Destroyed,
    /// The window took the foreground or mouse capture.
    Engaged,
}

/// At most one entry per window handle.
///
/// The lifecycle feed and message dispatch may run in different call
/// contexts, so the map sits behind a lock. The lock is only held for map
/// access and the subclass swap itself; nothing that can dispatch a message
/// runs under it.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: Mutex<HashMap<WindowHandle, HookedWindow>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn windows(&self) -> MutexGuard<'_, HashMap<WindowHandle, HookedWindow>> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hook `window` unless it already is. Returns true when newly hooked.
    pub fn hook<S: Subclasser + ?Sized>(&self, window: WindowHandle, subclasser: &S) -> bool {
        let mut windows = self.windows();
        if windows.contains_key(&window) {
            return false;
        }
        match subclasser.install(window) {
            Ok(original) => {
                windows.insert(window, HookedWindow { handle: window, original });
                debug!(?window, ?original, "window hooked");
                true
            }
            Err(e) => {
                warn!(?window, error = %e, "failed to hook window");
                false
            }
        }
    }

    /// Restore the original handler and forget the window. Returns true when
    /// the window was hooked.
    pub fn unhook<S: Subclasser + ?Sized>(&self, window: WindowHandle, subclasser: &S) -> bool {
        let Some(entry) = self.windows().remove(&window) else {
            return false;
        };
        // Also drops anything that subclassed the window after us.
        if let Err(e) = subclasser.restore(entry.handle, entry.original) {
            warn!(?window, error = %e, "failed to restore window handler");
        }
        debug!(?window, "window unhooked");
        true
    }

    /// Unhook every window. Returns how many were unhooked.
    pub fn unhook_all<S: Subclasser + ?Sized>(&self, subclasser: &S) -> usize {
        let drained: Vec<HookedWindow> = self.windows().drain().map(|(_, w)| w).collect();
        for entry in &drained {
            if let Err(e) = subclasser.restore(entry.handle, entry.original) {
                warn!(window = ?entry.handle, error = %e, "failed to restore window handler");
            }
        }
        info!(count = drained.len(), "all windows unhooked");
        drained.len()
    }

    pub fn get(&self, window: WindowHandle) -> Option<HookedWindow> {
        self.windows().get(&window).copied()
    }

    pub fn contains(&self, window: WindowHandle) -> bool {
        self.windows().contains_key(&window)
    }

    pub fn len(&self) -> usize {
        self.windows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows().is_empty()
    }
}
