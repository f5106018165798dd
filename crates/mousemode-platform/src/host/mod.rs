//! Process-wide install/uninstall of the interceptor.
//!
//! Platform implementations:
//! - Windows: window subclassing and the Win32 platform services (`windows.rs`)
//! - Others: `install` reports `NotImplemented`

use crate::{PlatformError, PlatformResult};
use mousemode_core::load_or_default;
use std::sync::{Arc, PoisonError, RwLock};

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::{install, uninstall, Win32Platform};

#[cfg(windows)]
pub(crate) use windows::on_lifecycle;

#[cfg(not(windows))]
mod fallback {
    use crate::{PlatformError, PlatformResult};
    use mousemode_core::InterceptConfig;

    /// Install the interceptor (unsupported on this platform).
    pub fn install(config: InterceptConfig) -> PlatformResult<()> {
        config.validate()?;
        Err(PlatformError::NotImplemented)
    }

    /// Uninstall the interceptor (nothing to do on this platform).
    pub fn uninstall() -> PlatformResult<()> {
        Ok(())
    }
}

#[cfg(not(windows))]
pub use fallback::{install, uninstall};

/// Set up logging, load the user's configuration and install.
pub fn install_default() -> PlatformResult<()> {
    crate::logging::init();
    install(load_or_default())
}

/// Holds the one active instance of something.
pub(crate) struct ActiveSlot<T> {
    inner: RwLock<Option<Arc<T>>>,
}

#[cfg_attr(not(windows), allow(dead_code))]
impl<T> ActiveSlot<T> {
    pub(crate) const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// The active instance. The lock is released before returning.
    pub(crate) fn get(&self) -> Option<Arc<T>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set(&self, value: Arc<T>) -> PlatformResult<()> {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(PlatformError::AlreadyInstalled);
        }
        *slot = Some(value);
        Ok(())
    }

    pub(crate) fn take(&self) -> Option<Arc<T>> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(windows))]
    use mousemode_core::InterceptConfig;

    #[test]
    fn test_slot_holds_one_instance() {
        let slot = ActiveSlot::new();
        assert!(slot.get().is_none());

        slot.set(Arc::new(1u32)).unwrap();
        assert!(matches!(
            slot.set(Arc::new(2u32)),
            Err(PlatformError::AlreadyInstalled)
        ));
        assert_eq!(slot.get().as_deref(), Some(&1));

        assert_eq!(slot.take().as_deref(), Some(&1));
        assert!(slot.get().is_none());
        slot.set(Arc::new(3u32)).unwrap();
        assert_eq!(slot.get().as_deref(), Some(&3));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_install_not_implemented() {
        assert!(matches!(
            install(InterceptConfig::default()),
            Err(PlatformError::NotImplemented)
        ));
        assert!(uninstall().is_ok());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_install_rejects_invalid_config_first() {
        let config = InterceptConfig {
            multi_touch_enabled: true,
            ..Default::default()
        };
        assert!(matches!(install(config), Err(PlatformError::Config(_))));
    }
}
