//! Synthetic keyboard input.

use crate::PlatformResult;
use mousemode_core::KeyInput;
use tracing::debug;

#[cfg_attr(not(windows), allow(dead_code))]
const KEYEVENTF_KEYUP: u32 = 0x0002;

/// Submits batches of key transitions to the OS input queue.
pub trait InputInjector: Send + Sync {
    /// Inject `inputs` as one uninterruptible batch.
    fn inject(&self, inputs: &[KeyInput]) -> PlatformResult<()>;
}

/// Logs instead of injecting.
pub struct NoopInjector;

impl InputInjector for NoopInjector {
    fn inject(&self, inputs: &[KeyInput]) -> PlatformResult<()> {
        debug!(?inputs, "NoopInjector: would inject keys");
        Ok(())
    }
}

/// `KEYBDINPUT::dwFlags` for one transition.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn key_flags(input: &KeyInput) -> u32 {
    if input.is_up() {
        KEYEVENTF_KEYUP
    } else {
        0
    }
}

#[cfg(windows)]
pub use self::windows::SendInputInjector;

#[cfg(windows)]
mod windows {
    use super::{key_flags, InputInjector};
    use crate::{PlatformError, PlatformResult};
    use mousemode_core::KeyInput;
    use tracing::trace;
    use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
        SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT,
    };

    /// Injects through `SendInput`, so the host sees the keys as if typed.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SendInputInjector;

    impl InputInjector for SendInputInjector {
        fn inject(&self, inputs: &[KeyInput]) -> PlatformResult<()> {
            if inputs.is_empty() {
                return Ok(());
            }
            let batch: Vec<INPUT> = inputs
                .iter()
                .map(|input| INPUT {
                    r#type: INPUT_KEYBOARD,
                    Anonymous: INPUT_0 {
                        ki: KEYBDINPUT {
                            wVk: input.vk,
                            wScan: 0,
                            dwFlags: key_flags(input),
                            time: 0,
                            dwExtraInfo: 0,
                        },
                    },
                })
                .collect();

            let sent = unsafe {
                SendInput(
                    batch.len() as u32,
                    batch.as_ptr(),
                    std::mem::size_of::<INPUT>() as i32,
                )
            };
            if sent as usize != batch.len() {
                return Err(PlatformError::InjectionFailed(format!(
                    "SendInput accepted {sent} of {} inputs",
                    batch.len()
                )));
            }
            trace!(count = batch.len(), "keys injected");
            Ok(())
        }
    }
}
