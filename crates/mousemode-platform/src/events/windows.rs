//! In-context WinEvent hook for this process.

use super::{
    classify, EVENT_OBJECT_CREATE, EVENT_OBJECT_DESTROY, EVENT_SYSTEM_CAPTURESTART,
    EVENT_SYSTEM_FOREGROUND,
};
use crate::{PlatformError, PlatformResult};
use mousemode_core::WindowHandle;
use tracing::{debug, trace, warn};
use windows_sys::Win32::Foundation::{HMODULE, HWND};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleExW;
use windows_sys::Win32::System::Threading::GetCurrentProcessId;
use windows_sys::Win32::UI::Accessibility::{SetWinEventHook, UnhookWinEvent, HWINEVENTHOOK};

const WINEVENT_INCONTEXT: u32 = 0x0004;
const GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT: u32 = 0x0002;
const GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS: u32 = 0x0004;

const EVENT_RANGES: [(u32, u32); 2] = [
    (EVENT_SYSTEM_FOREGROUND, EVENT_SYSTEM_CAPTURESTART),
    (EVENT_OBJECT_CREATE, EVENT_OBJECT_DESTROY),
];

/// Installed WinEvent hooks. Handles are stored as integers so the value can
/// live in a static.
pub(crate) struct EventHook {
    handles: Vec<usize>,
}

impl EventHook {
    pub(crate) fn stop(self) {
        unhook(&self.handles);
        debug!("window lifecycle feed stopped");
    }
}

fn unhook(handles: &[usize]) {
    for &handle in handles {
        if unsafe { UnhookWinEvent(handle as HWINEVENTHOOK) } == 0 {
            warn!(handle, "UnhookWinEvent failed");
        }
    }
}

/// The module containing this code, which the in-context hook runs from.
fn current_module() -> PlatformResult<HMODULE> {
    let mut module: HMODULE = std::ptr::null_mut();
    let ok = unsafe {
        GetModuleHandleExW(
            GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
            win_event_proc as usize as *const u16,
            &mut module,
        )
    };
    if ok == 0 {
        return Err(PlatformError::HookFailed(
            "GetModuleHandleExW failed for the hook module".into(),
        ));
    }
    Ok(module)
}

pub(crate) fn start() -> PlatformResult<EventHook> {
    let module = current_module()?;
    let process = unsafe { GetCurrentProcessId() };

    let mut handles = Vec::with_capacity(EVENT_RANGES.len());
    for (min, max) in EVENT_RANGES {
        let hook = unsafe {
            SetWinEventHook(
                min,
                max,
                module,
                Some(win_event_proc),
                process,
                0,
                WINEVENT_INCONTEXT,
            )
        };
        if hook.is_null() {
            unhook(&handles);
            return Err(PlatformError::HookFailed(format!(
                "SetWinEventHook({min:#x}..={max:#x}) failed"
            )));
        }
        handles.push(hook as usize);
    }
    debug!(process, "window lifecycle feed started");
    Ok(EventHook { handles })
}

unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    id_child: i32,
    _event_thread: u32,
    _event_time: u32,
) {
    if hwnd.is_null() {
        return;
    }
    if let Some(lifecycle) = classify(event, id_object, id_child) {
        let window = WindowHandle(hwnd as usize);
        trace!(?lifecycle, ?window, event, "window lifecycle event");
        crate::host::on_lifecycle(lifecycle, window);
    }
}
