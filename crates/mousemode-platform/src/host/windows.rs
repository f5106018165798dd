//! Win32 implementation of the interceptor's platform services.

use super::ActiveSlot;
use crate::events::{self, EventHook};
use crate::injector::{InputInjector, SendInputInjector};
use crate::PlatformResult;
use mousemode_core::message::{
    GC_PAN, GC_PAN_WITH_INERTIA, GC_PAN_WITH_SINGLE_FINGER_HORIZONTALLY,
    GC_PAN_WITH_SINGLE_FINGER_VERTICALLY, GID_PAN,
};
use mousemode_core::{
    GestureInfo, HandlerRef, HookError, HookResult, InterceptConfig, Interceptor, KeyInput,
    Message, Platform, Point, Subclasser, WindowHandle, WindowLifecycle,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};
use windows_sys::Win32::Foundation::{GetLastError, SetLastError, HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows_sys::Win32::Graphics::Gdi::ScreenToClient;
use windows_sys::Win32::System::Threading::GetCurrentProcessId;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::GetKeyState;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CallWindowProcW, DefWindowProcW, GetCursorInfo, GetCursorPos, GetForegroundWindow,
    GetMessageExtraInfo, GetWindowThreadProcessId, SetCursorPos, CURSORINFO, CURSOR_SHOWING,
    GWLP_WNDPROC, WNDPROC,
};

static ACTIVE: ActiveSlot<Interceptor<Win32Platform>> = ActiveSlot::new();
static EVENT_HOOK: Mutex<Option<EventHook>> = Mutex::new(None);

/// Install the interceptor for this process: start the lifecycle feed and
/// hook the foreground window if it is ours.
pub fn install(config: InterceptConfig) -> PlatformResult<()> {
    let interceptor = Arc::new(Interceptor::new(config, Win32Platform::new())?);
    ACTIVE.set(Arc::clone(&interceptor))?;

    let hook = match events::start() {
        Ok(hook) => hook,
        Err(e) => {
            ACTIVE.take();
            return Err(e);
        }
    };
    *EVENT_HOOK.lock().unwrap_or_else(PoisonError::into_inner) = Some(hook);

    let foreground = unsafe { GetForegroundWindow() };
    if !foreground.is_null() && owned_by_this_process(foreground) {
        interceptor.hook(WindowHandle(foreground as usize));
    }
    info!("mousemode installed");
    Ok(())
}

/// Stop the lifecycle feed and restore every hooked window.
pub fn uninstall() -> PlatformResult<()> {
    if let Some(hook) = EVENT_HOOK.lock().unwrap_or_else(PoisonError::into_inner).take() {
        hook.stop();
    }
    // Windows are restored before the slot empties so no hooked window ever
    // dispatches without an interceptor.
    if let Some(interceptor) = ACTIVE.get() {
        let count = interceptor.unhook_all();
        ACTIVE.take();
        info!(count, "mousemode uninstalled");
    }
    Ok(())
}

pub(crate) fn on_lifecycle(event: WindowLifecycle, window: WindowHandle) {
    if let Some(interceptor) = ACTIVE.get() {
        interceptor.on_lifecycle(event, window);
    }
}

fn owned_by_this_process(hwnd: HWND) -> bool {
    let mut process = 0u32;
    unsafe {
        GetWindowThreadProcessId(hwnd, &mut process);
        process == GetCurrentProcessId()
    }
}

unsafe extern "system" fn subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match ACTIVE.get() {
        Some(interceptor) => {
            interceptor.dispatch(WindowHandle(hwnd as usize), Message::new(msg, wparam, lparam))
        }
        None => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

#[cfg(target_pointer_width = "64")]
unsafe fn swap_window_proc(hwnd: HWND, handler: usize) -> usize {
    use windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW;
    SetWindowLongPtrW(hwnd, GWLP_WNDPROC, handler as isize) as usize
}

#[cfg(target_pointer_width = "32")]
unsafe fn swap_window_proc(hwnd: HWND, handler: usize) -> usize {
    use windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongW;
    SetWindowLongW(hwnd, GWLP_WNDPROC, handler as i32) as u32 as usize
}

/// Set the window procedure, returning the previous one. A zero result is
/// only a failure when the last error is set.
fn set_window_proc(window: WindowHandle, handler: usize) -> Result<usize, String> {
    unsafe {
        SetLastError(0);
        let previous = swap_window_proc(window.0 as HWND, handler);
        if previous == 0 {
            let code = GetLastError();
            if code != 0 {
                return Err(format!("SetWindowLongPtrW failed with error {code}"));
            }
        }
        Ok(previous)
    }
}

#[repr(C)]
struct Points {
    x: i16,
    y: i16,
}

/// `GESTUREINFO`
#[repr(C)]
struct RawGestureInfo {
    cb_size: u32,
    flags: u32,
    id: u32,
    hwnd_target: HWND,
    location: Points,
    instance_id: u32,
    sequence_id: u32,
    arguments: u64,
    cb_extra_args: u32,
}

/// `GESTURECONFIG`
#[repr(C)]
struct GestureConfig {
    id: u32,
    want: u32,
    block: u32,
}

#[link(name = "user32")]
extern "system" {
    fn GetGestureInfo(handle: isize, info: *mut RawGestureInfo) -> i32;
    fn CloseGestureInfoHandle(handle: isize) -> i32;
    fn SetGestureConfig(
        hwnd: HWND,
        reserved: u32,
        count: u32,
        config: *const GestureConfig,
        size: u32,
    ) -> i32;
}

/// Windows platform services for the interceptor.
#[derive(Debug, Default)]
pub struct Win32Platform {
    injector: SendInputInjector,
}

impl Win32Platform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Subclasser for Win32Platform {
    fn install(&self, window: WindowHandle) -> HookResult<HandlerRef> {
        set_window_proc(window, subclass_proc as usize)
            .map(HandlerRef)
            .map_err(|reason| HookError::InstallFailed {
                window: window.0,
                reason,
            })
    }

    fn restore(&self, window: WindowHandle, original: HandlerRef) -> HookResult<()> {
        set_window_proc(window, original.0)
            .map(|_| ())
            .map_err(|reason| HookError::RestoreFailed {
                window: window.0,
                reason,
            })
    }
}

impl Platform for Win32Platform {
    fn call_original(&self, original: HandlerRef, window: WindowHandle, msg: Message) -> isize {
        // `original` came from SetWindowLongPtrW(GWLP_WNDPROC), so it is a
        // window procedure pointer (or null, which CallWindowProcW accepts).
        let handler: WNDPROC = unsafe { std::mem::transmute::<usize, WNDPROC>(original.0) };
        unsafe { CallWindowProcW(handler, window.0 as HWND, msg.id, msg.wparam, msg.lparam) }
    }

    fn call_default(&self, window: WindowHandle, msg: Message) -> isize {
        unsafe { DefWindowProcW(window.0 as HWND, msg.id, msg.wparam, msg.lparam) }
    }

    fn message_extra_info(&self) -> usize {
        unsafe { GetMessageExtraInfo() as usize }
    }

    fn cursor_visible(&self) -> bool {
        let mut info: CURSORINFO = unsafe { std::mem::zeroed() };
        info.cbSize = std::mem::size_of::<CURSORINFO>() as u32;
        if unsafe { GetCursorInfo(&mut info) } == 0 {
            return true;
        }
        info.flags & CURSOR_SHOWING != 0
    }

    fn cursor_pos(&self) -> Point {
        let mut point = POINT { x: 0, y: 0 };
        unsafe { GetCursorPos(&mut point) };
        Point::new(point.x, point.y)
    }

    fn set_cursor_pos(&self, point: Point) {
        if unsafe { SetCursorPos(point.x, point.y) } == 0 {
            warn!(?point, "SetCursorPos failed");
        }
    }

    fn screen_to_client(&self, window: WindowHandle, point: Point) -> Point {
        let mut raw = POINT {
            x: point.x,
            y: point.y,
        };
        unsafe { ScreenToClient(window.0 as HWND, &mut raw) };
        Point::new(raw.x, raw.y)
    }

    fn key_held(&self, vk: u16) -> bool {
        unsafe { GetKeyState(vk as i32) < 0 }
    }

    fn send_input(&self, inputs: &[KeyInput]) {
        if let Err(e) = self.injector.inject(inputs) {
            warn!(error = %e, "key injection incomplete");
        }
    }

    fn gesture_info(&self, lparam: isize) -> Option<GestureInfo> {
        let mut raw: RawGestureInfo = unsafe { std::mem::zeroed() };
        raw.cb_size = std::mem::size_of::<RawGestureInfo>() as u32;
        if unsafe { GetGestureInfo(lparam, &mut raw) } == 0 {
            warn!("GetGestureInfo failed");
            return None;
        }
        Some(GestureInfo {
            id: raw.id,
            flags: raw.flags,
            location: Point::new(raw.location.x as i32, raw.location.y as i32),
        })
    }

    fn close_gesture_info(&self, lparam: isize) {
        unsafe { CloseGestureInfoHandle(lparam) };
    }

    fn enable_pan_gestures(&self, window: WindowHandle) {
        let config = GestureConfig {
            id: GID_PAN,
            want: GC_PAN
                | GC_PAN_WITH_SINGLE_FINGER_VERTICALLY
                | GC_PAN_WITH_SINGLE_FINGER_HORIZONTALLY
                | GC_PAN_WITH_INERTIA,
            block: 0,
        };
        let ok = unsafe {
            SetGestureConfig(
                window.0 as HWND,
                0,
                1,
                &config,
                std::mem::size_of::<GestureConfig>() as u32,
            )
        };
        if ok == 0 {
            warn!(?window, "SetGestureConfig failed");
        }
    }
}
