//! The boundary between the rewriting engine and the OS.
//!
//! Everything the state machines need from the platform is expressed here:
//! window subclassing, cursor and key queries, input injection and gesture
//! decoding. The Windows implementation lives in `mousemode-platform`; tests
//! use recording fakes.

use crate::error::HookResult;
use crate::message::Message;
use crate::synth::KeyInput;
use crate::{HandlerRef, Point, WindowHandle};

/// Replaces and restores a window's message handler.
pub trait Subclasser: Send + Sync {
    /// Route the window's messages to the interceptor, returning the handler
    /// that was installed before.
    fn install(&self, window: WindowHandle) -> HookResult<HandlerRef>;

    /// Put `original` back as the window's handler.
    fn restore(&self, window: WindowHandle, original: HandlerRef) -> HookResult<()>;
}

/// Services consumed by the interceptor while dispatching a message.
pub trait Platform: Subclasser {
    /// Invoke the handler the window had before it was hooked.
    fn call_original(&self, original: HandlerRef, window: WindowHandle, msg: Message) -> isize;

    /// Invoke the platform's default handler.
    fn call_default(&self, window: WindowHandle, msg: Message) -> isize;

    /// Extra information attached to the message being dispatched.
    fn message_extra_info(&self) -> usize;

    fn cursor_visible(&self) -> bool;

    /// Cursor position in screen coordinates.
    fn cursor_pos(&self) -> Point;

    fn set_cursor_pos(&self, point: Point);

    fn screen_to_client(&self, window: WindowHandle, point: Point) -> Point;

    /// Whether the virtual key is currently held.
    fn key_held(&self, vk: u16) -> bool;

    /// Submit a batch of synthetic key transitions to the global input queue.
    fn send_input(&self, inputs: &[KeyInput]);

    /// Decode the gesture carried by a `WM_GESTURE` lparam.
    fn gesture_info(&self, lparam: isize) -> Option<GestureInfo>;

    fn close_gesture_info(&self, lparam: isize);

    /// Ask the platform to deliver pan gestures (with inertia) to the window.
    fn enable_pan_gestures(&self, window: WindowHandle);
}

/// Decoded `GESTUREINFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureInfo {
    pub id: u32,
    pub flags: u32,
    /// Gesture location in screen coordinates.
    pub location: Point,
}

/// Where a pointer event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    Mouse,
    PenOrTouch,
}

/// Decides whether an event came from a physical mouse or a digitizer.
pub trait OriginClassifier: Send + Sync {
    fn classify(&self, extra_info: usize) -> InputOrigin;
}

const PEN_SIGNATURE: usize = 0xFF51_5700;
const SIGNATURE_MASK: usize = 0xFFFF_FF00;

/// Recognizes the signature Windows stamps on pen and touch emulated mouse
/// messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureClassifier;

impl OriginClassifier for SignatureClassifier {
    fn classify(&self, extra_info: usize) -> InputOrigin {
        if extra_info & SIGNATURE_MASK == PEN_SIGNATURE {
            InputOrigin::PenOrTouch
        } else {
            InputOrigin::Mouse
        }
    }
}
