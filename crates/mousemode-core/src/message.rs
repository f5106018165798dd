//! Window message representation and the Win32 parameter codec.
//!
//! The core never talks to the OS directly, but the host speaks Win32
//! messages, so the numeric ids and the packing rules for `wparam`/`lparam`
//! live here where they can be tested on any platform.

use crate::Point;

pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_LBUTTONDBLCLK: u32 = 0x0203;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_MOUSEHWHEEL: u32 = 0x020E;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_CHAR: u32 = 0x0102;
pub const WM_GESTURE: u32 = 0x0119;
pub const WM_GESTURENOTIFY: u32 = 0x011A;

/// Modifier flags carried in the low word of mouse message `wparam`s.
pub const MK_SHIFT: u16 = 0x0004;
pub const MK_CONTROL: u16 = 0x0008;

/// Gesture ids and flags (`GESTUREINFO`).
pub const GID_PAN: u32 = 4;
pub const GF_BEGIN: u32 = 0x0001;
pub const GF_INERTIA: u32 = 0x0002;
pub const GF_END: u32 = 0x0004;

/// Pan gesture configuration bits (`GESTURECONFIG::dwWant`).
pub const GC_PAN: u32 = 0x0001;
pub const GC_PAN_WITH_SINGLE_FINGER_VERTICALLY: u32 = 0x0002;
pub const GC_PAN_WITH_SINGLE_FINGER_HORIZONTALLY: u32 = 0x0004;
pub const GC_PAN_WITH_INERTIA: u32 = 0x0010;

/// One raw window message as seen by a window procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub id: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl Message {
    pub fn new(id: u32, wparam: usize, lparam: isize) -> Self {
        Self { id, wparam, lparam }
    }

    /// A mouse message carrying `modifiers` and a client-space point.
    pub fn mouse(id: u32, modifiers: u16, point: Point) -> Self {
        Self::new(id, modifiers as usize, make_lparam(point))
    }

    /// Signed client coordinates packed in `lparam` (`GET_X_LPARAM`/`GET_Y_LPARAM`).
    pub fn point(&self) -> Point {
        Point {
            x: (self.lparam as u32 & 0xFFFF) as u16 as i16 as i32,
            y: ((self.lparam as u32 >> 16) & 0xFFFF) as u16 as i16 as i32,
        }
    }

    pub fn with_point(self, point: Point) -> Self {
        Self {
            lparam: make_lparam(point),
            ..self
        }
    }

    pub fn loword(&self) -> u16 {
        (self.wparam & 0xFFFF) as u16
    }

    pub fn hiword(&self) -> u16 {
        ((self.wparam >> 16) & 0xFFFF) as u16
    }

    /// Modifier flags of a mouse or wheel message.
    pub fn modifiers(&self) -> u16 {
        self.loword()
    }

    pub fn has_modifier(&self, flag: u16) -> bool {
        self.modifiers() & flag != 0
    }

    /// Signed rotation of a wheel message (`GET_WHEEL_DELTA_WPARAM`).
    pub fn wheel_delta(&self) -> i32 {
        self.hiword() as i16 as i32
    }

    /// Rebuild a wheel message with a new id, modifier word and rotation.
    pub fn as_wheel(self, id: u32, modifiers: u16, delta: i32) -> Self {
        Self {
            id,
            wparam: make_wparam(modifiers, saturate_i16(delta) as u16),
            ..self
        }
    }
}

/// `MAKELONG(x, y)` for client coordinates, truncating each axis to 16 bits.
pub fn make_lparam(point: Point) -> isize {
    let lo = point.x as i16 as u16 as u32;
    let hi = point.y as i16 as u16 as u32;
    (lo | (hi << 16)) as i32 as isize
}

pub fn make_wparam(lo: u16, hi: u16) -> usize {
    (lo as usize) | ((hi as usize) << 16)
}

fn saturate_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
