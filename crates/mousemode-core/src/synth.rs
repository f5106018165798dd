//! Synthetic keyboard input records.
//!
//! These are plain values; the platform layer turns a batch of them into a
//! single `SendInput` call.

/// Virtual key codes used by the rewrites.
pub mod vk {
    pub const SHIFT: u16 = 0x10;
    pub const CONTROL: u16 = 0x11;
    /// Alt.
    pub const MENU: u16 = 0x12;
    pub const Y: u16 = 0x59;
    pub const Z: u16 = 0x5A;
    pub const OEM_PLUS: u16 = 0xBB;
    pub const OEM_MINUS: u16 = 0xBD;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

/// One synthetic key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub vk: u16,
    pub direction: KeyDirection,
}

impl KeyInput {
    pub fn is_up(&self) -> bool {
        self.direction == KeyDirection::Up
    }
}

pub fn key_down(vk: u16) -> KeyInput {
    KeyInput {
        vk,
        direction: KeyDirection::Down,
    }
}

pub fn key_up(vk: u16) -> KeyInput {
    KeyInput {
        vk,
        direction: KeyDirection::Up,
    }
}

/// Press and release `vk`.
pub fn key_tap(vk: u16) -> [KeyInput; 2] {
    [key_down(vk), key_up(vk)]
}
