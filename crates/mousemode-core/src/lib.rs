//! mousemode-core: message rewriting for a host application's windows.
//!
//! Everything here is platform-agnostic. The host's messages come in through
//! [`Interceptor::dispatch`]; the Win32 side (subclassing, input injection,
//! window lifecycle events) lives in `mousemode-platform` behind the
//! [`Platform`] trait.

pub mod config;
mod error;
pub mod gesture;
mod interceptor;
pub mod jitter;
pub mod keys;
pub mod message;
pub mod platform;
pub mod pointer;
pub mod reaction;
mod registry;
mod storage;
pub mod synth;
pub mod wheel;

pub use config::{InterceptConfig, UnregisteredWindowPolicy, WheelScale};
pub use error::{ConfigError, ConfigResult, HookError, HookResult};
pub use interceptor::{InterceptState, Interceptor};
pub use jitter::{JitterPolicy, NeverSuppress, RandomJitter, ScriptedJitter};
pub use message::Message;
pub use platform::{
    GestureInfo, InputOrigin, OriginClassifier, Platform, SignatureClassifier, Subclasser,
};
pub use reaction::{Effect, Outcome, Reaction};
pub use registry::{HookedWindow, WindowLifecycle, WindowRegistry};
pub use storage::{
    config_path, get_app_data_dir, get_config_dir, load_config, load_or_default, save_config,
    CONFIG_ENV,
};
pub use synth::{KeyDirection, KeyInput};

use std::ops::{Add, AddAssign, Sub};

/// A point in pixels. Client or screen space depending on context.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when both components are strictly inside `(-threshold, threshold)`.
    pub fn within(&self, threshold: i32) -> bool {
        self.x.abs() < threshold && self.y.abs() < threshold
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Opaque native window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub usize);

/// Opaque reference to a window's message handler (its window procedure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerRef(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_within_is_strict() {
        assert!(Point::new(2, -2).within(3));
        assert!(!Point::new(3, 0).within(3));
        assert!(!Point::new(0, -3).within(3));
        assert!(!Point::new(0, 0).within(0));
    }

    #[test]
    fn test_point_arithmetic() {
        let mut p = Point::new(1, 2) + Point::new(10, 20);
        assert_eq!(p, Point::new(11, 22));
        p += Point::new(-1, -2);
        assert_eq!(p - Point::new(10, 20), Point::new(0, 0));
    }
}
