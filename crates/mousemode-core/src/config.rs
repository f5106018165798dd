use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Tunables for every rewrite the interceptor performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptConfig {
    /// Turn absolute pen/touch jumps during a drag into incremental deltas.
    pub digitizer_fix_enabled: bool,

    /// Rescale and quantize wheel input.
    pub scroll_override_enabled: bool,
    pub wheel_scale_vertical: WheelScale,
    pub wheel_scale_horizontal: WheelScale,
    /// Size of one wheel notch in wheel units.
    pub min_wheel_notch: i32,

    /// Ctrl+Shift+Z becomes Ctrl+Y.
    pub ctrl_shift_z_remap_enabled: bool,
    /// `=` zooms like `+`. Conflicts with typing an equals sign.
    pub plus_without_shift_enabled: bool,

    /// Two-finger pan becomes a Ctrl+Alt click-drag.
    pub touch_pan_gesture_enabled: bool,
    /// Ctrl+wheel becomes zoom keystrokes.
    pub trackpad_zoom_enabled: bool,
    /// Not supported; must stay false.
    pub multi_touch_enabled: bool,

    /// Accumulated pen movement below this on both axes is held back.
    pub jitter_threshold: i32,
    /// Chance of holding back an otherwise visible pen move.
    pub jitter_suppression_probability: f64,
    /// Moves following a pen double-click that do not produce deltas.
    pub double_click_settle_moves: u32,

    pub unregistered_window: UnregisteredWindowPolicy,
}

/// Rational scale applied to raw wheel rotation before quantizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelScale {
    pub numerator: i32,
    pub denominator: i32,
}

impl WheelScale {
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Scale one raw delta, truncating toward zero. Results outside `i32`
    /// saturate.
    pub fn apply(&self, delta: i32) -> i32 {
        let scaled = i64::from(delta) * i64::from(self.numerator) / i64::from(self.denominator);
        scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// What to do with a message for a window that is not in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnregisteredWindowPolicy {
    /// Hand the message to the platform default handler.
    PassThrough,
    /// Return a no-op result without calling any handler.
    Swallow,
}

pub const DEFAULT_WHEEL_NOTCH: i32 = 120;
pub const DEFAULT_JITTER_THRESHOLD: i32 = 3;
pub const DEFAULT_JITTER_SUPPRESSION_PROBABILITY: f64 = 0.3;
pub const DEFAULT_DOUBLE_CLICK_SETTLE_MOVES: u32 = 3;

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            digitizer_fix_enabled: true,
            scroll_override_enabled: true,
            wheel_scale_vertical: WheelScale::new(4, 3),
            wheel_scale_horizontal: WheelScale::new(-2, 1),
            min_wheel_notch: DEFAULT_WHEEL_NOTCH,
            ctrl_shift_z_remap_enabled: true,
            plus_without_shift_enabled: true,
            touch_pan_gesture_enabled: true,
            trackpad_zoom_enabled: true,
            multi_touch_enabled: false,
            jitter_threshold: DEFAULT_JITTER_THRESHOLD,
            jitter_suppression_probability: DEFAULT_JITTER_SUPPRESSION_PROBABILITY,
            double_click_settle_moves: DEFAULT_DOUBLE_CLICK_SETTLE_MOVES,
            unregistered_window: UnregisteredWindowPolicy::PassThrough,
        }
    }
}

impl InterceptConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, scale) in [
            ("wheel_scale_vertical", self.wheel_scale_vertical),
            ("wheel_scale_horizontal", self.wheel_scale_horizontal),
        ] {
            if scale.denominator == 0 {
                return Err(ConfigError::Invalid(format!("{name}: denominator is zero")));
            }
        }
        if self.min_wheel_notch <= 0 || self.min_wheel_notch > i32::from(i16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "min_wheel_notch must be within [1, {}], got {}",
                i16::MAX,
                self.min_wheel_notch
            )));
        }
        if self.jitter_threshold < 0 {
            return Err(ConfigError::Invalid(format!(
                "jitter_threshold must not be negative, got {}",
                self.jitter_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.jitter_suppression_probability) {
            return Err(ConfigError::Invalid(format!(
                "jitter_suppression_probability must be within [0, 1], got {}",
                self.jitter_suppression_probability
            )));
        }
        if self.multi_touch_enabled {
            return Err(ConfigError::Invalid(
                "multi_touch_enabled is not supported".into(),
            ));
        }
        Ok(())
    }
}
