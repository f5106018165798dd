//! Wheel rescaling and notch quantization.
//!
//! High-resolution wheels and touchpads report rotation in fractions of a
//! notch. The host reacts to every message as if it were a whole notch, so
//! we rescale each delta, accumulate it per axis and only let whole notches
//! through.

use crate::config::InterceptConfig;
use crate::message::{Message, MK_CONTROL, WM_MOUSEWHEEL};
use crate::reaction::{Effect, Outcome, Reaction};
use crate::synth::{key_down, key_tap, key_up, vk};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelAxis {
    Vertical,
    Horizontal,
    Zoom,
}

/// Per-axis remainder of rotation not yet emitted.
///
/// Every residual stays strictly within one notch of zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WheelAccumulator {
    vertical: i32,
    horizontal: i32,
    zoom: i32,
}

impl WheelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn residual(&self, axis: WheelAxis) -> i32 {
        match axis {
            WheelAxis::Vertical => self.vertical,
            WheelAxis::Horizontal => self.horizontal,
            WheelAxis::Zoom => self.zoom,
        }
    }

    /// Add already-scaled rotation to `axis` and take out every whole notch,
    /// rounding toward zero. Returns the emitted amount in wheel units.
    pub fn accumulate(&mut self, axis: WheelAxis, scaled: i32, notch: i32) -> i32 {
        let slot = match axis {
            WheelAxis::Vertical => &mut self.vertical,
            WheelAxis::Horizontal => &mut self.horizontal,
            WheelAxis::Zoom => &mut self.zoom,
        };
        *slot = slot.saturating_add(scaled);
        let out = (*slot / notch) * notch;
        *slot -= out;
        out
    }

    /// Vertical wheel: forward only the quantized rotation.
    pub fn vertical(&mut self, msg: Message, config: &InterceptConfig) -> Reaction {
        let scaled = config.wheel_scale_vertical.apply(msg.wheel_delta());
        let out = self.accumulate(WheelAxis::Vertical, scaled, config.min_wheel_notch);
        trace!(raw = msg.wheel_delta(), out, residual = self.vertical, "vertical wheel");
        let chunks = notch_chunks(out, config.min_wheel_notch);
        match chunks.as_slice() {
            [] => Reaction::consumed(),
            [only] => Reaction::forward(msg.as_wheel(WM_MOUSEWHEEL, msg.modifiers(), *only)),
            _ => {
                let effects = chunks
                    .iter()
                    .map(|&chunk| {
                        Effect::Deliver(msg.as_wheel(WM_MOUSEWHEEL, msg.modifiers(), chunk))
                    })
                    .collect();
                Reaction::with_effects(effects, Outcome::Delivered)
            }
        }
    }

    /// Horizontal wheel: the host pans horizontally on Ctrl+vertical wheel,
    /// so emit that with a real Ctrl press around the delivery.
    pub fn horizontal(&mut self, msg: Message, config: &InterceptConfig) -> Reaction {
        let scaled = config.wheel_scale_horizontal.apply(msg.wheel_delta());
        let out = self.accumulate(WheelAxis::Horizontal, scaled, config.min_wheel_notch);
        trace!(raw = msg.wheel_delta(), out, residual = self.horizontal, "horizontal wheel");
        let chunks = notch_chunks(out, config.min_wheel_notch);
        if chunks.is_empty() {
            return Reaction::consumed();
        }
        let mut effects = Vec::with_capacity(chunks.len() + 2);
        effects.push(Effect::Send(vec![key_down(vk::CONTROL)]));
        effects.extend(
            chunks
                .into_iter()
                .map(|chunk| msg.as_wheel(WM_MOUSEWHEEL, MK_CONTROL, chunk))
                .map(Effect::DeliverScroll),
        );
        effects.push(Effect::Send(vec![key_up(vk::CONTROL)]));
        Reaction::with_effects(effects, Outcome::Delivered)
    }

    /// Ctrl+wheel (touchpad pinch emulation, or a user holding Ctrl): turn
    /// whole notches into zoom keystrokes. The held Ctrl is released around
    /// the batch so the host sees plain `+`/`-`.
    pub fn zoom(&mut self, msg: Message, config: &InterceptConfig) -> Reaction {
        let notch = config.min_wheel_notch;
        let out = self.accumulate(WheelAxis::Zoom, msg.wheel_delta(), notch);
        let notches = out / notch;
        trace!(raw = msg.wheel_delta(), notches, residual = self.zoom, "zoom wheel");
        if notches == 0 {
            return Reaction::consumed();
        }

        let key = if notches > 0 { vk::OEM_PLUS } else { vk::OEM_MINUS };
        let mut effects = Vec::with_capacity(notches.unsigned_abs() as usize + 2);
        effects.push(Effect::Send(vec![key_up(vk::CONTROL)]));
        for _ in 0..notches.unsigned_abs() {
            effects.push(Effect::Send(key_tap(key).to_vec()));
        }
        effects.push(Effect::Send(vec![key_down(vk::CONTROL)]));
        Reaction::with_effects(effects, Outcome::Consumed)
    }
}

/// Split emitted rotation into whole-notch pieces that each fit the signed
/// 16-bit delta of a wheel message.
fn notch_chunks(out: i32, notch: i32) -> Vec<i32> {
    let max = ((i32::from(i16::MAX) / notch) * notch).max(notch);
    let mut rest = out;
    let mut chunks = Vec::new();
    while rest != 0 {
        let chunk = rest.clamp(-max, max);
        chunks.push(chunk);
        rest -= chunk;
    }
    chunks
}
