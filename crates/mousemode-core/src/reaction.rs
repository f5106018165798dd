//! What a handler wants done after it has updated its state.
//!
//! Handlers never call the platform themselves. Synthesizing input or calling
//! the original window procedure can re-enter dispatch before the call
//! returns, so the interceptor applies effects only after every state lock is
//! released.

use crate::message::Message;
use crate::synth::KeyInput;
use crate::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// One batch of synthetic keys for the global input queue.
    Send(Vec<KeyInput>),
    /// Move the real cursor (screen coordinates).
    SetCursor(Point),
    /// Call the window's original handler directly.
    Deliver(Message),
    /// Like `Deliver`, but Ctrl+wheel messages reaching the interceptor while
    /// it runs are treated as scrolling rather than zoom.
    DeliverScroll(Message),
    /// Release the gesture-info handle carried by a `WM_GESTURE` lparam.
    CloseGesture(isize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Forward this (possibly rewritten) message to the original handler.
    Forward(Message),
    /// Skip forwarding and return a no-op result.
    Consumed,
    /// Skip forwarding and return the result of the last delivery effect.
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub effects: Vec<Effect>,
    pub outcome: Outcome,
}

impl Reaction {
    pub fn forward(msg: Message) -> Self {
        Self {
            effects: Vec::new(),
            outcome: Outcome::Forward(msg),
        }
    }

    pub fn consumed() -> Self {
        Self {
            effects: Vec::new(),
            outcome: Outcome::Consumed,
        }
    }

    pub fn with_effects(effects: Vec<Effect>, outcome: Outcome) -> Self {
        Self { effects, outcome }
    }

    /// All key transitions this reaction sends, in order.
    pub fn sent_keys(&self) -> Vec<KeyInput> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Send(keys) => Some(keys.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }
}
