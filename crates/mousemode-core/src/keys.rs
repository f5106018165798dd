//! Static keyboard remaps.

use crate::message::Message;
use crate::reaction::{Effect, Outcome, Reaction};
use crate::synth::{key_down, key_up, vk};
use tracing::debug;

/// Ctrl+Shift+Z (redo elsewhere) is replaced by Ctrl+Y, which is what the
/// host calls redo. Shift is released around the Y so Ctrl+Y arrives clean.
pub fn redo_substitution(msg: Message, ctrl_held: bool, shift_held: bool) -> Option<Reaction> {
    if msg.wparam != vk::Z as usize || !ctrl_held || !shift_held {
        return None;
    }
    debug!("Ctrl+Shift+Z substituted with Ctrl+Y");
    Some(Reaction::with_effects(
        vec![Effect::Send(vec![
            key_up(vk::SHIFT),
            key_down(vk::Y),
            key_up(vk::Y),
            key_down(vk::SHIFT),
        ])],
        Outcome::Consumed,
    ))
}

/// Typing `=` without Shift zooms in like `+`.
pub fn plus_without_shift(msg: Message, shift_held: bool) -> Message {
    if shift_held || msg.wparam != '=' as usize {
        return msg;
    }
    Message {
        wparam: '+' as usize,
        ..msg
    }
}
