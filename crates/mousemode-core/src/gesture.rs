//! Two-finger pan gestures expressed as a Ctrl+Alt click-drag.
//!
//! The host has no idea what a pan gesture is, but it pans the view on a
//! Ctrl+Alt drag. A gesture begin presses Ctrl+Alt, warps the cursor to the
//! touch point and pushes the button down; updates drag; the end releases
//! the button and puts the cursor back where the user left it.

use crate::message::{Message, GF_BEGIN, GF_END, GF_INERTIA, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE};
use crate::reaction::{Effect, Outcome, Reaction};
use crate::synth::{key_down, key_up, vk};
use crate::Point;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    /// Just began; the cursor warp has not echoed back yet.
    Active,
    Updating,
    /// Fingers lifted, the platform keeps reporting motion.
    Inertia,
}

/// The single emulated gesture drag.
///
/// `button_down` implies `active || in_inertia`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PanGestureState {
    active: bool,
    button_down: bool,
    in_inertia: bool,
    echo_pending: bool,
    last_point: Point,
    pre_gesture_cursor: Point,
}

impl PanGestureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        if self.in_inertia {
            GesturePhase::Inertia
        } else if !self.button_down {
            GesturePhase::Idle
        } else if self.echo_pending {
            GesturePhase::Active
        } else {
            GesturePhase::Updating
        }
    }

    pub fn is_button_down(&self) -> bool {
        self.button_down
    }

    /// Last gesture point, in client coordinates.
    pub fn last_point(&self) -> Point {
        self.last_point
    }

    /// Real cursor position (screen) sampled before the gesture began.
    pub fn pre_gesture_cursor(&self) -> Point {
        self.pre_gesture_cursor
    }

    /// Handle one `GID_PAN` gesture message. `client` is the gesture point in
    /// the window's client space, `screen` the same point on screen.
    pub fn pan(&mut self, flags: u32, client: Point, screen: Point) -> Reaction {
        let mut effects = Vec::new();
        let restarted = self.in_inertia && flags == 0;

        if restarted || flags & GF_BEGIN != 0 {
            if self.button_down {
                effects.push(Effect::Deliver(button_up_at(self.last_point)));
            }
            debug!(?client, restarted, "pan gesture begin");
            self.active = true;
            self.button_down = true;
            self.in_inertia = false;
            self.echo_pending = true;
            effects.push(Effect::Send(vec![key_down(vk::CONTROL), key_down(vk::MENU)]));
            effects.push(Effect::SetCursor(screen));
            effects.push(Effect::Deliver(Message::mouse(WM_MOUSEMOVE, 0, client)));
            effects.push(Effect::Deliver(Message::mouse(WM_LBUTTONDOWN, 0, client)));
            effects.push(Effect::Send(vec![key_up(vk::CONTROL), key_up(vk::MENU)]));
            self.last_point = client;
        }

        if flags & GF_INERTIA != 0 {
            trace!("pan gesture inertia");
            self.in_inertia = true;
            self.active = false;
            self.echo_pending = false;
        }

        if flags & GF_END != 0 {
            debug!(?client, "pan gesture end");
            self.in_inertia = false;
            self.active = false;
            self.echo_pending = false;
            if self.button_down {
                self.button_down = false;
                self.last_point = client;
                effects.push(Effect::Deliver(button_up_at(client)));
                effects.push(Effect::SetCursor(self.pre_gesture_cursor));
            }
        }

        if flags & GF_BEGIN == 0 && self.button_down {
            effects.push(Effect::Deliver(Message::mouse(WM_MOUSEMOVE, 0, client)));
            self.last_point = client;
        }

        Reaction::with_effects(effects, Outcome::Consumed)
    }

    /// Look at a real mouse move while a gesture may be running. Returns a
    /// reaction when the move belongs to the gesture machinery and must not
    /// reach the host; `None` lets it through.
    pub fn pointer_moved(&mut self, msg: Message, cursor: Point) -> Option<Reaction> {
        if self.button_down && !self.echo_pending {
            // A real mouse cannot move while fingers pan; the user took over.
            debug!(point = ?msg.point(), "mouse moved during pan, cancelling");
            self.button_down = false;
            self.active = false;
            self.in_inertia = false;
            return Some(Reaction::with_effects(
                vec![
                    Effect::Deliver(button_up_at(self.last_point)),
                    Effect::SetCursor(self.pre_gesture_cursor),
                ],
                Outcome::Consumed,
            ));
        }

        if self.button_down && !self.in_inertia && msg.point() != self.last_point {
            trace!(point = ?msg.point(), "ignoring mouse move while pan starts");
            return Some(Reaction::consumed());
        }

        self.echo_pending = false;
        if !self.button_down {
            self.pre_gesture_cursor = cursor;
        }
        None
    }
}

fn button_up_at(point: Point) -> Message {
    Message::mouse(WM_LBUTTONUP, 0, point)
}
