//! Pen/touch drag disambiguation.
//!
//! Windows reports digitizer-emulated mouse movement as absolute positions.
//! While dragging, the host hides the cursor and warps it back to where the
//! button went down after every move it accepts, so the next move message is
//! indistinguishable from "no motion". Feeding it raw pen positions makes
//! the dragged value jump around. Instead we track the pen ourselves and tell
//! the host the cursor moved by the accumulated pen delta away from the
//! click origin.

use crate::config::InterceptConfig;
use crate::jitter::JitterPolicy;
use crate::message::Message;
use crate::platform::InputOrigin;
use crate::Point;
use tracing::trace;

/// State of the single drag that can be in progress.
///
/// `accumulated` is zero whenever `down` is false.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PointerDragState {
    down: bool,
    pen_down: bool,
    origin: Point,
    last_digitizer_point: Point,
    accumulated: Point,
    had_digitizer_event: bool,
    had_digitizer_click: bool,
    was_digitizer_click: bool,
    settle_moves: u32,
}

impl PointerDragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    /// Where the host believes the button went down.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn accumulated(&self) -> Point {
        self.accumulated
    }

    pub fn last_digitizer_point(&self) -> Point {
        self.last_digitizer_point
    }

    /// Whether the current drag has produced pen movement.
    pub fn was_digitizer_click(&self) -> bool {
        self.was_digitizer_click
    }

    pub fn button_down(&mut self, msg: Message, origin: InputOrigin) {
        let pen = origin == InputOrigin::PenOrTouch;
        if pen {
            self.had_digitizer_click = true;
            self.had_digitizer_event = true;
        }
        self.pen_down = pen;
        self.down = true;
        self.origin = msg.point();
        self.was_digitizer_click = false;
        self.accumulated = Point::default();
        trace!(origin = ?self.origin, pen, "drag button down");
    }

    pub fn button_up(&mut self) {
        self.down = false;
        self.pen_down = false;
        self.accumulated = Point::default();
        self.had_digitizer_event = false;
        self.had_digitizer_click = false;
    }

    /// A double-click stands in for the second button-down, so it starts a
    /// drag. Pen double-clicks are re-anchored to the last tracked pen point,
    /// and the spurious re-position Windows injects afterwards is ignored.
    pub fn double_click(
        &mut self,
        msg: Message,
        origin: InputOrigin,
        config: &InterceptConfig,
    ) -> Message {
        if origin != InputOrigin::PenOrTouch {
            self.button_down(msg, origin);
            return msg;
        }
        let rewritten = msg.with_point(self.last_digitizer_point);
        self.button_down(rewritten, origin);
        self.settle_moves = config.double_click_settle_moves;
        trace!(point = ?self.last_digitizer_point, "pen double click re-anchored");
        rewritten
    }

    /// Rewrite a mouse move. `cursor_visible` false means the host is
    /// running a drag.
    pub fn mouse_move(
        &mut self,
        msg: Message,
        origin: InputOrigin,
        cursor_visible: bool,
        jitter: &mut dyn JitterPolicy,
        config: &InterceptConfig,
    ) -> Message {
        let pen = origin == InputOrigin::PenOrTouch;
        let settling = self.settle_moves > 0;
        if settling {
            self.settle_moves -= 1;
        }
        let point = msg.point();

        if cursor_visible || !self.down {
            if pen && !settling {
                self.last_digitizer_point = point;
            }
            return msg;
        }

        // A pen move landing exactly on the origin right after a pen click is
        // the host's own warp echoed back to us.
        let echo = pen && self.had_digitizer_event && point == self.origin;

        if pen && !echo {
            let acknowledged = !self.had_digitizer_event;
            self.had_digitizer_event = true;
            self.was_digitizer_click = true;

            // Settling moves neither count nor move the baseline.
            if !settling {
                self.accumulated += point - self.last_digitizer_point;
                self.last_digitizer_point = point;
            }

            if !acknowledged
                && (self.accumulated.within(config.jitter_threshold) || jitter.suppress())
            {
                trace!(accumulated = ?self.accumulated, "pen move held at origin");
                return msg.with_point(self.origin);
            }

            let target = self.origin + self.accumulated;
            trace!(origin = ?self.origin, accumulated = ?self.accumulated, "pen move rewritten");
            return msg.with_point(target);
        }

        if self.had_digitizer_event || self.pen_down {
            // The host accepted our last move and warped the cursor back.
            if self.had_digitizer_click {
                self.had_digitizer_click = false;
                self.origin = point;
            }
            self.accumulated = Point::default();
            self.had_digitizer_event = false;
            trace!(origin = ?self.origin, echo, "host cursor warp");
            return msg.with_point(self.origin);
        }

        msg
    }
}
