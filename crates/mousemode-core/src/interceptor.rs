//! The single message-dispatch entry point for hooked windows.

use crate::config::{InterceptConfig, UnregisteredWindowPolicy};
use crate::error::ConfigResult;
use crate::gesture::PanGestureState;
use crate::jitter::{JitterPolicy, RandomJitter};
use crate::keys;
use crate::message::*;
use crate::platform::{InputOrigin, OriginClassifier, Platform, SignatureClassifier};
use crate::pointer::PointerDragState;
use crate::reaction::{Effect, Outcome, Reaction};
use crate::registry::{HookedWindow, WindowLifecycle, WindowRegistry};
use crate::synth::vk;
use crate::wheel::WheelAccumulator;
use crate::WindowHandle;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Mutable state shared by every handler. There is one drag, one gesture
/// and one set of wheel accumulators for the whole process.
pub struct InterceptState {
    pub pointer: PointerDragState,
    pub wheel: WheelAccumulator,
    pub gesture: PanGestureState,
    jitter: Box<dyn JitterPolicy>,
}

impl InterceptState {
    fn new(jitter: Box<dyn JitterPolicy>) -> Self {
        Self {
            pointer: PointerDragState::new(),
            wheel: WheelAccumulator::new(),
            gesture: PanGestureState::new(),
            jitter,
        }
    }
}

/// Routes messages of hooked windows through the rewriting state machines.
///
/// Dispatch is re-entrant: applying a reaction can synchronously deliver a
/// new message to `dispatch` on the same thread. State is locked only while
/// a handler computes its reaction, never while effects run.
pub struct Interceptor<P: Platform> {
    config: InterceptConfig,
    platform: P,
    classifier: Box<dyn OriginClassifier>,
    registry: WindowRegistry,
    state: Mutex<InterceptState>,
    scroll_deliveries: AtomicUsize,
}

impl<P: Platform> Interceptor<P> {
    /// Fails when `config` does not validate.
    pub fn new(config: InterceptConfig, platform: P) -> ConfigResult<Self> {
        config.validate()?;
        let jitter = RandomJitter::new(config.jitter_suppression_probability);
        Ok(Self {
            config,
            platform,
            classifier: Box::new(SignatureClassifier),
            registry: WindowRegistry::new(),
            state: Mutex::new(InterceptState::new(Box::new(jitter))),
            scroll_deliveries: AtomicUsize::new(0),
        })
    }

    pub fn with_jitter(self, jitter: Box<dyn JitterPolicy>) -> Self {
        Self {
            state: Mutex::new(InterceptState::new(jitter)),
            ..self
        }
    }

    pub fn with_classifier(self, classifier: Box<dyn OriginClassifier>) -> Self {
        Self { classifier, ..self }
    }

    pub fn config(&self) -> &InterceptConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Run `f` against the current state.
    pub fn inspect<R>(&self, f: impl FnOnce(&InterceptState) -> R) -> R {
        f(&self.lock_state())
    }

    fn lock_state(&self) -> MutexGuard<'_, InterceptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn hook(&self, window: WindowHandle) -> bool {
        self.registry.hook(window, &self.platform)
    }

    pub fn unhook(&self, window: WindowHandle) -> bool {
        self.registry.unhook(window, &self.platform)
    }

    pub fn unhook_all(&self) -> usize {
        self.registry.unhook_all(&self.platform)
    }

    /// React to a window lifecycle notification.
    pub fn on_lifecycle(&self, event: WindowLifecycle, window: WindowHandle) {
        match event {
            WindowLifecycle::Engaged => {
                self.hook(window);
            }
            WindowLifecycle::Destroyed => {
                self.unhook(window);
            }
            WindowLifecycle::Created => {
                trace!(?window, "window created");
            }
        }
    }

    /// Handle one message for `window` and return the window procedure result.
    pub fn dispatch(&self, window: WindowHandle, msg: Message) -> isize {
        let Some(hooked) = self.registry.get(window) else {
            return self.unregistered(window, msg);
        };
        let reaction = self.react(window, msg);
        self.apply(hooked, reaction)
    }

    fn unregistered(&self, window: WindowHandle, msg: Message) -> isize {
        match self.config.unregistered_window {
            UnregisteredWindowPolicy::PassThrough => {
                trace!(?window, id = msg.id, "message for unhooked window passed to default");
                self.platform.call_default(window, msg)
            }
            UnregisteredWindowPolicy::Swallow => 0,
        }
    }

    fn react(&self, window: WindowHandle, msg: Message) -> Reaction {
        let config = &self.config;
        match msg.id {
            WM_LBUTTONDOWN if config.digitizer_fix_enabled => {
                let origin = self.origin();
                self.lock_state().pointer.button_down(msg, origin);
                Reaction::forward(msg)
            }
            WM_LBUTTONUP => {
                self.lock_state().pointer.button_up();
                Reaction::forward(msg)
            }
            WM_LBUTTONDBLCLK if config.digitizer_fix_enabled => {
                let origin = self.origin();
                let msg = self.lock_state().pointer.double_click(msg, origin, config);
                Reaction::forward(msg)
            }
            WM_MOUSEMOVE => self.mouse_move(msg),
            WM_KEYDOWN if config.ctrl_shift_z_remap_enabled => {
                let ctrl = self.platform.key_held(vk::CONTROL);
                let shift = self.platform.key_held(vk::SHIFT);
                keys::redo_substitution(msg, ctrl, shift).unwrap_or_else(|| Reaction::forward(msg))
            }
            WM_CHAR if config.plus_without_shift_enabled => {
                let shift = self.platform.key_held(vk::SHIFT);
                Reaction::forward(keys::plus_without_shift(msg, shift))
            }
            WM_GESTURENOTIFY if config.touch_pan_gesture_enabled => {
                self.platform.enable_pan_gestures(window);
                Reaction::forward(msg)
            }
            WM_GESTURE if config.touch_pan_gesture_enabled => self.gesture(window, msg),
            WM_MOUSEWHEEL => self.wheel(msg),
            WM_MOUSEHWHEEL if config.scroll_override_enabled => {
                self.lock_state().wheel.horizontal(msg, config)
            }
            _ => Reaction::forward(msg),
        }
    }

    fn origin(&self) -> InputOrigin {
        self.classifier.classify(self.platform.message_extra_info())
    }

    fn mouse_move(&self, msg: Message) -> Reaction {
        let origin = self.origin();
        let cursor_visible = self.platform.cursor_visible();
        let cursor = self.platform.cursor_pos();

        let mut guard = self.lock_state();
        let state = &mut *guard;
        if self.config.touch_pan_gesture_enabled {
            if let Some(reaction) = state.gesture.pointer_moved(msg, cursor) {
                return reaction;
            }
        }
        if !self.config.digitizer_fix_enabled {
            return Reaction::forward(msg);
        }
        let msg = state.pointer.mouse_move(
            msg,
            origin,
            cursor_visible,
            state.jitter.as_mut(),
            &self.config,
        );
        Reaction::forward(msg)
    }

    fn gesture(&self, window: WindowHandle, msg: Message) -> Reaction {
        let Some(info) = self.platform.gesture_info(msg.lparam) else {
            return Reaction::forward(msg);
        };
        if info.id != GID_PAN {
            return Reaction::forward(msg);
        }
        let client = self.platform.screen_to_client(window, info.location);
        let mut reaction = self.lock_state().gesture.pan(info.flags, client, info.location);
        reaction.effects.push(Effect::CloseGesture(msg.lparam));
        reaction
    }

    fn wheel(&self, msg: Message) -> Reaction {
        let config = &self.config;
        // A Ctrl+wheel can be the touchpad's pinch emulation or a user holding
        // Ctrl. They look identical, so it is always zoom, except for the
        // Ctrl+wheel we deliver ourselves for horizontal scrolling.
        let delivering_scroll = self.scroll_deliveries.load(Ordering::SeqCst) > 0;
        if config.trackpad_zoom_enabled && !delivering_scroll && msg.modifiers() == MK_CONTROL {
            return self.lock_state().wheel.zoom(msg, config);
        }
        if config.scroll_override_enabled {
            return self.lock_state().wheel.vertical(msg, config);
        }
        Reaction::forward(msg)
    }

    fn apply(&self, hooked: HookedWindow, reaction: Reaction) -> isize {
        let mut delivered = 0;
        for effect in reaction.effects {
            match effect {
                Effect::Send(keys) => self.platform.send_input(&keys),
                Effect::SetCursor(point) => self.platform.set_cursor_pos(point),
                Effect::Deliver(msg) => {
                    delivered = self.platform.call_original(hooked.original, hooked.handle, msg);
                }
                Effect::DeliverScroll(msg) => {
                    let _guard = ScrollDelivery::enter(&self.scroll_deliveries);
                    delivered = self.platform.call_original(hooked.original, hooked.handle, msg);
                }
                Effect::CloseGesture(lparam) => self.platform.close_gesture_info(lparam),
            }
        }

        match reaction.outcome {
            Outcome::Forward(msg) => self.platform.call_original(hooked.original, hooked.handle, msg),
            Outcome::Consumed => 0,
            Outcome::Delivered => delivered,
        }
    }
}

/// Marks a horizontal-scroll delivery in progress for its lifetime.
struct ScrollDelivery<'a>(&'a AtomicUsize);

impl<'a> ScrollDelivery<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ScrollDelivery<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WheelScale;
    use crate::error::{ConfigError, HookResult};
    use crate::gesture::GesturePhase;
    use crate::jitter::NeverSuppress;
    use crate::platform::{GestureInfo, Subclasser};
    use crate::synth::{key_down, key_tap, key_up, KeyInput};
    use crate::{HandlerRef, Point};
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, OnceLock, Weak};

    const PEN: usize = 0xFF51_5780;
    const WINDOW: WindowHandle = WindowHandle(42);

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Install(WindowHandle),
        Restore(WindowHandle, HandlerRef),
        Original(Message),
        Default(Message),
        Keys(Vec<KeyInput>),
        SetCursor(Point),
        CloseGesture(isize),
        EnablePan(WindowHandle),
    }

    #[derive(Default)]
    struct FakePlatform {
        calls: Mutex<Vec<Call>>,
        extra_info: AtomicUsize,
        cursor_hidden: AtomicBool,
        cursor: Mutex<Point>,
        held: Mutex<Vec<u16>>,
        gesture: Mutex<Option<GestureInfo>>,
        /// When set, an outermost delivery to the original handler feeds the
        /// message the closure picks back through dispatch, like a host that
        /// sends messages to itself.
        reenter: OnceLock<(Weak<Interceptor<FakePlatform>>, Reentry)>,
        depth: AtomicUsize,
    }

    type Reentry = Box<dyn Fn(Message) -> Option<Message> + Send + Sync>;

    impl FakePlatform {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn take_calls(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }

        fn set_pen(&self, pen: bool) {
            self.extra_info.store(if pen { PEN } else { 0 }, Ordering::SeqCst);
        }

        fn hide_cursor(&self, hidden: bool) {
            self.cursor_hidden.store(hidden, Ordering::SeqCst);
        }

        fn hold(&self, keys: &[u16]) {
            *self.held.lock().unwrap() = keys.to_vec();
        }

        fn set_gesture(&self, info: GestureInfo) {
            *self.gesture.lock().unwrap() = Some(info);
        }
    }

    impl Subclasser for FakePlatform {
        fn install(&self, window: WindowHandle) -> HookResult<HandlerRef> {
            self.record(Call::Install(window));
            Ok(HandlerRef(window.0 + 1))
        }

        fn restore(&self, window: WindowHandle, original: HandlerRef) -> HookResult<()> {
            self.record(Call::Restore(window, original));
            Ok(())
        }
    }

    impl Platform for FakePlatform {
        fn call_original(&self, _original: HandlerRef, window: WindowHandle, msg: Message) -> isize {
            self.record(Call::Original(msg));
            if let Some((weak, reentry)) = self.reenter.get() {
                if self.depth.fetch_add(1, Ordering::SeqCst) == 0 {
                    if let (Some(interceptor), Some(nested)) = (weak.upgrade(), reentry(msg)) {
                        interceptor.dispatch(window, nested);
                    }
                }
                self.depth.fetch_sub(1, Ordering::SeqCst);
            }
            msg.id as isize
        }

        fn call_default(&self, _window: WindowHandle, msg: Message) -> isize {
            self.record(Call::Default(msg));
            -1
        }

        fn message_extra_info(&self) -> usize {
            self.extra_info.load(Ordering::SeqCst)
        }

        fn cursor_visible(&self) -> bool {
            !self.cursor_hidden.load(Ordering::SeqCst)
        }

        fn cursor_pos(&self) -> Point {
            *self.cursor.lock().unwrap()
        }

        fn set_cursor_pos(&self, point: Point) {
            self.record(Call::SetCursor(point));
        }

        fn screen_to_client(&self, _window: WindowHandle, point: Point) -> Point {
            point - Point::new(100, 100)
        }

        fn key_held(&self, vk: u16) -> bool {
            self.held.lock().unwrap().contains(&vk)
        }

        fn send_input(&self, inputs: &[KeyInput]) {
            self.record(Call::Keys(inputs.to_vec()));
        }

        fn gesture_info(&self, _lparam: isize) -> Option<GestureInfo> {
            *self.gesture.lock().unwrap()
        }

        fn close_gesture_info(&self, lparam: isize) {
            self.record(Call::CloseGesture(lparam));
        }

        fn enable_pan_gestures(&self, window: WindowHandle) {
            self.record(Call::EnablePan(window));
        }
    }

    fn interceptor(config: InterceptConfig) -> Interceptor<FakePlatform> {
        let interceptor = Interceptor::new(config, FakePlatform::default())
            .unwrap()
            .with_jitter(Box::new(NeverSuppress));
        assert!(interceptor.hook(WINDOW));
        interceptor.platform().take_calls();
        interceptor
    }

    /// An interceptor whose platform re-dispatches whatever `reentry` maps an
    /// outermost delivery to.
    fn reentrant(
        reentry: impl Fn(Message) -> Option<Message> + Send + Sync + 'static,
    ) -> Arc<Interceptor<FakePlatform>> {
        let interceptor = Arc::new(interceptor(InterceptConfig::default()));
        let weak = Arc::downgrade(&interceptor);
        let reentry: Reentry = Box::new(reentry);
        assert!(interceptor.platform().reenter.set((weak, reentry)).is_ok());
        interceptor
    }

    fn pan(platform: &FakePlatform, flags: u32, x: i32, y: i32) {
        platform.set_gesture(GestureInfo {
            id: GID_PAN,
            flags,
            location: Point::new(x, y),
        });
    }

    fn at(id: u32, x: i32, y: i32) -> Message {
        Message::mouse(id, 0, Point::new(x, y))
    }

    fn wheel(id: u32, modifiers: u16, delta: i32) -> Message {
        Message::new(WM_MOUSEWHEEL, 0, 0).as_wheel(id, modifiers, delta)
    }

    fn forwarded_points(calls: &[Call]) -> Vec<Point> {
        calls
            .iter()
            .filter_map(|c| match c {
                Call::Original(m) if m.id == WM_MOUSEMOVE => Some(m.point()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_mouse_drag_passes_through_unchanged() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();

        interceptor.dispatch(WINDOW, at(WM_LBUTTONDOWN, 10, 10));
        platform.hide_cursor(true);
        for x in [12, 30, 5] {
            interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, x, 10));
        }

        assert_eq!(
            forwarded_points(&platform.take_calls()),
            vec![Point::new(12, 10), Point::new(30, 10), Point::new(5, 10)]
        );
    }

    #[test]
    fn test_pen_drag_reported_relative_to_origin() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();
        platform.set_pen(true);

        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 100, 100));
        interceptor.dispatch(WINDOW, at(WM_LBUTTONDOWN, 100, 100));
        platform.take_calls();
        platform.hide_cursor(true);

        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 110, 100));
        // The host warped the cursor back to the click point.
        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 100, 100));
        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 115, 100));

        assert_eq!(
            forwarded_points(&platform.take_calls()),
            vec![Point::new(110, 100), Point::new(100, 100), Point::new(105, 100)]
        );

        interceptor.dispatch(WINDOW, at(WM_LBUTTONUP, 115, 100));
        interceptor.inspect(|state| {
            assert!(!state.pointer.is_down());
            assert_eq!(state.pointer.accumulated(), Point::default());
        });
    }

    #[test]
    fn test_digitizer_fix_disabled_forwards_pen_moves() {
        let config = InterceptConfig {
            digitizer_fix_enabled: false,
            ..Default::default()
        };
        let interceptor = interceptor(config);
        let platform = interceptor.platform();
        platform.set_pen(true);

        interceptor.dispatch(WINDOW, at(WM_LBUTTONDOWN, 100, 100));
        platform.hide_cursor(true);
        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 140, 90));

        assert_eq!(forwarded_points(&platform.take_calls()), vec![Point::new(140, 90)]);
        interceptor.inspect(|state| assert!(!state.pointer.is_down()));
    }

    #[test]
    fn test_ctrl_shift_z_becomes_ctrl_y() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();
        platform.hold(&[vk::CONTROL, vk::SHIFT]);

        let result = interceptor.dispatch(WINDOW, Message::new(WM_KEYDOWN, vk::Z as usize, 1));

        assert_eq!(result, 0);
        assert_eq!(
            platform.take_calls(),
            vec![Call::Keys(vec![
                key_up(vk::SHIFT),
                key_down(vk::Y),
                key_up(vk::Y),
                key_down(vk::SHIFT),
            ])]
        );
    }

    #[test]
    fn test_plain_z_is_forwarded() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();
        platform.hold(&[vk::CONTROL]);

        let msg = Message::new(WM_KEYDOWN, vk::Z as usize, 1);
        interceptor.dispatch(WINDOW, msg);
        assert_eq!(platform.take_calls(), vec![Call::Original(msg)]);
    }

    #[test]
    fn test_equals_char_becomes_plus() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();

        interceptor.dispatch(WINDOW, Message::new(WM_CHAR, '=' as usize, 1));
        assert_eq!(
            platform.take_calls(),
            vec![Call::Original(Message::new(WM_CHAR, '+' as usize, 1))]
        );
    }

    #[test]
    fn test_vertical_wheel_emits_whole_notches() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();

        // 30 scales to 40: nothing, nothing, one notch.
        assert_eq!(interceptor.dispatch(WINDOW, wheel(WM_MOUSEWHEEL, 0, 30)), 0);
        assert_eq!(interceptor.dispatch(WINDOW, wheel(WM_MOUSEWHEEL, 0, 30)), 0);
        assert!(platform.take_calls().is_empty());

        interceptor.dispatch(WINDOW, wheel(WM_MOUSEWHEEL, 0, 30));
        assert_eq!(
            platform.take_calls(),
            vec![Call::Original(wheel(WM_MOUSEWHEEL, 0, 120))]
        );
    }

    #[test]
    fn test_horizontal_wheel_delivered_as_ctrl_wheel() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();

        let result = interceptor.dispatch(WINDOW, wheel(WM_MOUSEHWHEEL, 0, 60));

        assert_eq!(result, WM_MOUSEWHEEL as isize);
        assert_eq!(
            platform.take_calls(),
            vec![
                Call::Keys(vec![key_down(vk::CONTROL)]),
                Call::Original(wheel(WM_MOUSEWHEEL, MK_CONTROL, -120)),
                Call::Keys(vec![key_up(vk::CONTROL)]),
            ]
        );
    }

    #[test]
    fn test_ctrl_wheel_zooms_with_keys() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();

        let result = interceptor.dispatch(WINDOW, wheel(WM_MOUSEWHEEL, MK_CONTROL, 240));

        assert_eq!(result, 0);
        assert_eq!(
            platform.take_calls(),
            vec![
                Call::Keys(vec![key_up(vk::CONTROL)]),
                Call::Keys(key_tap(vk::OEM_PLUS).to_vec()),
                Call::Keys(key_tap(vk::OEM_PLUS).to_vec()),
                Call::Keys(vec![key_down(vk::CONTROL)]),
            ]
        );
    }

    #[test]
    fn test_reentrant_scroll_delivery_is_not_zoom() {
        let interceptor = reentrant(Some);
        let platform = interceptor.platform();

        interceptor.dispatch(WINDOW, wheel(WM_MOUSEHWHEEL, 0, 60));

        let delivered = wheel(WM_MOUSEWHEEL, MK_CONTROL, -120);
        assert_eq!(
            platform.take_calls(),
            vec![
                Call::Keys(vec![key_down(vk::CONTROL)]),
                Call::Original(delivered),
                // Nested dispatch scrolled it vertically (-160 -> -120).
                Call::Original(delivered),
                Call::Keys(vec![key_up(vk::CONTROL)]),
            ]
        );
        interceptor.inspect(|state| {
            assert_eq!(state.wheel.residual(crate::wheel::WheelAxis::Vertical), -40);
            assert_eq!(state.wheel.residual(crate::wheel::WheelAxis::Zoom), 0);
        });
    }

    #[test]
    fn test_pan_gesture_drives_ctrl_alt_drag() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();
        *platform.cursor.lock().unwrap() = Point::new(20, 30);
        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 5, 5));
        platform.take_calls();

        platform.set_gesture(GestureInfo {
            id: GID_PAN,
            flags: GF_BEGIN,
            location: Point::new(500, 400),
        });
        let gesture = Message::new(WM_GESTURE, 0, 77);
        assert_eq!(interceptor.dispatch(WINDOW, gesture), 0);
        assert_eq!(
            platform.take_calls(),
            vec![
                Call::Keys(vec![key_down(vk::CONTROL), key_down(vk::MENU)]),
                Call::SetCursor(Point::new(500, 400)),
                Call::Original(at(WM_MOUSEMOVE, 400, 300)),
                Call::Original(at(WM_LBUTTONDOWN, 400, 300)),
                Call::Keys(vec![key_up(vk::CONTROL), key_up(vk::MENU)]),
                Call::CloseGesture(77),
            ]
        );

        platform.set_gesture(GestureInfo {
            id: GID_PAN,
            flags: GF_END,
            location: Point::new(510, 400),
        });
        interceptor.dispatch(WINDOW, gesture);
        assert_eq!(
            platform.take_calls(),
            vec![
                Call::Original(at(WM_LBUTTONUP, 410, 300)),
                Call::SetCursor(Point::new(20, 30)),
                Call::CloseGesture(77),
            ]
        );
    }

    #[test]
    fn test_warp_echo_during_pan_begin_clears_pending() {
        let interceptor = reentrant(|m| (m.id == WM_MOUSEMOVE).then_some(m));
        let platform = interceptor.platform();

        pan(platform, GF_BEGIN, 500, 400);
        assert_eq!(interceptor.dispatch(WINDOW, Message::new(WM_GESTURE, 0, 77)), 0);

        assert_eq!(
            platform.take_calls(),
            vec![
                Call::Keys(vec![key_down(vk::CONTROL), key_down(vk::MENU)]),
                Call::SetCursor(Point::new(500, 400)),
                Call::Original(at(WM_MOUSEMOVE, 400, 300)),
                // The echo reached dispatch and was let through.
                Call::Original(at(WM_MOUSEMOVE, 400, 300)),
                Call::Original(at(WM_LBUTTONDOWN, 400, 300)),
                Call::Keys(vec![key_up(vk::CONTROL), key_up(vk::MENU)]),
                Call::CloseGesture(77),
            ]
        );
        interceptor.inspect(|state| assert_eq!(state.gesture.phase(), GesturePhase::Updating));
    }

    #[test]
    fn test_stray_move_during_pan_begin_is_swallowed() {
        let fired = AtomicBool::new(false);
        let interceptor = reentrant(move |m| {
            (m.id == WM_MOUSEMOVE && !fired.swap(true, Ordering::SeqCst))
                .then(|| at(WM_MOUSEMOVE, 401, 300))
        });
        let platform = interceptor.platform();

        pan(platform, GF_BEGIN, 500, 400);
        interceptor.dispatch(WINDOW, Message::new(WM_GESTURE, 0, 77));

        let calls = platform.take_calls();
        assert_eq!(
            forwarded_points(&calls),
            vec![Point::new(400, 300)],
            "stray move must not reach the host: {calls:?}"
        );
        interceptor.inspect(|state| {
            assert_eq!(state.gesture.phase(), GesturePhase::Active);
            assert!(state.gesture.is_button_down());
        });
    }

    #[test]
    fn test_real_move_during_pan_delivery_cancels_drag() {
        let interceptor = reentrant(|m| {
            (m.id == WM_MOUSEMOVE && m.point() == Point::new(420, 300))
                .then(|| at(WM_MOUSEMOVE, 5, 5))
        });
        let platform = interceptor.platform();

        pan(platform, GF_BEGIN, 500, 400);
        interceptor.dispatch(WINDOW, Message::new(WM_GESTURE, 0, 77));
        // Echo of the begin warp.
        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 400, 300));
        platform.take_calls();

        // The update's delivery lets a real mouse move in.
        pan(platform, 0, 520, 400);
        assert_eq!(interceptor.dispatch(WINDOW, Message::new(WM_GESTURE, 0, 77)), 0);
        assert_eq!(
            platform.take_calls(),
            vec![
                Call::Original(at(WM_MOUSEMOVE, 420, 300)),
                Call::Original(at(WM_LBUTTONUP, 420, 300)),
                Call::SetCursor(Point::default()),
                Call::CloseGesture(77),
            ]
        );
        interceptor.inspect(|state| {
            assert_eq!(state.gesture.phase(), GesturePhase::Idle);
            assert!(!state.gesture.is_button_down());
        });
    }

    #[test]
    fn test_other_gestures_forwarded_untouched() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();
        platform.set_gesture(GestureInfo {
            id: 3,
            flags: GF_BEGIN,
            location: Point::new(0, 0),
        });

        let gesture = Message::new(WM_GESTURE, 0, 5);
        interceptor.dispatch(WINDOW, gesture);
        assert_eq!(platform.take_calls(), vec![Call::Original(gesture)]);
    }

    #[test]
    fn test_gesture_notify_enables_pan() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();

        let notify = Message::new(WM_GESTURENOTIFY, 0, 0);
        interceptor.dispatch(WINDOW, notify);
        assert_eq!(
            platform.take_calls(),
            vec![Call::EnablePan(WINDOW), Call::Original(notify)]
        );
    }

    #[test]
    fn test_large_vertical_wheel_delivered_in_pieces() {
        let interceptor = interceptor(InterceptConfig::default());
        let platform = interceptor.platform();

        let result = interceptor.dispatch(WINDOW, wheel(WM_MOUSEWHEEL, 0, 32767));

        assert_eq!(result, WM_MOUSEWHEEL as isize);
        assert_eq!(
            platform.take_calls(),
            vec![
                Call::Original(wheel(WM_MOUSEWHEEL, 0, 32760)),
                Call::Original(wheel(WM_MOUSEWHEEL, 0, 10920)),
            ]
        );
    }

    struct AlwaysPen;

    impl OriginClassifier for AlwaysPen {
        fn classify(&self, _extra_info: usize) -> InputOrigin {
            InputOrigin::PenOrTouch
        }
    }

    #[test]
    fn test_custom_classifier_decides_origin() {
        let interceptor =
            interceptor(InterceptConfig::default()).with_classifier(Box::new(AlwaysPen));
        let platform = interceptor.platform();
        assert_eq!(platform.message_extra_info(), 0);

        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 100, 100));
        interceptor.dispatch(WINDOW, at(WM_LBUTTONDOWN, 100, 100));
        platform.take_calls();
        platform.hide_cursor(true);

        // Rewritten as pen input: small motion is held at the click point.
        interceptor.dispatch(WINDOW, at(WM_MOUSEMOVE, 102, 101));
        assert_eq!(forwarded_points(&platform.take_calls()), vec![Point::new(100, 100)]);
        interceptor.inspect(|state| assert!(state.pointer.is_pen_down()));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = InterceptConfig {
            wheel_scale_vertical: WheelScale::new(1, 0),
            ..Default::default()
        };
        let result = Interceptor::new(config, FakePlatform::default());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unregistered_window_policies() {
        let msg = at(WM_MOUSEMOVE, 1, 1);
        let other = WindowHandle(7);

        let passthrough = interceptor(InterceptConfig::default());
        assert_eq!(passthrough.dispatch(other, msg), -1);
        assert_eq!(passthrough.platform().take_calls(), vec![Call::Default(msg)]);

        let swallow = interceptor(InterceptConfig {
            unregistered_window: UnregisteredWindowPolicy::Swallow,
            ..Default::default()
        });
        assert_eq!(swallow.dispatch(other, msg), 0);
        assert!(swallow.platform().take_calls().is_empty());
    }

    #[test]
    fn test_lifecycle_hooks_and_unhooks() {
        let interceptor =
            Interceptor::new(InterceptConfig::default(), FakePlatform::default()).unwrap();
        let window = WindowHandle(9);

        interceptor.on_lifecycle(WindowLifecycle::Created, window);
        assert!(!interceptor.registry().contains(window));

        interceptor.on_lifecycle(WindowLifecycle::Engaged, window);
        interceptor.on_lifecycle(WindowLifecycle::Engaged, window);
        assert_eq!(interceptor.registry().len(), 1);

        interceptor.on_lifecycle(WindowLifecycle::Destroyed, window);
        assert!(interceptor.registry().is_empty());
        assert_eq!(
            interceptor.platform().take_calls(),
            vec![Call::Install(window), Call::Restore(window, HandlerRef(10))]
        );
    }
}
