//! Scroll event pipeline
//!
//! Raw host input arrives through [`Runtime::handle_input`] and is routed by
//! `(target, kind)`:
//!
//! - `scroll` is throttled to one update per `scroll_min_update_interval`,
//!   emits `scrollstart` on the first event of a burst and arms the
//!   `scrollstop` timer
//! - overflow notifications re-measure immediately
//! - touch and wheel input keep the gesture from chaining to the parent
//! - track and document pointer input drive track dragging
//!
//! Events without a live subscription are ignored, so nothing delivered
//! after `destroy` has an effect.

use glidebar_animation::{TaskScheduler, TimerId};
use glidebar_core::{
    Axis, InputEvent, InputKind, InputOutcome, ListenTarget, NotificationKind, Point,
    ScrollSurface, Subscription,
};
use smallvec::SmallVec;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::clock::Clock;
use crate::error::Result;
use crate::runtime::{InstanceId, Runtime, Task};

/// Whether a scroll burst is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollPhase {
    #[default]
    Idle,
    /// Between `scrollstart` and `scrollstop`
    Scrolling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    /// A scroll update got through the throttle
    Scroll,
    /// The stop delay elapsed without another update
    Settled,
}

impl ScrollPhase {
    /// New phase, or `None` if the event does not change it
    pub fn on_event(&self, event: PhaseEvent) -> Option<Self> {
        match (self, event) {
            (ScrollPhase::Idle, PhaseEvent::Scroll) => Some(ScrollPhase::Scrolling),
            (ScrollPhase::Scrolling, PhaseEvent::Settled) => Some(ScrollPhase::Idle),
            _ => None,
        }
    }
}

/// Leading-edge throttle with one trailing call.
///
/// A call inside the interval replaces the pending trailing call; when that
/// fires, the interval restarts from the time it was requested.
#[derive(Debug, Default)]
pub(crate) struct Throttle {
    last: Option<Instant>,
    trailing: Option<(TimerId, Instant)>,
}

impl Throttle {
    /// Returns true if the call runs now; otherwise it is deferred as `task`
    pub(crate) fn admit(
        &mut self,
        now: Instant,
        interval: Duration,
        scheduler: &mut TaskScheduler<Task>,
        task: Task,
    ) -> bool {
        match self.last {
            Some(last) if now < last + interval => {
                if let Some(timer) = self.cancel_trailing() {
                    scheduler.cancel(timer);
                }
                let timer = scheduler.schedule(now + interval, task);
                self.trailing = Some((timer, now));
                false
            }
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// The trailing call fired
    pub(crate) fn fire_trailing(&mut self) {
        if let Some((_, requested)) = self.trailing.take() {
            self.last = Some(requested);
        }
    }

    pub(crate) fn cancel_trailing(&mut self) -> Option<TimerId> {
        self.trailing.take().map(|(timer, _)| timer)
    }
}

/// Per-instance event pipeline state
#[derive(Debug, Default)]
pub(crate) struct PipelineState {
    pub(crate) phase: ScrollPhase,
    pub(crate) throttle: Throttle,
    pub(crate) stop_timer: Option<TimerId>,
}

impl PipelineState {
    pub(crate) fn is_idle(&self) -> bool {
        self.phase == ScrollPhase::Idle && self.stop_timer.is_none()
    }

    fn transition(&mut self, event: PhaseEvent) {
        if let Some(next) = self.phase.on_event(event) {
            self.phase = next;
        }
    }
}

impl<S: ScrollSurface, C: Clock> Runtime<S, C> {
    /// Deliver one raw host event for `id`
    pub fn handle_input(
        &mut self,
        id: InstanceId,
        target: ListenTarget,
        event: InputEvent,
    ) -> Result<InputOutcome> {
        let instance = self.instance_mut(id)?;
        if instance.destroyed || !instance.subscriptions.contains(target, event.kind) {
            return Ok(InputOutcome::Ignored);
        }

        let outcome = match (target, event.kind) {
            (ListenTarget::ScrollElement, InputKind::Scroll) => {
                self.on_scroll(id);
                InputOutcome::Handled
            }
            (
                ListenTarget::ScrollElement,
                InputKind::Overflow | InputKind::Underflow | InputKind::OverflowChanged,
            ) => {
                self.measure(id);
                InputOutcome::Handled
            }
            (ListenTarget::ScrollElement, InputKind::TouchStart) => {
                self.on_touch_start(id);
                InputOutcome::Handled
            }
            (ListenTarget::ScrollElement, InputKind::TouchEnd) => {
                self.on_touch_end(id);
                InputOutcome::Handled
            }
            (ListenTarget::ScrollElement, InputKind::Wheel | InputKind::MouseWheel) => {
                self.on_wheel(id);
                InputOutcome::Handled
            }
            (ListenTarget::Track(axis), InputKind::MouseDown | InputKind::TouchStart) => {
                self.on_drag_start(id, axis, event.point)
            }
            (ListenTarget::Document, InputKind::MouseMove | InputKind::TouchMove) => {
                self.on_drag_move(id, event.point)
            }
            (ListenTarget::Document, InputKind::MouseUp | InputKind::TouchEnd) => {
                self.on_drag_end(id);
                InputOutcome::Handled
            }
            _ => InputOutcome::Ignored,
        };
        Ok(outcome)
    }

    /// Register every listener the instance's settings call for
    pub(crate) fn bind(&mut self, id: InstanceId) {
        let touch = self.env.touch;
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.destroyed {
            return;
        }

        let mut wanted: SmallVec<[(ListenTarget, InputKind); 16]> = SmallVec::new();
        for kind in [
            InputKind::Scroll,
            InputKind::Overflow,
            InputKind::Underflow,
            InputKind::OverflowChanged,
        ] {
            wanted.push((ListenTarget::ScrollElement, kind));
        }
        if touch {
            wanted.push((ListenTarget::ScrollElement, InputKind::TouchStart));
            wanted.push((ListenTarget::ScrollElement, InputKind::TouchEnd));
        }
        if instance.settings.prevent_parent_scroll {
            wanted.push((ListenTarget::ScrollElement, InputKind::MouseWheel));
            wanted.push((ListenTarget::ScrollElement, InputKind::Wheel));
        }

        if instance.has_tracks && instance.settings.draggable_tracks {
            let (down, moved, up) = if touch {
                (InputKind::TouchStart, InputKind::TouchMove, InputKind::TouchEnd)
            } else {
                (InputKind::MouseDown, InputKind::MouseMove, InputKind::MouseUp)
            };
            wanted.push((ListenTarget::Track(Axis::Vertical), down));
            wanted.push((ListenTarget::Track(Axis::Horizontal), down));
            wanted.push((ListenTarget::Document, moved));
            wanted.push((ListenTarget::Document, up));
        }

        for (target, kind) in wanted {
            let listener = instance.surface.listen(target, kind);
            instance.subscriptions.push(Subscription {
                target,
                kind,
                id: listener,
            });
        }
        trace!(?id, listeners = instance.subscriptions.len(), "listeners bound");
    }

    /// Release every listener, then bind again from the current settings
    pub(crate) fn rebind(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        for subscription in instance.subscriptions.take_all() {
            instance.surface.unlisten(subscription.id);
        }
        instance.horizontal.drag_end();
        instance.vertical.drag_end();
        self.bind(id);
    }

    fn on_scroll(&mut self, id: InstanceId) {
        let now = self.clock.now();
        let interval = self.global.scroll_min_update_interval;
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        let admitted = instance.pipeline.throttle.admit(
            now,
            interval,
            &mut self.scheduler,
            Task::ThrottledScroll(id),
        );
        if admitted {
            self.scroll_update(id);
        }
    }

    pub(crate) fn throttled_scroll(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        instance.pipeline.throttle.fire_trailing();
        self.scroll_update(id);
    }

    fn scroll_update(&mut self, id: InstanceId) {
        let now = self.clock.now();
        let touch = self.env.touch;
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.destroyed || instance.suppress_events {
            return;
        }

        if !self.paused {
            instance.emit(NotificationKind::ScrollStart);
        }
        self.paused = true;
        instance.pipeline.transition(PhaseEvent::Scroll);

        instance.update_axes(touch);

        if let Some(timer) = instance.pipeline.stop_timer.take() {
            self.scheduler.cancel(timer);
        }
        let deadline = now + instance.settings.scroll_stop_delay;
        instance.pipeline.stop_timer = Some(self.scheduler.schedule(deadline, Task::ScrollStop(id)));
    }

    pub(crate) fn scroll_stop(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        instance.pipeline.stop_timer = None;
        if instance.destroyed {
            return;
        }

        instance.emit(NotificationKind::ScrollStop);
        instance.pipeline.transition(PhaseEvent::Settled);
        self.paused = false;
    }

    fn on_touch_start(&mut self, id: InstanceId) {
        let touch = self.env.touch;
        self.paused = false;
        self.measure(id);

        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.destroyed {
            return;
        }
        instance.update_axes(touch);
        if instance.settings.prevent_parent_scroll {
            instance.nudge_off_edges();
        }
    }

    fn on_touch_end(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if let Some(timer) = instance.pipeline.stop_timer.take() {
            self.scheduler.cancel(timer);
        }
    }

    fn on_wheel(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.settings.prevent_parent_scroll {
            instance.nudge_off_edges();
        }
    }

    fn on_drag_start(&mut self, id: InstanceId, axis: Axis, point: Option<Point>) -> InputOutcome {
        let Some(instance) = self.instances.get_mut(id) else {
            return InputOutcome::Ignored;
        };
        let Some(point) = point else {
            return InputOutcome::Handled;
        };

        let offset = instance.surface.scroll_offset(axis);
        match axis {
            Axis::Vertical => instance.vertical.drag_start(point, offset),
            Axis::Horizontal => instance.horizontal.drag_start(point, offset),
        }
        trace!(?id, ?axis, "track drag started");
        InputOutcome::Handled
    }

    fn on_drag_move(&mut self, id: InstanceId, point: Option<Point>) -> InputOutcome {
        let Some(instance) = self.instances.get_mut(id) else {
            return InputOutcome::Ignored;
        };
        let Some(point) = point else {
            return InputOutcome::Handled;
        };

        let geometry = instance.cache.geometry();
        let mut outcome = InputOutcome::Handled;
        if let Some(offset) = instance.vertical.drag_move(point, &geometry) {
            instance.surface.set_scroll_offset(Axis::Vertical, offset);
            outcome = InputOutcome::PreventDefault;
        }
        if let Some(offset) = instance.horizontal.drag_move(point, &geometry) {
            instance.surface.set_scroll_offset(Axis::Horizontal, offset);
            outcome = InputOutcome::PreventDefault;
        }
        outcome
    }

    fn on_drag_end(&mut self, id: InstanceId) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.vertical.drag_end();
            instance.horizontal.drag_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::runtime::Environment;
    use crate::testing::{manual_runtime, FakeSurface};
    use glidebar_core::{Geometry, GlobalSettings, SettingsOverrides};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn tall() -> Geometry {
        Geometry::new(1000.0, 400.0, 300.0, 300.0)
    }

    fn setup(
        env: Environment,
        overrides: SettingsOverrides,
    ) -> (Runtime<FakeSurface, ManualClock>, ManualClock, FakeSurface, InstanceId) {
        let (mut rt, clock) = manual_runtime(GlobalSettings::default(), env, Instant::now());
        let surface = FakeSurface::new(tall());
        let id = rt.create(surface.clone(), &overrides).unwrap();
        surface.take_notifications();
        (rt, clock, surface, id)
    }

    fn scroll(rt: &mut Runtime<FakeSurface, ManualClock>, id: InstanceId) -> InputOutcome {
        rt.handle_input(id, ListenTarget::ScrollElement, InputEvent::new(InputKind::Scroll))
            .unwrap()
    }

    #[test]
    fn test_scroll_phase_transitions() {
        let idle = ScrollPhase::Idle;
        assert_eq!(idle.on_event(PhaseEvent::Scroll), Some(ScrollPhase::Scrolling));
        assert_eq!(idle.on_event(PhaseEvent::Settled), None);

        let scrolling = ScrollPhase::Scrolling;
        assert_eq!(scrolling.on_event(PhaseEvent::Scroll), None);
        assert_eq!(scrolling.on_event(PhaseEvent::Settled), Some(ScrollPhase::Idle));
    }

    #[test]
    fn test_throttle_leading_and_trailing() {
        let t0 = Instant::now();
        let interval = ms(25);
        let mut scheduler = TaskScheduler::default();
        let mut throttle = Throttle::default();
        let task = Task::Poll;

        assert!(throttle.admit(t0, interval, &mut scheduler, task));
        assert!(!throttle.admit(t0 + ms(5), interval, &mut scheduler, task));
        assert_eq!(scheduler.timer_count(), 1);

        // A second call inside the interval replaces the trailing call
        assert!(!throttle.admit(t0 + ms(10), interval, &mut scheduler, task));
        assert_eq!(scheduler.timer_count(), 1);
        assert_eq!(scheduler.next_deadline(), Some(t0 + ms(35)));

        assert_eq!(scheduler.pop_due(t0 + ms(35)), Some(task));
        throttle.fire_trailing();

        // The interval restarted at the time the trailing call was made
        assert!(!throttle.admit(t0 + ms(30), interval, &mut scheduler, task));
        assert!(throttle.cancel_trailing().is_some());
        assert!(throttle.admit(t0 + ms(36), interval, &mut scheduler, task));
    }

    #[test]
    fn test_scroll_start_edge_and_stop() {
        let (mut rt, clock, surface, id) =
            setup(Environment::default(), SettingsOverrides::default());

        surface.user_scroll(Axis::Vertical, 600.0);
        assert_eq!(scroll(&mut rt, id), InputOutcome::Handled);
        assert!(rt.is_paused());

        // Same offset again: no second scrollstart, no second edge
        clock.advance(ms(30));
        scroll(&mut rt, id);

        clock.advance(ms(299));
        rt.advance();
        assert_eq!(
            surface.notifications(),
            vec![
                NotificationKind::ScrollStart,
                NotificationKind::ScrollReachEdge,
                NotificationKind::ScrollReachBottom,
            ]
        );

        clock.advance(ms(1));
        rt.advance();
        assert_eq!(
            surface.notifications().last(),
            Some(&NotificationKind::ScrollStop)
        );
        assert!(!rt.is_paused());
    }

    #[test]
    fn test_edge_fires_again_after_leaving() {
        let (mut rt, clock, surface, id) =
            setup(Environment::default(), SettingsOverrides::default());

        surface.user_scroll(Axis::Vertical, 300.0);
        scroll(&mut rt, id);
        clock.advance(ms(30));
        surface.user_scroll(Axis::Vertical, 0.0);
        scroll(&mut rt, id);
        clock.advance(ms(30));
        scroll(&mut rt, id);

        let edges: Vec<_> = surface
            .notifications()
            .into_iter()
            .filter(|kind| *kind == NotificationKind::ScrollReachTop)
            .collect();
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_scroll_events_are_throttled() {
        let (mut rt, clock, surface, id) =
            setup(Environment::default(), SettingsOverrides::default());

        surface.user_scroll(Axis::Vertical, 100.0);
        scroll(&mut rt, id);
        let percent = rt.cache(id).unwrap().vertical.percent;
        assert!((percent - 100.0 / 6.0).abs() < 1e-9);

        clock.advance(ms(10));
        surface.user_scroll(Axis::Vertical, 600.0);
        scroll(&mut rt, id);
        assert!((rt.cache(id).unwrap().vertical.percent - percent).abs() < 1e-9);

        // Trailing call runs one interval after the deferred event
        clock.advance(ms(24));
        rt.advance();
        assert!((rt.cache(id).unwrap().vertical.percent - percent).abs() < 1e-9);
        clock.advance(ms(1));
        rt.advance();
        assert_eq!(rt.cache(id).unwrap().vertical.percent, 100.0);
        assert!(surface
            .notifications()
            .contains(&NotificationKind::ScrollReachBottom));
    }

    #[test]
    fn test_overflow_remeasures() {
        let (mut rt, _clock, surface, id) =
            setup(Environment::default(), SettingsOverrides::default());

        surface.set_geometry(Geometry::new(1000.0, 400.0, 900.0, 300.0));
        rt.handle_input(id, ListenTarget::ScrollElement, InputEvent::new(InputKind::Overflow))
            .unwrap();

        assert_eq!(surface.notifications()[0], NotificationKind::SizeChange);
        assert!(rt.cache(id).unwrap().horizontal.enabled);
    }

    #[test]
    fn test_unsubscribed_input_is_ignored() {
        let (mut rt, _clock, _surface, id) =
            setup(Environment::default(), SettingsOverrides::default());

        // Not a touch device, no wheel handling requested
        let outcome = rt
            .handle_input(id, ListenTarget::ScrollElement, InputEvent::new(InputKind::TouchStart))
            .unwrap();
        assert_eq!(outcome, InputOutcome::Ignored);
        let outcome = rt
            .handle_input(id, ListenTarget::ScrollElement, InputEvent::new(InputKind::Wheel))
            .unwrap();
        assert_eq!(outcome, InputOutcome::Ignored);
    }

    #[test]
    fn test_touch_start_nudges_off_edge() {
        let env = Environment {
            touch: true,
            ..Environment::default()
        };
        let (mut rt, _clock, surface, id) =
            setup(env, SettingsOverrides::default().prevent_parent_scroll(true));
        rt.handle_input(id, ListenTarget::ScrollElement, InputEvent::new(InputKind::TouchStart))
            .unwrap();

        assert_eq!(surface.offset(Axis::Vertical), 1.0);
        // Horizontal axis does not overflow and stays put
        assert_eq!(surface.offset(Axis::Horizontal), 0.0);
    }

    #[test]
    fn test_touch_end_cancels_scroll_stop() {
        let env = Environment {
            touch: true,
            ..Environment::default()
        };
        let (mut rt, clock, surface, id) = setup(env, SettingsOverrides::default());

        surface.user_scroll(Axis::Vertical, 200.0);
        scroll(&mut rt, id);
        rt.handle_input(id, ListenTarget::ScrollElement, InputEvent::new(InputKind::TouchEnd))
            .unwrap();

        clock.advance(ms(500));
        rt.advance();
        assert!(!surface
            .notifications()
            .contains(&NotificationKind::ScrollStop));
    }

    #[test]
    fn test_wheel_nudges_off_bottom() {
        let (mut rt, _clock, surface, id) = setup(
            Environment::default(),
            SettingsOverrides::default().prevent_parent_scroll(true),
        );

        surface.user_scroll(Axis::Vertical, 600.0);
        scroll(&mut rt, id);
        rt.handle_input(id, ListenTarget::ScrollElement, InputEvent::new(InputKind::Wheel))
            .unwrap();

        assert_eq!(surface.offset(Axis::Vertical), 599.0);
    }

    #[test]
    fn test_track_drag() {
        let env = Environment {
            native_scrollbar_size: 17.0,
            ..Environment::default()
        };
        let (mut rt, _clock, surface, id) = setup(env, SettingsOverrides::default());

        let down = InputEvent::at(InputKind::MouseDown, Point::new(0.0, 100.0));
        assert_eq!(
            rt.handle_input(id, ListenTarget::Track(Axis::Vertical), down)
                .unwrap(),
            InputOutcome::Handled
        );

        // 40px of pointer travel over a 400px trough is 100px of content
        let moved = InputEvent::at(InputKind::MouseMove, Point::new(0.0, 140.0));
        assert_eq!(
            rt.handle_input(id, ListenTarget::Document, moved).unwrap(),
            InputOutcome::PreventDefault
        );
        assert_eq!(surface.offset(Axis::Vertical), 100.0);

        let up = InputEvent::at(InputKind::MouseUp, Point::new(0.0, 140.0));
        rt.handle_input(id, ListenTarget::Document, up).unwrap();

        let moved = InputEvent::at(InputKind::MouseMove, Point::new(0.0, 300.0));
        assert_eq!(
            rt.handle_input(id, ListenTarget::Document, moved).unwrap(),
            InputOutcome::Handled
        );
        assert_eq!(surface.offset(Axis::Vertical), 100.0);
    }

    #[test]
    fn test_drag_listeners_follow_settings() {
        let env = Environment {
            native_scrollbar_size: 17.0,
            ..Environment::default()
        };
        let (_rt, _clock, surface, _id) =
            setup(env, SettingsOverrides::default().draggable_tracks(false));

        assert!(!surface.is_listening(ListenTarget::Track(Axis::Vertical), InputKind::MouseDown));
        assert!(!surface.is_listening(ListenTarget::Document, InputKind::MouseMove));
    }
}
