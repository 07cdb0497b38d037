//! Frame-driven programmatic scrolling

use glidebar_animation::{AnimationStep, AxisTween, ScrollAnimation};
use glidebar_core::{Axis, ScrollSurface};
use std::time::Duration;
use tracing::trace;

use crate::clock::Clock;
use crate::instance::Instance;
use crate::runtime::{InstanceId, Runtime, Task};

fn apply_step<S: ScrollSurface>(instance: &mut Instance<S>, step: &AnimationStep) {
    if let Some(y) = step.y {
        instance.surface.set_scroll_offset(Axis::Vertical, y);
    }
    if let Some(x) = step.x {
        instance.surface.set_scroll_offset(Axis::Horizontal, x);
    }
}

impl<S: ScrollSurface, C: Clock> Runtime<S, C> {
    /// Start animating toward `(x.end, y.end)`, replacing any running
    /// animation. Writes happen on frame callbacks, except for a zero
    /// duration where the end position is written synchronously.
    pub(crate) fn animate(
        &mut self,
        id: InstanceId,
        x: AxisTween,
        y: AxisTween,
        duration: Option<Duration>,
    ) {
        let now = self.clock.now();
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.destroyed {
            return;
        }

        let generation = instance.animation.supersede();
        let Some(animation) = ScrollAnimation::new(x, y, duration, now) else {
            // Nothing moves: no scroll events will follow
            instance.suppress_events = false;
            self.release_pause_if_settled();
            return;
        };

        trace!(?id, duration = ?animation.duration(), "scroll animation");
        if animation.is_immediate() {
            apply_step(instance, &animation.end_step());
            instance.animation.restoring = true;
            self.scheduler
                .request_frame(Task::RestoreEvents { id, generation }, now);
        } else {
            instance.animation.current = Some(animation);
            self.scheduler
                .request_frame(Task::AnimationFrame { id, generation }, now);
        }
    }

    pub(crate) fn animation_frame(&mut self, id: InstanceId, generation: u64) {
        let now = self.clock.now();
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.destroyed || instance.animation.generation != generation {
            return;
        }
        let Some(animation) = instance.animation.current.as_ref() else {
            return;
        };

        let step = animation.sample(now);
        apply_step(instance, &step);

        if step.finished {
            // The scroll event caused by the last write arrives before the
            // next frame; keep events suppressed until then
            instance.animation.current = None;
            instance.animation.restoring = true;
            self.scheduler
                .request_frame(Task::RestoreEvents { id, generation }, now);
        } else {
            self.scheduler
                .request_frame(Task::AnimationFrame { id, generation }, now);
        }
    }

    pub(crate) fn restore_events(&mut self, id: InstanceId, generation: u64) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if instance.destroyed || instance.animation.generation != generation {
            return;
        }
        instance.animation.restoring = false;
        instance.suppress_events = false;
        trace!(?id, "programmatic scroll finished");
        self.release_pause_if_settled();
    }

    /// A programmatic scroll is running or waiting to re-enable events
    pub fn is_animating(&self, id: InstanceId) -> bool {
        self.instances
            .get(id)
            .is_some_and(|instance| instance.animation.is_active())
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::runtime::{Environment, Runtime};
    use crate::scrolling::ScrollDestination;
    use crate::testing::{manual_runtime, FakeSurface};
    use glidebar_animation::FrameSource;
    use glidebar_core::{Axis, Geometry, GlobalSettings, SettingsOverrides};
    use std::time::{Duration, Instant};

    fn setup(env: Environment) -> (Runtime<FakeSurface, ManualClock>, ManualClock, FakeSurface) {
        let (rt, clock) = manual_runtime(GlobalSettings::default(), env, Instant::now());
        (rt, clock, FakeSurface::new(Geometry::new(2000.0, 400.0, 300.0, 300.0)))
    }

    #[test]
    fn test_new_scroll_replaces_running_animation() {
        let (mut rt, clock, surface) = setup(Environment::default());
        let id = rt.create(surface.clone(), &SettingsOverrides::default()).unwrap();

        rt.scroll_to(
            id,
            ScrollDestination::Keep,
            ScrollDestination::Offset(1600.0),
            Some(Duration::from_millis(200)),
            true,
        )
        .unwrap();
        rt.frame();
        clock.advance(Duration::from_millis(100));
        rt.frame();
        let midway = surface.offset(Axis::Vertical);
        assert!(midway > 0.0 && midway < 1600.0);

        rt.scroll_to(
            id,
            ScrollDestination::Keep,
            ScrollDestination::Start,
            Some(Duration::from_millis(100)),
            true,
        )
        .unwrap();

        // Only the new animation writes from here on
        for _ in 0..10 {
            clock.advance(Duration::from_millis(16));
            rt.frame();
        }
        assert_eq!(surface.offset(Axis::Vertical), 0.0);
        rt.frame();
        assert!(!rt.is_animating(id));
        assert!(!rt.is_paused());
    }

    #[test]
    fn test_destroy_stops_animation() {
        let (mut rt, clock, surface) = setup(Environment::default());
        let id = rt.create(surface.clone(), &SettingsOverrides::default()).unwrap();

        rt.scroll_to(
            id,
            ScrollDestination::Keep,
            ScrollDestination::End,
            Some(Duration::from_millis(200)),
            false,
        )
        .unwrap();
        rt.frame();
        clock.advance(Duration::from_millis(50));
        rt.destroy(id).unwrap();
        let writes = surface.scroll_writes().len();

        clock.advance(Duration::from_millis(50));
        rt.frame();
        assert_eq!(surface.scroll_writes().len(), writes);
        assert!(!rt.contains(id));
    }

    #[test]
    fn test_timer_frames_without_frame_callback() {
        let env = Environment {
            frame_source: FrameSource::Timer,
            ..Environment::default()
        };
        let (mut rt, clock, surface) = setup(env);
        let id = rt.create(surface.clone(), &SettingsOverrides::default()).unwrap();

        rt.scroll_to(
            id,
            ScrollDestination::Keep,
            ScrollDestination::Offset(800.0),
            None,
            true,
        )
        .unwrap();
        assert!(!rt.wants_frame());
        assert!(surface.scroll_writes().is_empty());

        clock.advance(Duration::from_millis(17));
        rt.advance();
        assert_eq!(surface.scroll_writes().len(), 1);

        clock.advance(Duration::from_secs(1));
        for _ in 0..4 {
            clock.advance(Duration::from_millis(17));
            rt.advance();
        }
        assert_eq!(surface.offset(Axis::Vertical), 800.0);
        assert!(!rt.is_animating(id));
        assert!(!rt.is_paused());
    }
}
