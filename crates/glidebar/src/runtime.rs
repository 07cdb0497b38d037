//! Runtime: the instance registry and everything shared between instances
//!
//! A `Runtime` owns every scroll instance created through it, the poll
//! loop, the global pause flag and the task scheduler. It is
//! single-threaded and run-to-completion: the host delivers input with
//! [`Runtime::handle_input`], lets time pass with [`Runtime::advance`] and
//! drives animation with [`Runtime::frame`]. All deferred work is a
//! [`Task`] value, so nothing outlives the runtime or captures an instance.

use glidebar_animation::{FrameSource, TaskScheduler, TimerId};
use glidebar_core::{GlobalSettings, ScrollSurface};
use slotmap::{new_key_type, SlotMap};
use std::time::Instant;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::instance::Instance;

new_key_type! {
    /// Handle of one scroll instance
    pub struct InstanceId;
}

/// Facts about the host that are fixed for the runtime's lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Touch-capable device
    pub touch: bool,
    /// Width of native scrollbars; 0 means overlay scrollbars
    pub native_scrollbar_size: f64,
    /// The host can hide native scrollbars even when they are overlay-style
    pub can_hide_native_scrollbars: bool,
    pub frame_source: FrameSource,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            touch: false,
            native_scrollbar_size: 0.0,
            can_hide_native_scrollbars: true,
            frame_source: FrameSource::AnimationFrame,
        }
    }
}

/// Deferred work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    /// Scroll quiet period elapsed
    ScrollStop(InstanceId),
    /// Trailing call of the scroll throttle
    ThrottledScroll(InstanceId),
    /// Poll loop tick
    Poll,
    AnimationFrame { id: InstanceId, generation: u64 },
    /// Re-enable scroll events after a programmatic scroll
    RestoreEvents { id: InstanceId, generation: u64 },
    /// Drop a destroyed instance from the registry
    Unregister(InstanceId),
}

pub struct Runtime<S: ScrollSurface, C: Clock = SystemClock> {
    pub(crate) global: GlobalSettings,
    pub(crate) env: Environment,
    pub(crate) clock: C,
    pub(crate) instances: SlotMap<InstanceId, Instance<S>>,
    /// Instances the poll loop measures, in creation order
    pub(crate) registry: Vec<InstanceId>,
    pub(crate) scheduler: TaskScheduler<Task>,
    pub(crate) poll_timer: Option<TimerId>,
    /// Set while any scroll or programmatic scroll is in progress; the poll
    /// loop skips measuring and `scrollstart` is not repeated
    pub(crate) paused: bool,
}

impl<S: ScrollSurface> Runtime<S, SystemClock> {
    pub fn new(global: GlobalSettings, env: Environment) -> Self {
        Self::init(global, env, SystemClock)
    }
}

impl<S: ScrollSurface, C: Clock> Runtime<S, C> {
    pub fn init(global: GlobalSettings, env: Environment, clock: C) -> Self {
        debug!(?env, "glidebar runtime initialized");
        Self {
            global,
            env,
            clock,
            instances: SlotMap::with_key(),
            registry: Vec::new(),
            scheduler: TaskScheduler::new(env.frame_source),
            poll_timer: None,
            paused: false,
        }
    }

    /// Destroy every instance and drop all pending work
    pub fn shutdown(&mut self) {
        let ids: Vec<InstanceId> = self.instances.keys().collect();
        for id in ids {
            self.destroy_instance(id);
        }
        self.scheduler.clear();
        self.instances.clear();
        self.registry.clear();
        self.poll_timer = None;
        self.paused = false;
        debug!("glidebar runtime shut down");
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn global_settings(&self) -> &GlobalSettings {
        &self.global
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The poll loop has a tick scheduled
    pub fn is_polling(&self) -> bool {
        self.poll_timer.is_some()
    }

    /// Instances the poll loop visits
    pub fn registered(&self) -> &[InstanceId] {
        &self.registry
    }

    /// Live or not-yet-removed instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    /// Deadline of the next timer, for hosts that sleep between ticks
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// A frame callback is waiting
    pub fn wants_frame(&self) -> bool {
        self.scheduler.pending_frames() > 0
    }

    /// Run every timer that is due
    pub fn advance(&mut self) {
        let now = self.clock.now();
        while let Some(task) = self.scheduler.pop_due(now) {
            self.run_task(task);
        }
    }

    /// Run due timers, then the callbacks queued for this frame
    pub fn frame(&mut self) {
        self.advance();
        for task in self.scheduler.take_frame() {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::ScrollStop(id) => self.scroll_stop(id),
            Task::ThrottledScroll(id) => self.throttled_scroll(id),
            Task::Poll => self.poll_tick(),
            Task::AnimationFrame { id, generation } => self.animation_frame(id, generation),
            Task::RestoreEvents { id, generation } => self.restore_events(id, generation),
            Task::Unregister(id) => self.unregister(id),
        }
    }

    fn unregister(&mut self, id: InstanceId) {
        self.registry.retain(|registered| *registered != id);
        if self.instances.remove(id).is_some() {
            debug!(?id, "scroll instance removed");
        }
    }

    /// Clear the pause flag once nothing is scrolling, animating or
    /// suppressed
    pub(crate) fn release_pause_if_settled(&mut self) {
        let settled = self.instances.values().all(Instance::is_settled);
        if settled {
            self.paused = false;
        }
    }
}

impl<S: ScrollSurface, C: Clock> Drop for Runtime<S, C> {
    fn drop(&mut self) {
        if !self.instances.is_empty() {
            self.shutdown();
        }
    }
}
