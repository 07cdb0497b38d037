//! Task scheduler
//!
//! Holds deferred work as plain task values: one-shot timers ordered by
//! deadline, and callbacks for the next animation frame. The owner decides
//! when time passes by calling [`TaskScheduler::pop_due`] and
//! [`TaskScheduler::take_frame`]; nothing here reads the clock.

use slotmap::{new_key_type, SlotMap};
use std::time::{Duration, Instant};

new_key_type! {
    pub struct TimerId;
}

/// Interval of the frame fallback when the host has no frame callback (60Hz)
pub const FALLBACK_FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// How "next animation frame" is realized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameSource {
    /// The host calls back once per rendered frame
    #[default]
    AnimationFrame,
    /// The host has no frame callback; frames become 60Hz timers
    Timer,
}

struct Timer<T> {
    deadline: Instant,
    /// Insertion order, breaks deadline ties
    seq: u64,
    task: T,
}

/// Timers and frame callbacks for one runtime
pub struct TaskScheduler<T> {
    timers: SlotMap<TimerId, Timer<T>>,
    frame_queue: Vec<T>,
    frame_source: FrameSource,
    next_seq: u64,
}

impl<T> TaskScheduler<T> {
    pub fn new(frame_source: FrameSource) -> Self {
        Self {
            timers: SlotMap::with_key(),
            frame_queue: Vec::new(),
            frame_source,
            next_seq: 0,
        }
    }

    pub fn frame_source(&self) -> FrameSource {
        self.frame_source
    }

    /// Run `task` once `deadline` has passed
    pub fn schedule(&mut self, deadline: Instant, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            deadline,
            seq,
            task,
        })
    }

    /// Cancel a pending timer, returning its task if it had not fired yet
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|timer| timer.task)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        let id = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| (timer.deadline, timer.seq))
            .map(|(id, _)| id)?;
        self.cancel(id)
    }

    /// Run `task` at the next frame boundary
    pub fn request_frame(&mut self, task: T, now: Instant) {
        match self.frame_source {
            FrameSource::AnimationFrame => self.frame_queue.push(task),
            FrameSource::Timer => {
                self.schedule(now + FALLBACK_FRAME_INTERVAL, task);
            }
        }
    }

    /// Callbacks queued for this frame; anything requested while they run
    /// lands in the next frame
    pub fn take_frame(&mut self) -> Vec<T> {
        std::mem::take(&mut self.frame_queue)
    }

    pub fn pending_frames(&self) -> usize {
        self.frame_queue.len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty() && self.frame_queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
        self.frame_queue.clear();
    }
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self::new(FrameSource::default())
    }
}
