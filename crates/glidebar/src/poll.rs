//! Poll loop
//!
//! One timer for the whole runtime re-measures every registered instance
//! every `check_frequency`, unless a scroll is in progress. The loop stops
//! by itself once the registry is empty and restarts on the next `create`.

use glidebar_core::ScrollSurface;
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::runtime::{Runtime, Task};

impl<S: ScrollSurface, C: Clock> Runtime<S, C> {
    pub(crate) fn poll_tick(&mut self) {
        self.poll_timer = None;

        if self.registry.is_empty() {
            debug!("poll loop stopped");
            return;
        }

        if !self.paused {
            trace!(instances = self.registry.len(), "poll tick");
            // Destroying only marks instances; the registry shrinks on the
            // next frame, so indices stay valid here
            let mut index = 0;
            while index < self.registry.len() {
                let id = self.registry[index];
                self.measure(id);
                index += 1;
            }
        }

        let frequency = self.global.check_frequency;
        if !frequency.is_zero() {
            let deadline = self.clock.now() + frequency;
            self.poll_timer = Some(self.scheduler.schedule(deadline, Task::Poll));
        }
    }
}
