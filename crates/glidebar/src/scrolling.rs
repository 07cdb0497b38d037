//! Programmatic scroll API: `scroll_to` and `scroll_into_view`

use glidebar_animation::AxisTween;
use glidebar_core::{Axis, Margin, ScrollSurface, ScrollTarget};
use std::str::FromStr;
use std::time::Duration;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::runtime::{InstanceId, Runtime};

/// Where one axis should end up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScrollDestination {
    /// Absolute offset in pixels
    Offset(f64),
    /// Top or left edge
    Start,
    /// Bottom or right edge
    End,
    /// Leave the axis where it is
    #[default]
    Keep,
}

impl ScrollDestination {
    /// Target offset given the current offset and the scroll range.
    ///
    /// Literal offsets are clamped to `0..=max`; a non-finite one keeps the
    /// current offset.
    pub fn resolve(&self, current: f64, max: f64) -> f64 {
        match self {
            ScrollDestination::Offset(offset) if offset.is_finite() => {
                offset.clamp(0.0, max.max(0.0))
            }
            ScrollDestination::Offset(_) => current,
            ScrollDestination::Start => 0.0,
            ScrollDestination::End => max,
            ScrollDestination::Keep => current,
        }
    }
}

impl From<f64> for ScrollDestination {
    fn from(offset: f64) -> Self {
        ScrollDestination::Offset(offset)
    }
}

impl FromStr for ScrollDestination {
    type Err = Error;

    /// Accepts `top`/`left`/`start`, `bottom`/`right`/`end`, `keep`/`false`
    /// and pixel offsets
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "start" | "top" | "left" => Ok(ScrollDestination::Start),
            "end" | "bottom" | "right" => Ok(ScrollDestination::End),
            "keep" | "false" => Ok(ScrollDestination::Keep),
            other => other
                .trim_end_matches("px")
                .parse::<f64>()
                .ok()
                .filter(|offset| offset.is_finite())
                .map(ScrollDestination::Offset)
                .ok_or_else(|| Error::InvalidDestination(s.to_string())),
        }
    }
}

impl<S: ScrollSurface, C: Clock> Runtime<S, C> {
    /// Scroll to a destination on each axis.
    ///
    /// Without a duration one is derived from the distance; a zero duration
    /// jumps synchronously. With `suppress_events` set, the scroll events
    /// the animation causes do not emit `scrollstart`/`scrollstop`.
    pub fn scroll_to(
        &mut self,
        id: InstanceId,
        x: ScrollDestination,
        y: ScrollDestination,
        duration: Option<Duration>,
        suppress_events: bool,
    ) -> Result<()> {
        if self.instance_mut(id)?.destroyed {
            return Ok(());
        }

        // Programmatic scrolls never emit scrollstart
        self.paused = true;
        self.measure(id);

        let instance = self.instance_mut(id)?;
        if instance.destroyed {
            self.release_pause_if_settled();
            return Ok(());
        }

        let geometry = instance.cache.geometry();
        let start_x = instance.surface.scroll_offset(Axis::Horizontal);
        let start_y = instance.surface.scroll_offset(Axis::Vertical);
        let end_x = x.resolve(start_x, geometry.max_scroll_left());
        let end_y = y.resolve(start_y, geometry.max_scroll_top());

        instance.suppress_events = suppress_events;
        self.animate(
            id,
            AxisTween::new(start_x, end_x),
            AxisTween::new(start_y, end_y),
            duration,
        );
        Ok(())
    }

    /// Scroll the least amount that brings `target` fully into view, with
    /// `margin` of extra room. When the target is larger than the viewport
    /// its bottom/right edge wins.
    pub fn scroll_into_view(
        &mut self,
        id: InstanceId,
        target: ScrollTarget<'_, S::Element>,
        duration: Option<Duration>,
        margin: Margin,
    ) -> Result<()> {
        let instance = self.instance_mut(id)?;
        if instance.destroyed {
            return Ok(());
        }

        let element = instance
            .surface
            .target_rect(target)
            .ok_or_else(|| match target {
                ScrollTarget::Selector(selector) => Error::TargetNotFound(selector.to_string()),
                ScrollTarget::Element(_) => Error::TargetNotFound("element".to_string()),
            })?;

        self.paused = true;
        self.measure(id);

        let instance = self.instance_mut(id)?;
        if instance.destroyed {
            self.release_pause_if_settled();
            return Ok(());
        }

        let geometry = instance.cache.geometry();
        let viewport = instance.surface.viewport_rect();
        let start_x = instance.surface.scroll_offset(Axis::Horizontal);
        let start_y = instance.surface.scroll_offset(Axis::Vertical);

        let left_edge = start_x + element.left - viewport.left - margin.left;
        let top_edge = start_y + element.top - viewport.top - margin.top;
        let right_edge = start_x + element.left - viewport.left + element.width
            - geometry.client_width
            + margin.right;
        let bottom_edge = start_y + element.top - viewport.top + element.height
            - geometry.client_height
            + margin.bottom;

        let end_x = reveal(start_x, left_edge, right_edge);
        let end_y = reveal(start_y, top_edge, bottom_edge);

        self.animate(
            id,
            AxisTween::new(start_x, end_x),
            AxisTween::new(start_y, end_y),
            duration,
        );
        Ok(())
    }
}

/// Offset that reveals the span between the two edge offsets
fn reveal(start: f64, near: f64, far: f64) -> f64 {
    let mut end = start;
    if near < start {
        end = near;
    }
    if far > start {
        end = far;
    }
    end
}
