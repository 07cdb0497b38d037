//! Axis scrollbar controller
//!
//! One generic controller drives both scrollbars. The axis descriptor picks
//! which half of the geometry applies (height or width, `scrollTop` or
//! `scrollLeft`) and which edge notifications belong to the axis, so the
//! vertical and horizontal controllers are separate monomorphized types.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use crate::events::NotificationKind;
use crate::geometry::{Axis, Geometry, Point};
use crate::metrics::MetricsCache;
use crate::settings::TrackLimits;
use crate::surface::ScrollSurface;

/// Scrollbar state of one axis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisState {
    /// A scrollbar is needed (content overflows on this axis)
    pub enabled: bool,
    /// Track offset as a fraction of the trough
    pub position: f64,
    /// Track length as a fraction of the trough; exactly 1 when disabled
    pub size: f64,
    /// Scroll progress, snapped to 0 / 100 near the edges
    pub percent: f64,
    /// Percent seen by the last edge check
    #[serde(skip)]
    pub last_edge_percent: Option<f64>,
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            enabled: false,
            position: 0.0,
            size: 1.0,
            percent: 0.0,
            last_edge_percent: None,
        }
    }
}

impl AxisState {
    /// Sitting exactly on the first or last scroll position
    pub fn at_edge(&self) -> Option<Edge> {
        if self.percent == 0.0 {
            Some(Edge::Start)
        } else if self.percent == 100.0 {
            Some(Edge::End)
        } else {
            None
        }
    }
}

/// Result of [`AxisController::compute`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackMetrics {
    pub position: f64,
    pub size: f64,
    pub percent: f64,
}

impl TrackMetrics {
    /// No scrollbar needed
    pub const DISABLED: TrackMetrics = TrackMetrics {
        position: 0.0,
        size: 1.0,
        percent: 0.0,
    };
}

/// Scroll extreme of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Top or left
    Start,
    /// Bottom or right
    End,
}

/// Compile-time selection of one scroll axis
pub trait AxisDescriptor: Copy + Default + fmt::Debug + Send + Sync + 'static {
    const AXIS: Axis;
    /// Fired on reaching the top/left edge
    const REACH_START: NotificationKind;
    /// Fired on reaching the bottom/right edge
    const REACH_END: NotificationKind;

    fn view_size(geometry: &Geometry) -> f64;
    fn total_size(geometry: &Geometry) -> f64;
    fn pointer_coord(point: &Point) -> f64;
    fn state(cache: &MetricsCache) -> &AxisState;
    fn state_mut(cache: &mut MetricsCache) -> &mut AxisState;

    fn edge_kind(edge: Edge) -> NotificationKind {
        match edge {
            Edge::Start => Self::REACH_START,
            Edge::End => Self::REACH_END,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vertical;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Horizontal;

impl AxisDescriptor for Vertical {
    const AXIS: Axis = Axis::Vertical;
    const REACH_START: NotificationKind = NotificationKind::ScrollReachTop;
    const REACH_END: NotificationKind = NotificationKind::ScrollReachBottom;

    fn view_size(geometry: &Geometry) -> f64 {
        geometry.client_height
    }

    fn total_size(geometry: &Geometry) -> f64 {
        geometry.scroll_height
    }

    fn pointer_coord(point: &Point) -> f64 {
        point.y
    }

    fn state(cache: &MetricsCache) -> &AxisState {
        &cache.vertical
    }

    fn state_mut(cache: &mut MetricsCache) -> &mut AxisState {
        &mut cache.vertical
    }
}

impl AxisDescriptor for Horizontal {
    const AXIS: Axis = Axis::Horizontal;
    const REACH_START: NotificationKind = NotificationKind::ScrollReachLeft;
    const REACH_END: NotificationKind = NotificationKind::ScrollReachRight;

    fn view_size(geometry: &Geometry) -> f64 {
        geometry.client_width
    }

    fn total_size(geometry: &Geometry) -> f64 {
        geometry.scroll_width
    }

    fn pointer_coord(point: &Point) -> f64 {
        point.x
    }

    fn state(cache: &MetricsCache) -> &AxisState {
        &cache.horizontal
    }

    fn state_mut(cache: &mut MetricsCache) -> &mut AxisState {
        &mut cache.horizontal
    }
}

/// Per-update inputs that do not belong to the axis itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateContext {
    pub limits: TrackLimits,
    /// Scrollbar elements exist for this instance
    pub has_track: bool,
    /// Touch environment: large track jumps are animated
    pub touch: bool,
}

/// Distance (px) above which track moves animate on touch devices
const TRACK_ANIMATION_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    pointer: f64,
    scroll: f64,
}

/// Controller of one scrollbar
#[derive(Debug)]
pub struct AxisController<A: AxisDescriptor> {
    drag: Option<DragOrigin>,
    _axis: PhantomData<A>,
}

pub type VerticalController = AxisController<Vertical>;
pub type HorizontalController = AxisController<Horizontal>;

impl<A: AxisDescriptor> Default for AxisController<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AxisDescriptor> AxisController<A> {
    pub fn new() -> Self {
        Self {
            drag: None,
            _axis: PhantomData,
        }
    }

    pub fn axis(&self) -> Axis {
        A::AXIS
    }

    /// Track metrics for a raw scroll offset
    pub fn compute(geometry: &Geometry, offset: f64, limits: TrackLimits) -> TrackMetrics {
        let view = A::view_size(geometry);
        let total = A::total_size(geometry);

        if view == total || total == 0.0 {
            return TrackMetrics::DISABLED;
        }

        let range = total - view;
        let mut percent = 100.0 * offset / range;

        // Overscroll and subpixel noise within 1px of an edge count as the edge
        if offset <= 1.0 {
            percent = 0.0;
        }
        if offset >= range - 1.0 {
            percent = 100.0;
        }

        let size = (view / total).max(limits.min).min(limits.max);
        let position = (percent / 100.0 * range) / total;

        TrackMetrics {
            position,
            size,
            percent,
        }
    }

    /// Recompute the axis state from the cached geometry and render the
    /// track. Returns the edge reached by this update, if any.
    pub fn update<S: ScrollSurface + ?Sized>(
        &mut self,
        cache: &mut MetricsCache,
        offset: f64,
        ctx: &UpdateContext,
        surface: &mut S,
    ) -> Option<Edge> {
        let geometry = cache.geometry();
        let view = A::view_size(&geometry);
        let state = A::state_mut(cache);

        if !state.enabled && view == A::total_size(&geometry) {
            return None;
        }

        let next = Self::compute(&geometry, offset, ctx.limits);
        let moved = (next.position - state.position).abs() * view;

        if next.size == 1.0 && state.enabled {
            Self::toggle(state, false, ctx.has_track, surface);
        }
        if next.size < 1.0 && !state.enabled {
            Self::toggle(state, true, ctx.has_track, surface);
        }

        if ctx.has_track && state.enabled {
            if state.size != next.size {
                surface.set_track_size(A::AXIS, next.size);
            }
            if moved != 0.0 {
                let relative = next.position / next.size * 100.0;
                let animate = ctx.touch && moved > TRACK_ANIMATION_THRESHOLD;
                surface.set_track_position(A::AXIS, relative, animate);
            }
        }

        state.position = next.position;
        state.size = next.size;
        state.percent = next.percent;

        if state.enabled {
            Self::detect_edge(state)
        } else {
            None
        }
    }

    /// Fires only on the transition into an edge
    fn detect_edge(state: &mut AxisState) -> Option<Edge> {
        let percent = state.percent;
        let edge = match state.last_edge_percent {
            Some(previous) if previous == percent => None,
            _ => state.at_edge(),
        };
        state.last_edge_percent = Some(percent);
        edge
    }

    fn toggle<S: ScrollSurface + ?Sized>(
        state: &mut AxisState,
        enabled: bool,
        has_track: bool,
        surface: &mut S,
    ) {
        tracing::trace!(axis = ?A::AXIS, enabled, "scrollbar toggled");
        state.enabled = enabled;
        if has_track {
            surface.set_track_enabled(A::AXIS, enabled);
        }
    }

    /// Disable the axis ahead of scrollbar removal
    pub fn disable<S: ScrollSurface + ?Sized>(
        &mut self,
        cache: &mut MetricsCache,
        has_track: bool,
        surface: &mut S,
    ) {
        self.drag = None;
        Self::toggle(A::state_mut(cache), false, has_track, surface);
    }

    /// Offset that moves an enabled axis 1px off the edge it sits on, so
    /// the host does not hand the gesture to the parent
    pub fn edge_nudge(&self, cache: &MetricsCache) -> Option<f64> {
        let state = A::state(cache);
        if !state.enabled {
            return None;
        }

        let geometry = cache.geometry();
        match state.at_edge()? {
            Edge::Start => Some(1.0),
            Edge::End => Some(A::total_size(&geometry) - A::view_size(&geometry) - 1.0),
        }
    }

    pub fn drag_start(&mut self, point: Point, scroll_offset: f64) {
        self.drag = Some(DragOrigin {
            pointer: A::pointer_coord(&point),
            scroll: scroll_offset,
        });
    }

    /// Scroll offset for the current pointer position, `None` when no drag
    /// is in progress
    pub fn drag_move(&self, point: Point, geometry: &Geometry) -> Option<f64> {
        let origin = self.drag?;
        let view = A::view_size(geometry);
        if view == 0.0 {
            return None;
        }

        let delta = A::pointer_coord(&point) - origin.pointer;
        Some(origin.scroll + delta / view * A::total_size(geometry))
    }

    /// Returns true if a drag was in progress
    pub fn drag_end(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
