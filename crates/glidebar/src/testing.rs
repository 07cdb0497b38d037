//! In-memory scroll surface
//!
//! `FakeSurface` stands in for a DOM container in tests and in the headless
//! scenario runner. It keeps scroll offsets clamped like a browser does and
//! records every write and notification. Clones share state, so a caller
//! can keep a handle after moving the surface into a runtime.

use std::sync::Arc;
use std::time::Instant;

use glidebar_core::{
    Axis, Geometry, GlobalSettings, InputKind, ListenTarget, ListenerId, Notification,
    NotificationKind, Rect, ScrollSurface,
};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::clock::ManualClock;
use crate::runtime::{Environment, Runtime};

/// Track rendering call
#[derive(Debug, Clone, PartialEq)]
pub enum TrackWrite {
    Enabled(Axis, bool),
    Size(Axis, f64),
    Position(Axis, f64, bool),
}

/// Element inside the fake content, positioned in content coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeElement {
    pub content: Rect,
}

#[derive(Debug)]
struct FakeState {
    geometry: Geometry,
    scroll_top: f64,
    scroll_left: f64,
    attached: bool,
    viewport: Rect,
    elements: FxHashMap<String, FakeElement>,
    listeners: Vec<(ListenerId, ListenTarget, InputKind)>,
    next_listener: u64,
    notifications: Vec<Notification>,
    track_writes: Vec<TrackWrite>,
    scroll_writes: Vec<(Axis, f64)>,
    scrollbars: Vec<(Axis, String)>,
    classes: Vec<String>,
    native_hidden: Option<f64>,
    style_restored: bool,
}

impl FakeState {
    fn clamp(&self, axis: Axis, value: f64) -> f64 {
        value.clamp(0.0, self.geometry.max_offset(axis))
    }
}

#[derive(Debug, Clone)]
pub struct FakeSurface {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSurface {
    /// Attached container with its viewport at the origin
    pub fn new(geometry: Geometry) -> Self {
        let viewport = Rect::new(0.0, 0.0, geometry.client_width, geometry.client_height);
        Self {
            state: Arc::new(Mutex::new(FakeState {
                geometry,
                scroll_top: 0.0,
                scroll_left: 0.0,
                attached: true,
                viewport,
                elements: FxHashMap::default(),
                listeners: Vec::new(),
                next_listener: 1,
                notifications: Vec::new(),
                track_writes: Vec::new(),
                scroll_writes: Vec::new(),
                scrollbars: Vec::new(),
                classes: Vec::new(),
                native_hidden: None,
                style_restored: false,
            })),
        }
    }

    pub fn with_viewport(self, viewport: Rect) -> Self {
        self.state.lock().viewport = viewport;
        self
    }

    /// Content or container resized; offsets are clamped to the new range
    pub fn set_geometry(&self, geometry: Geometry) {
        let mut state = self.state.lock();
        state.geometry = geometry;
        state.scroll_top = state.clamp(Axis::Vertical, state.scroll_top);
        state.scroll_left = state.clamp(Axis::Horizontal, state.scroll_left);
    }

    /// Scroll as the user would, without recording an engine write
    pub fn user_scroll(&self, axis: Axis, value: f64) {
        let mut state = self.state.lock();
        let value = state.clamp(axis, value);
        match axis {
            Axis::Vertical => state.scroll_top = value,
            Axis::Horizontal => state.scroll_left = value,
        }
    }

    pub fn offset(&self, axis: Axis) -> f64 {
        let state = self.state.lock();
        match axis {
            Axis::Vertical => state.scroll_top,
            Axis::Horizontal => state.scroll_left,
        }
    }

    /// Detach from (or re-attach to) the fake document
    pub fn set_attached(&self, attached: bool) {
        self.state.lock().attached = attached;
    }

    /// Add an element reachable through `selector`
    pub fn add_element(&self, selector: &str, content: Rect) -> FakeElement {
        let element = FakeElement { content };
        self.state
            .lock()
            .elements
            .insert(selector.to_string(), element);
        element
    }

    /// Kinds of the notifications dispatched so far, oldest first
    pub fn notifications(&self) -> Vec<NotificationKind> {
        self.state
            .lock()
            .notifications
            .iter()
            .map(|notification| notification.kind)
            .collect()
    }

    pub fn notification_log(&self) -> Vec<Notification> {
        self.state.lock().notifications.clone()
    }

    /// Drain the notification log
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.lock().notifications)
    }

    pub fn track_writes(&self) -> Vec<TrackWrite> {
        self.state.lock().track_writes.clone()
    }

    pub fn clear_track_writes(&self) {
        self.state.lock().track_writes.clear();
    }

    /// Offsets written by the engine, after clamping
    pub fn scroll_writes(&self) -> Vec<(Axis, f64)> {
        self.state.lock().scroll_writes.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    pub fn is_listening(&self, target: ListenTarget, kind: InputKind) -> bool {
        self.state
            .lock()
            .listeners
            .iter()
            .any(|(_, t, k)| *t == target && *k == kind)
    }

    pub fn scrollbars(&self) -> Vec<Axis> {
        self.state.lock().scrollbars.iter().map(|(axis, _)| *axis).collect()
    }

    /// Class prefix the scrollbar of `axis` was created with
    pub fn scrollbar_prefix(&self, axis: Axis) -> Option<String> {
        self.state
            .lock()
            .scrollbars
            .iter()
            .find(|(a, _)| *a == axis)
            .map(|(_, prefix)| prefix.clone())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.state.lock().classes.iter().any(|c| c == class)
    }

    /// Native scrollbar size passed to `hide_native_scrollbars`
    pub fn native_hidden(&self) -> Option<f64> {
        self.state.lock().native_hidden
    }

    pub fn style_restored(&self) -> bool {
        self.state.lock().style_restored
    }
}

impl ScrollSurface for FakeSurface {
    type Element = FakeElement;

    fn geometry(&self) -> Geometry {
        self.state.lock().geometry
    }

    fn scroll_offset(&self, axis: Axis) -> f64 {
        self.offset(axis)
    }

    fn set_scroll_offset(&mut self, axis: Axis, value: f64) {
        let mut state = self.state.lock();
        let value = state.clamp(axis, value);
        match axis {
            Axis::Vertical => state.scroll_top = value,
            Axis::Horizontal => state.scroll_left = value,
        }
        state.scroll_writes.push((axis, value));
    }

    fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    fn viewport_rect(&self) -> Rect {
        self.state.lock().viewport
    }

    fn element_rect(&self, element: &FakeElement) -> Rect {
        let state = self.state.lock();
        Rect::new(
            state.viewport.left + element.content.left - state.scroll_left,
            state.viewport.top + element.content.top - state.scroll_top,
            element.content.width,
            element.content.height,
        )
    }

    fn query_selector(&self, selector: &str) -> Option<FakeElement> {
        self.state.lock().elements.get(selector).copied()
    }

    fn listen(&mut self, target: ListenTarget, kind: InputKind) -> ListenerId {
        let mut state = self.state.lock();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.push((id, target, kind));
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.state
            .lock()
            .listeners
            .retain(|(listener, _, _)| *listener != id);
    }

    fn dispatch(&mut self, notification: &Notification) {
        self.state.lock().notifications.push(notification.clone());
    }

    fn create_scrollbar(&mut self, axis: Axis, class_prefix: &str) {
        self.state
            .lock()
            .scrollbars
            .push((axis, class_prefix.to_string()));
    }

    fn remove_scrollbar(&mut self, axis: Axis) {
        self.state.lock().scrollbars.retain(|(a, _)| *a != axis);
    }

    fn set_track_enabled(&mut self, axis: Axis, enabled: bool) {
        self.state
            .lock()
            .track_writes
            .push(TrackWrite::Enabled(axis, enabled));
    }

    fn set_track_size(&mut self, axis: Axis, ratio: f64) {
        self.state
            .lock()
            .track_writes
            .push(TrackWrite::Size(axis, ratio));
    }

    fn set_track_position(&mut self, axis: Axis, percent: f64, animate: bool) {
        self.state
            .lock()
            .track_writes
            .push(TrackWrite::Position(axis, percent, animate));
    }

    fn hide_native_scrollbars(&mut self, native_size: f64) {
        self.state.lock().native_hidden = Some(native_size);
    }

    fn restore_style(&mut self) {
        let mut state = self.state.lock();
        state.native_hidden = None;
        state.style_restored = true;
    }

    fn set_container_class(&mut self, class: &str, on: bool) {
        let mut state = self.state.lock();
        state.classes.retain(|c| c != class);
        if on {
            state.classes.push(class.to_string());
        }
    }
}

/// Runtime over fake surfaces, driven by a manual clock starting at `start`
pub fn manual_runtime(
    global: GlobalSettings,
    env: Environment,
    start: Instant,
) -> (Runtime<FakeSurface, ManualClock>, ManualClock) {
    let clock = ManualClock::new(start);
    let runtime = Runtime::init(global, env, clock.clone());
    (runtime, clock)
}
