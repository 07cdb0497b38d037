//! Integration tests for axis tracking + notifications + settings
//!
//! These tests drive the axis controllers the way the engine does: measure
//! into a metrics cache, update both axes for a scroll offset, and turn
//! reached edges into notifications.

use glidebar_core::{
    Axis, Edge, Geometry, HorizontalController, InputKind, ListenTarget, ListenerId,
    MetricsCache, Notification, NotificationDispatcher, NotificationKind, Point, Rect,
    ScrollSurface, Settings, SettingsOverrides, UpdateContext, VerticalController,
};
use std::sync::{Arc, Mutex};

/// Surface that only remembers the offsets and track writes
#[derive(Default)]
struct Recorder {
    top: f64,
    left: f64,
    track_positions: Vec<(Axis, f64)>,
    enabled: Vec<(Axis, bool)>,
}

impl ScrollSurface for Recorder {
    type Element = ();

    fn geometry(&self) -> Geometry {
        Geometry::default()
    }
    fn scroll_offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.top,
            Axis::Horizontal => self.left,
        }
    }
    fn set_scroll_offset(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Vertical => self.top = value,
            Axis::Horizontal => self.left = value,
        }
    }
    fn is_attached(&self) -> bool {
        true
    }
    fn viewport_rect(&self) -> Rect {
        Rect::default()
    }
    fn element_rect(&self, _element: &()) -> Rect {
        Rect::default()
    }
    fn query_selector(&self, _selector: &str) -> Option<()> {
        None
    }
    fn listen(&mut self, _target: ListenTarget, _kind: InputKind) -> ListenerId {
        ListenerId(0)
    }
    fn unlisten(&mut self, _id: ListenerId) {}
    fn dispatch(&mut self, _notification: &Notification) {}

    fn set_track_enabled(&mut self, axis: Axis, enabled: bool) {
        self.enabled.push((axis, enabled));
    }
    fn set_track_position(&mut self, axis: Axis, percent: f64, _animate: bool) {
        self.track_positions.push((axis, percent));
    }
}

struct Harness {
    cache: MetricsCache,
    vertical: VerticalController,
    horizontal: HorizontalController,
    ctx: UpdateContext,
    surface: Recorder,
    dispatcher: NotificationDispatcher,
}

impl Harness {
    fn new(geometry: Geometry, settings: &Settings) -> Self {
        let mut cache = MetricsCache::new();
        cache.replace_geometry(geometry);
        Self {
            cache,
            vertical: VerticalController::new(),
            horizontal: HorizontalController::new(),
            ctx: UpdateContext {
                limits: settings.track_limits(),
                has_track: true,
                touch: false,
            },
            surface: Recorder::default(),
            dispatcher: NotificationDispatcher::new(),
        }
    }

    fn scroll(&mut self, top: f64, left: f64) {
        self.surface.top = top;
        self.surface.left = left;

        if let Some(edge) = self
            .vertical
            .update(&mut self.cache, top, &self.ctx, &mut self.surface)
        {
            let kind = match edge {
                Edge::Start => NotificationKind::ScrollReachTop,
                Edge::End => NotificationKind::ScrollReachBottom,
            };
            self.dispatcher.dispatch(&Notification::new(kind, &self.cache));
        }
        if let Some(edge) = self
            .horizontal
            .update(&mut self.cache, left, &self.ctx, &mut self.surface)
        {
            let kind = match edge {
                Edge::Start => NotificationKind::ScrollReachLeft,
                Edge::End => NotificationKind::ScrollReachRight,
            };
            self.dispatcher.dispatch(&Notification::new(kind, &self.cache));
        }
    }
}

fn collect(dispatcher: &mut NotificationDispatcher) -> Arc<Mutex<Vec<(&'static str, f64)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for kind in [
        NotificationKind::ScrollReachTop,
        NotificationKind::ScrollReachBottom,
        NotificationKind::ScrollReachLeft,
        NotificationKind::ScrollReachRight,
    ] {
        let seen = Arc::clone(&seen);
        dispatcher.register(kind, move |n| {
            seen.lock().unwrap().push((n.name(), n.detail.scroll_top));
        });
    }
    seen
}

#[test]
fn test_scrolling_down_fires_each_edge_once() {
    let mut h = Harness::new(Geometry::new(1000.0, 400.0, 300.0, 300.0), &Settings::default());
    let seen = collect(&mut h.dispatcher);

    h.scroll(0.0, 0.0);
    h.scroll(300.0, 0.0);
    h.scroll(600.0, 0.0);
    h.scroll(600.0, 0.0);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, "scrollreachtop");
    assert_eq!(seen[1].0, "scrollreachbottom");
    assert!((seen[1].1 - 600.0).abs() < 1e-9);

    // The horizontal axis never overflowed
    assert_eq!(h.surface.enabled, vec![(Axis::Vertical, true)]);
    assert!(!h.cache.horizontal.enabled);
}

#[test]
fn test_both_axes_track_independently() {
    let mut h = Harness::new(Geometry::new(800.0, 400.0, 900.0, 300.0), &Settings::default());
    let seen = collect(&mut h.dispatcher);

    h.scroll(0.0, 0.0);
    h.scroll(200.0, 600.0);

    assert_eq!(h.cache.vertical.percent, 50.0);
    assert_eq!(h.cache.horizontal.percent, 100.0);

    let names: Vec<_> = seen.lock().unwrap().iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec!["scrollreachtop", "scrollreachleft", "scrollreachright"]
    );
    assert!(h
        .surface
        .track_positions
        .iter()
        .any(|(axis, _)| *axis == Axis::Horizontal));
}

#[test]
fn test_settings_limit_track_size() {
    let settings = Settings::default().merged(&SettingsOverrides::default().track_sizes(20.0, 60.0));
    settings.validate().unwrap();

    // Short content would want a 0.8 track, huge content a 0.01 one
    let mut short = Harness::new(Geometry::new(500.0, 400.0, 0.0, 0.0), &settings);
    short.scroll(0.0, 0.0);
    assert_eq!(short.cache.vertical.size, 0.6);

    let mut long = Harness::new(Geometry::new(40_000.0, 400.0, 0.0, 0.0), &settings);
    long.scroll(0.0, 0.0);
    assert_eq!(long.cache.vertical.size, 0.2);
}

#[test]
fn test_drag_maps_pointer_to_scroll_offset() {
    let geometry = Geometry::new(1000.0, 400.0, 300.0, 300.0);
    let mut h = Harness::new(geometry, &Settings::default());
    h.scroll(100.0, 0.0);

    h.vertical.drag_start(Point::new(5.0, 100.0), h.surface.top);
    let offset = h.vertical.drag_move(Point::new(5.0, 140.0), &geometry).unwrap();
    assert_eq!(offset, 200.0);

    h.scroll(offset, 0.0);
    assert!(h.vertical.drag_end());
    assert!(!h.vertical.is_dragging());
    assert_eq!(h.cache.vertical.percent, 200.0 / 6.0);
}
