//! Notification dispatch
//!
//! Higher-level events an instance emits (size changes, scroll start/stop,
//! edge reached) and the dispatcher Rust code subscribes through. The host
//! receives the same notifications via `ScrollSurface::dispatch` and turns
//! them into DOM custom events named by [`NotificationKind::name`].

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::axis::AxisState;
use crate::metrics::MetricsCache;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NotificationKind {
    SizeChange,
    ScrollStart,
    ScrollStop,
    ScrollReachEdge,
    ScrollReachTop,
    ScrollReachBottom,
    ScrollReachLeft,
    ScrollReachRight,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 8] = [
        NotificationKind::SizeChange,
        NotificationKind::ScrollStart,
        NotificationKind::ScrollStop,
        NotificationKind::ScrollReachEdge,
        NotificationKind::ScrollReachTop,
        NotificationKind::ScrollReachBottom,
        NotificationKind::ScrollReachLeft,
        NotificationKind::ScrollReachRight,
    ];

    /// DOM event name
    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::SizeChange => "sizechange",
            NotificationKind::ScrollStart => "scrollstart",
            NotificationKind::ScrollStop => "scrollstop",
            NotificationKind::ScrollReachEdge => "scrollreachedge",
            NotificationKind::ScrollReachTop => "scrollreachtop",
            NotificationKind::ScrollReachBottom => "scrollreachbottom",
            NotificationKind::ScrollReachLeft => "scrollreachleft",
            NotificationKind::ScrollReachRight => "scrollreachright",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Payload carried by every notification
///
/// Edge offsets are derived from the track ratios, so they describe what
/// the scrollbars show rather than a fresh read of the element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollDetail {
    pub scrollbar_v: AxisState,
    pub scrollbar_h: AxisState,
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub scroll_bottom: f64,
    pub scroll_right: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
}

impl ScrollDetail {
    pub fn from_cache(cache: &MetricsCache) -> Self {
        let g = cache.geometry.unwrap_or_default();
        let v = &cache.vertical;
        let h = &cache.horizontal;

        Self {
            scrollbar_v: v.clone(),
            scrollbar_h: h.clone(),
            scroll_top: v.position * g.scroll_height,
            scroll_left: h.position * g.scroll_width,
            scroll_bottom: (1.0 - v.position - v.size) * g.scroll_height,
            scroll_right: (1.0 - h.position - h.size) * g.scroll_width,
            scroll_width: g.scroll_width,
            scroll_height: g.scroll_height,
            client_width: g.client_width,
            client_height: g.client_height,
        }
    }
}

/// A notification with its payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub detail: ScrollDetail,
}

impl Notification {
    pub fn new(kind: NotificationKind, cache: &MetricsCache) -> Self {
        Self {
            kind,
            detail: ScrollDetail::from_cache(cache),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Notification handler function type
pub type NotificationHandler = Box<dyn Fn(&Notification) + Send + Sync>;

/// Dispatches notifications to registered handlers
pub struct NotificationDispatcher {
    handlers: FxHashMap<NotificationKind, Vec<NotificationHandler>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register a handler for a notification kind
    pub fn register<F>(&mut self, kind: NotificationKind, handler: F)
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Dispatch a notification to all handlers registered for its kind
    pub fn dispatch(&self, notification: &Notification) {
        if let Some(handlers) = self.handlers.get(&notification.kind) {
            for handler in handlers {
                handler(notification);
            }
        }
    }

    pub fn handler_count(&self, kind: NotificationKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
