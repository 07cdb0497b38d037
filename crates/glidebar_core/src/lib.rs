//! glidebar core
//!
//! Data and per-axis math for custom scrollbars layered over a native
//! scrollable element:
//!
//! - **Geometry**: scroll/client sizes, rects, margins
//! - **Metrics Cache**: the last measurement pass and both axis states
//! - **Axis Controller**: track size/position, edge detection, drag math,
//!   generic over a vertical or horizontal axis descriptor
//! - **Notifications**: `sizechange`, `scrollstart`, `scrollstop` and the
//!   edge events, with their dispatcher
//! - **Surface**: the host collaborator every DOM access goes through
//!
//! # Example
//!
//! ```rust
//! use glidebar_core::axis::VerticalController;
//! use glidebar_core::{Geometry, Settings};
//!
//! let geometry = Geometry::new(1000.0, 400.0, 300.0, 300.0);
//! let metrics = VerticalController::compute(&geometry, 300.0, Settings::default().track_limits());
//!
//! assert_eq!(metrics.percent, 50.0);
//! assert_eq!(metrics.size, 0.4);
//! ```

pub mod axis;
pub mod events;
pub mod geometry;
pub mod input;
pub mod metrics;
pub mod settings;
pub mod surface;

pub use axis::{
    AxisController, AxisDescriptor, AxisState, Edge, Horizontal, HorizontalController,
    TrackMetrics, UpdateContext, Vertical, VerticalController,
};
pub use events::{Notification, NotificationDispatcher, NotificationKind, ScrollDetail};
pub use geometry::{Axis, Geometry, Margin, Point, Rect};
pub use input::{
    InputEvent, InputKind, InputOutcome, ListenTarget, ListenerId, Subscription, Subscriptions,
};
pub use metrics::MetricsCache;
pub use settings::{ConfigError, GlobalSettings, Settings, SettingsOverrides, TrackLimits};
pub use surface::{ScrollSurface, ScrollTarget};
