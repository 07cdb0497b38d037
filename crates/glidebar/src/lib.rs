//! glidebar
//!
//! Custom scrollbars layered over a native scrollable element. The engine
//! keeps the track size and position in sync with the native scroll
//! position, emits lifecycle and edge notifications, and scrolls
//! programmatically with an eased animation.
//!
//! - **Runtime**: owns every instance, the poll loop and the global pause
//!   flag; the host drives it with input, timers and frames
//! - **Pipeline**: throttled scroll handling, `scrollstart`/`scrollstop`,
//!   parent-scroll prevention, track dragging
//! - **Scrolling**: `scroll_to` and `scroll_into_view`
//!
//! All document access goes through [`ScrollSurface`]. With the `testing`
//! feature, [`testing::FakeSurface`] provides an in-memory one.
//!
//! # Example
//!
//! Driven here by the in-memory surface and a manual clock; a host passes
//! its own [`ScrollSurface`] and uses [`Runtime::new`].
//!
//! ```rust
//! # #[cfg(feature = "testing")]
//! # fn main() -> glidebar::Result<()> {
//! use glidebar::testing::{manual_runtime, FakeSurface};
//! use glidebar::{
//!     Axis, Environment, Geometry, GlobalSettings, InputEvent, InputKind, ListenTarget,
//!     NotificationKind, ScrollDestination, SettingsOverrides,
//! };
//! use std::time::{Duration, Instant};
//!
//! let (mut runtime, clock) =
//!     manual_runtime(GlobalSettings::default(), Environment::default(), Instant::now());
//! let surface = FakeSurface::new(Geometry::new(1000.0, 400.0, 300.0, 300.0));
//! let id = runtime.create(surface.clone(), &SettingsOverrides::default())?;
//!
//! // The user scrolls to the bottom; the host forwards the scroll event
//! surface.user_scroll(Axis::Vertical, 600.0);
//! runtime.handle_input(id, ListenTarget::ScrollElement, InputEvent::new(InputKind::Scroll))?;
//! assert_eq!(runtime.cache(id)?.vertical.percent, 100.0);
//!
//! clock.advance(Duration::from_millis(300));
//! runtime.advance();
//! let seen = surface.notifications();
//! assert!(seen.contains(&NotificationKind::ScrollStart));
//! assert!(seen.contains(&NotificationKind::ScrollReachBottom));
//! assert_eq!(seen.last(), Some(&NotificationKind::ScrollStop));
//!
//! // Animate back to the top, one frame at a time
//! runtime.scroll_to(id, ScrollDestination::Keep, ScrollDestination::Start, None, false)?;
//! while runtime.is_animating(id) {
//!     clock.advance(Duration::from_millis(16));
//!     runtime.frame();
//! }
//! assert_eq!(surface.offset(Axis::Vertical), 0.0);
//!
//! runtime.destroy(id)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "testing"))]
//! # fn main() {}
//! ```

mod animate;
pub mod clock;
pub mod error;
mod instance;
mod measure;
pub mod pipeline;
mod poll;
pub mod runtime;
pub mod scrolling;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use pipeline::{PhaseEvent, ScrollPhase};
pub use runtime::{Environment, InstanceId, Runtime};
pub use scrolling::ScrollDestination;

pub use glidebar_animation::{auto_duration, FrameSource};
pub use glidebar_core::{
    Axis, ConfigError, Geometry, GlobalSettings, InputEvent, InputKind, InputOutcome,
    ListenTarget, ListenerId, Margin, MetricsCache, Notification, NotificationKind, Point, Rect,
    ScrollDetail, ScrollSurface, ScrollTarget, Settings, SettingsOverrides,
};
