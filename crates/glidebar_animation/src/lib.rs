//! glidebar animation
//!
//! Time-based scrolling and deferred work.
//!
//! # Features
//!
//! - **Easing**: a single ease-out-cubic curve
//! - **Duration heuristic**: distance-dependent, sub-linear
//! - **Scroll animation**: per-axis tweens with a deterministic end state
//! - **Task scheduler**: deadline-ordered timers and animation-frame
//!   callbacks, with a 60Hz timer fallback

pub mod easing;
pub mod scheduler;
pub mod scroll;

pub use easing::ease_out_cubic;
pub use scheduler::{FrameSource, TaskScheduler, TimerId, FALLBACK_FRAME_INTERVAL};
pub use scroll::{auto_duration, AnimationStep, AxisTween, ScrollAnimation};
