//! Geometry primitives
//!
//! Plain values read from (or written to) the host's scrollable element.
//! All sizes are CSS pixels as reported by the host, kept in `f64` so
//! fractional device-pixel offsets survive untouched.

use serde::{Deserialize, Serialize};

/// One of the two scroll axes of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// Short name used in generated class names (`v`, `h`)
    pub fn short_name(&self) -> &'static str {
        match self {
            Axis::Vertical => "v",
            Axis::Horizontal => "h",
        }
    }
}

/// Raw scroll metrics of the scrollable element
///
/// The host guarantees `scroll_* >= client_*` for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub scroll_height: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub client_width: f64,
}

impl Geometry {
    pub fn new(scroll_height: f64, client_height: f64, scroll_width: f64, client_width: f64) -> Self {
        Self {
            scroll_height,
            client_height,
            scroll_width,
            client_width,
        }
    }

    /// Largest valid `scrollTop`
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Largest valid `scrollLeft`
    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    /// Largest valid offset along `axis`
    pub fn max_offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.max_scroll_top(),
            Axis::Horizontal => self.max_scroll_left(),
        }
    }

    /// True when the element reports no content at all (typical of a
    /// detached node)
    pub fn is_collapsed(&self) -> bool {
        self.scroll_height == 0.0 && self.client_height == 0.0
    }
}

/// Pointer position in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle in viewport coordinates, as returned by a bounding-rect query
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Extra room kept around a target scrolled into view
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same margin on all four sides
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

impl From<f64> for Margin {
    fn from(value: f64) -> Self {
        Margin::uniform(value)
    }
}
