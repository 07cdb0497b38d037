//! Host collaborator interface
//!
//! Everything that touches the real document goes through [`ScrollSurface`]:
//! reading and writing scroll geometry, listener registration, scrollbar
//! element management and custom event delivery. The engine stays pure
//! logic; a browser binding, a native toolkit adapter or a test fake
//! implements this trait.

use crate::events::Notification;
use crate::geometry::{Axis, Geometry, Rect};
use crate::input::{InputKind, ListenTarget, ListenerId};

/// Element to bring into view
#[derive(Debug)]
pub enum ScrollTarget<'a, E> {
    Element(&'a E),
    /// Selector resolved inside the scrollable element
    Selector(&'a str),
}

impl<E> Clone for ScrollTarget<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ScrollTarget<'_, E> {}

/// A container element whose first child is the scrollable region
pub trait ScrollSurface {
    /// Host element handle used by `scroll_into_view`
    type Element;

    /// Current `scrollHeight`/`clientHeight`/`scrollWidth`/`clientWidth`
    fn geometry(&self) -> Geometry;

    fn scroll_offset(&self, axis: Axis) -> f64;

    /// Write `scrollTop`/`scrollLeft`; the host clamps to its scroll range
    fn set_scroll_offset(&mut self, axis: Axis, value: f64);

    /// Whether the container is still part of the document
    fn is_attached(&self) -> bool;

    /// Bounding rect of the scrollable element
    fn viewport_rect(&self) -> Rect;

    fn element_rect(&self, element: &Self::Element) -> Rect;

    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    fn listen(&mut self, target: ListenTarget, kind: InputKind) -> ListenerId;

    fn unlisten(&mut self, id: ListenerId);

    /// Deliver a notification as a custom event on the container
    fn dispatch(&mut self, notification: &Notification);

    /// Append the scrollbar and track elements for `axis`
    fn create_scrollbar(&mut self, _axis: Axis, _class_prefix: &str) {}

    fn remove_scrollbar(&mut self, _axis: Axis) {}

    /// Toggle the `<axis>track-on` class and the track transition
    fn set_track_enabled(&mut self, _axis: Axis, _enabled: bool) {}

    /// Track length as a ratio of the trough
    fn set_track_size(&mut self, _axis: Axis, _ratio: f64) {}

    /// Track translation in percent of its own length
    fn set_track_position(&mut self, _axis: Axis, _percent: f64, _animate: bool) {}

    /// Hide native scrollbars without shifting layout
    fn hide_native_scrollbars(&mut self, _native_size: f64) {}

    /// Drop every inline style and attribute the engine added
    fn restore_style(&mut self) {}

    fn set_container_class(&mut self, _class: &str, _on: bool) {}

    /// Resolve a target to its bounding rect
    fn target_rect(&self, target: ScrollTarget<'_, Self::Element>) -> Option<Rect> {
        match target {
            ScrollTarget::Element(element) => Some(self.element_rect(element)),
            ScrollTarget::Selector(selector) => self
                .query_selector(selector)
                .map(|element| self.element_rect(&element)),
        }
    }
}
