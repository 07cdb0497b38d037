//! Raw host input and listener subscriptions
//!
//! The engine never registers closures with the host. Binding asks the
//! surface for one listener per `(target, kind)` pair and keeps the returned
//! handles in [`Subscriptions`]; tearing down releases exactly that list.

use smallvec::SmallVec;

use crate::geometry::{Axis, Point};

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    /// The scrollable element (first child of the container)
    ScrollElement,
    /// The track of one custom scrollbar
    Track(Axis),
    /// The whole document, so drags survive leaving the track
    Document,
}

/// Raw event kind delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Scroll,
    /// Non-standard overflow notifications (`overflow`, `underflow`,
    /// `overflowchanged`)
    Overflow,
    Underflow,
    OverflowChanged,
    TouchStart,
    TouchMove,
    TouchEnd,
    MouseDown,
    MouseMove,
    MouseUp,
    Wheel,
    MouseWheel,
}

impl InputKind {
    /// DOM event type
    pub fn dom_name(&self) -> &'static str {
        match self {
            InputKind::Scroll => "scroll",
            InputKind::Overflow => "overflow",
            InputKind::Underflow => "underflow",
            InputKind::OverflowChanged => "overflowchanged",
            InputKind::TouchStart => "touchstart",
            InputKind::TouchMove => "touchmove",
            InputKind::TouchEnd => "touchend",
            InputKind::MouseDown => "mousedown",
            InputKind::MouseMove => "mousemove",
            InputKind::MouseUp => "mouseup",
            InputKind::Wheel => "wheel",
            InputKind::MouseWheel => "mousewheel",
        }
    }
}

/// One raw event, with the pointer position (first touch for touch events)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub point: Option<Point>,
}

impl InputEvent {
    pub fn new(kind: InputKind) -> Self {
        Self { kind, point: None }
    }

    pub fn at(kind: InputKind, point: Point) -> Self {
        Self {
            kind,
            point: Some(point),
        }
    }
}

/// What the host should do with the event after the engine handled it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// No live subscription for this event; nothing happened
    Ignored,
    Handled,
    /// Handled, and the host must call `preventDefault`
    PreventDefault,
}

/// Opaque handle the host returns for a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A live listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub target: ListenTarget,
    pub kind: InputKind,
    pub id: ListenerId,
}

/// Every listener registration owned by one instance
#[derive(Debug, Default)]
pub struct Subscriptions {
    entries: SmallVec<[Subscription; 8]>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.entries.push(subscription);
    }

    pub fn contains(&self, target: ListenTarget, kind: InputKind) -> bool {
        self.entries
            .iter()
            .any(|s| s.target == target && s.kind == kind)
    }

    /// Remove and return every registration on `target`
    pub fn take_target(&mut self, target: ListenTarget) -> SmallVec<[Subscription; 8]> {
        let mut taken = SmallVec::new();
        self.entries.retain(|s| {
            if s.target == target {
                taken.push(*s);
                false
            } else {
                true
            }
        });
        taken
    }

    /// Remove and return every registration
    pub fn take_all(&mut self) -> SmallVec<[Subscription; 8]> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(target: ListenTarget, kind: InputKind, id: u64) -> Subscription {
        Subscription {
            target,
            kind,
            id: ListenerId(id),
        }
    }

    #[test]
    fn test_contains_matches_target_and_kind() {
        let mut subs = Subscriptions::new();
        subs.push(sub(ListenTarget::ScrollElement, InputKind::Scroll, 1));
        subs.push(sub(ListenTarget::Document, InputKind::MouseMove, 2));

        assert!(subs.contains(ListenTarget::ScrollElement, InputKind::Scroll));
        assert!(!subs.contains(ListenTarget::Document, InputKind::Scroll));
        assert!(!subs.contains(ListenTarget::ScrollElement, InputKind::Wheel));
    }

    #[test]
    fn test_take_target() {
        let mut subs = Subscriptions::new();
        subs.push(sub(ListenTarget::ScrollElement, InputKind::Scroll, 1));
        subs.push(sub(ListenTarget::Track(Axis::Vertical), InputKind::MouseDown, 2));
        subs.push(sub(ListenTarget::Document, InputKind::MouseUp, 3));

        let taken = subs.take_target(ListenTarget::Track(Axis::Vertical));
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].id, ListenerId(2));
        assert_eq!(subs.len(), 2);

        let rest = subs.take_all();
        assert_eq!(rest.len(), 2);
        assert!(subs.is_empty());
    }
}
