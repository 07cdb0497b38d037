//! Measurement pass: read geometry, refresh the cache, update both axes

use glidebar_core::{NotificationKind, ScrollSurface};
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::runtime::{InstanceId, Runtime};

impl<S: ScrollSurface, C: Clock> Runtime<S, C> {
    /// Re-measure now instead of waiting for the poll loop. Returns whether
    /// the geometry changed.
    pub fn update(&mut self, id: InstanceId) -> Result<bool> {
        if !self.instances.contains_key(id) {
            return Err(Error::UnknownInstance(id));
        }
        Ok(self.measure(id))
    }

    /// Unchanged geometry is a no-op. A collapsed container that left the
    /// document destroys its instance.
    pub(crate) fn measure(&mut self, id: InstanceId) -> bool {
        let touch = self.env.touch;
        let Some(instance) = self.instances.get_mut(id) else {
            return false;
        };
        if instance.destroyed {
            return false;
        }

        let current = instance.surface.geometry();
        if instance.cache.geometry == Some(current) {
            return false;
        }

        if current.is_collapsed() && !instance.surface.is_attached() {
            debug!(?id, "container detached, destroying");
            self.destroy_instance(id);
            return false;
        }

        let Some(previous) = instance.cache.replace_geometry(current) else {
            return false;
        };
        trace!(?id, ?current, "geometry changed");

        if previous.is_some() {
            instance.emit(NotificationKind::SizeChange);
        }
        instance.update_axes(touch);
        true
    }
}
