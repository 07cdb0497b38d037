//! Last observed scroll metrics of one instance

use crate::axis::AxisState;
use crate::geometry::Geometry;

/// Snapshot of the last measurement pass plus both axis states
///
/// `geometry` is replaced as a whole; it is `None` until the first
/// measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsCache {
    pub geometry: Option<Geometry>,
    pub vertical: AxisState,
    pub horizontal: AxisState,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry of the last measurement, zeroed before the first one
    pub fn geometry(&self) -> Geometry {
        self.geometry.unwrap_or_default()
    }

    pub fn is_measured(&self) -> bool {
        self.geometry.is_some()
    }

    /// Store `current` if it differs from the cached geometry.
    ///
    /// Returns the previous geometry (`None` on the first measurement) when
    /// a change was recorded.
    pub fn replace_geometry(&mut self, current: Geometry) -> Option<Option<Geometry>> {
        if self.geometry == Some(current) {
            return None;
        }
        Some(self.geometry.replace(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_geometry() {
        let mut cache = MetricsCache::new();
        let g = Geometry::new(800.0, 200.0, 200.0, 200.0);

        assert_eq!(cache.replace_geometry(g), Some(None));
        assert_eq!(cache.replace_geometry(g), None);

        let grown = Geometry::new(900.0, 200.0, 200.0, 200.0);
        assert_eq!(cache.replace_geometry(grown), Some(Some(g)));
        assert_eq!(cache.geometry(), grown);
    }
}
