//! Time-based scroll animation
//!
//! Maps elapsed time to a scroll position on one or both axes. There is no
//! physics here: one ease-out-cubic curve over a fixed duration, and a
//! deterministic end state.

use std::time::{Duration, Instant};

use crate::easing::ease_out_cubic;

/// Duration picked when the caller does not supply one.
///
/// Grows sub-linearly with the distance: 500px take about 430ms, 1000px
/// about 625ms, 2000px about 910ms. Distances too large to represent
/// saturate at `Duration::MAX`; a NaN distance takes no time.
pub fn auto_duration(distance: f64) -> Duration {
    if distance.is_nan() {
        return Duration::ZERO;
    }
    let millis = 15.0 * distance.abs().powf(0.54);
    Duration::try_from_secs_f64(millis / 1000.0).unwrap_or(Duration::MAX)
}

/// Start and end offsets of one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTween {
    pub start: f64,
    pub end: f64,
}

impl AxisTween {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Axis does not move; never written during the animation
    pub fn is_static(&self) -> bool {
        self.start == self.end
    }

    pub fn distance(&self) -> f64 {
        (self.end - self.start).abs()
    }

    fn at(&self, eased: f64) -> f64 {
        self.start + eased * (self.end - self.start)
    }
}

/// Positions to write for one animation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationStep {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub finished: bool,
}

/// A running scroll animation
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    x: AxisTween,
    y: AxisTween,
    started: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    /// `None` when neither axis moves. Without an explicit duration one is
    /// derived from the longer of the two distances.
    pub fn new(x: AxisTween, y: AxisTween, duration: Option<Duration>, now: Instant) -> Option<Self> {
        if x.is_static() && y.is_static() {
            return None;
        }

        let duration = duration.unwrap_or_else(|| auto_duration(x.distance().max(y.distance())));

        Some(Self {
            x,
            y,
            started: now,
            duration,
        })
    }

    pub fn x(&self) -> AxisTween {
        self.x
    }

    pub fn y(&self) -> AxisTween {
        self.y
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Zero-duration animations jump straight to the end
    pub fn is_immediate(&self) -> bool {
        self.duration.is_zero()
    }

    /// Linear progress in `0.0..=1.0`
    pub fn progress(&self, now: Instant) -> f64 {
        if self.is_immediate() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Positions at `now`; axes that do not move are left out
    pub fn sample(&self, now: Instant) -> AnimationStep {
        let t = self.progress(now);
        let eased = ease_out_cubic(t);

        AnimationStep {
            x: (!self.x.is_static()).then(|| self.x.at(eased)),
            y: (!self.y.is_static()).then(|| self.y.at(eased)),
            finished: t >= 1.0,
        }
    }

    /// Final positions, written as-is by immediate animations
    pub fn end_step(&self) -> AnimationStep {
        AnimationStep {
            x: Some(self.x.end),
            y: Some(self.y.end),
            finished: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_auto_duration_calibration() {
        let close = |distance: f64, expected: f64| {
            let actual = auto_duration(distance).as_secs_f64() * 1000.0;
            assert!(
                (actual - expected).abs() < 6.0,
                "{distance}px took {actual:.1}ms, expected about {expected}ms"
            );
        };
        close(500.0, 430.0);
        close(1000.0, 625.0);
        close(2000.0, 910.0);
        assert_eq!(auto_duration(0.0), Duration::ZERO);
    }

    #[test]
    fn test_auto_duration_saturates() {
        assert_eq!(auto_duration(f64::INFINITY), Duration::MAX);
        assert_eq!(auto_duration(1e300), Duration::MAX);
        assert_eq!(auto_duration(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn test_auto_duration_increasing_and_concave() {
        let d = |px: f64| auto_duration(px).as_secs_f64();
        let mut previous_gain = f64::INFINITY;
        for step in 1..40 {
            let px = step as f64 * 100.0;
            let gain = d(px + 100.0) - d(px);
            assert!(gain > 0.0);
            assert!(gain < previous_gain);
            previous_gain = gain;
        }
    }

    #[test]
    fn test_no_movement_is_no_animation() {
        let now = Instant::now();
        let still = AxisTween::new(40.0, 40.0);
        assert!(ScrollAnimation::new(still, still, None, now).is_none());
        assert!(ScrollAnimation::new(still, still, Some(ms(0)), now).is_none());
    }

    #[test]
    fn test_sample_eases_and_finishes_exactly() {
        let start = Instant::now();
        let anim = ScrollAnimation::new(
            AxisTween::new(0.0, 0.0),
            AxisTween::new(0.0, 800.0),
            Some(ms(400)),
            start,
        )
        .unwrap();

        let first = anim.sample(start);
        assert_eq!(first.y, Some(0.0));
        assert_eq!(first.x, None);
        assert!(!first.finished);

        let half = anim.sample(start + ms(200));
        assert!((half.y.unwrap() - 700.0).abs() < 1e-6);

        let done = anim.sample(start + ms(1000));
        assert_eq!(done.y, Some(800.0));
        assert!(done.finished);
    }

    #[test]
    fn test_auto_duration_uses_longer_axis() {
        let now = Instant::now();
        let anim = ScrollAnimation::new(
            AxisTween::new(0.0, 500.0),
            AxisTween::new(100.0, 0.0),
            None,
            now,
        )
        .unwrap();
        assert_eq!(anim.duration(), auto_duration(500.0));
    }

    #[test]
    fn test_immediate() {
        let now = Instant::now();
        let anim = ScrollAnimation::new(
            AxisTween::new(300.0, 0.0),
            AxisTween::new(300.0, 0.0),
            Some(Duration::ZERO),
            now,
        )
        .unwrap();

        assert!(anim.is_immediate());
        assert_eq!(anim.progress(now), 1.0);
        assert_eq!(
            anim.end_step(),
            AnimationStep {
                x: Some(0.0),
                y: Some(0.0),
                finished: true
            }
        );
    }
}
