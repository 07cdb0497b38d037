//! Easing curve for programmatic scrolling

/// Ease-out cubic: fast start, gentle landing.
///
/// `t` is clamped to `0.0..=1.0`; both endpoints are exact.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(-0.5), 0.0);
        assert_eq!(ease_out_cubic(3.0), 1.0);
    }

    #[test]
    fn test_front_loaded_and_monotonic() {
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);

        let mut previous = 0.0;
        for step in 1..=100 {
            let eased = ease_out_cubic(step as f64 / 100.0);
            assert!(eased > previous);
            previous = eased;
        }
    }
}
