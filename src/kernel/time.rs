use std::time::Duration;

/// How long the phone rings before the call counts as missed.
pub const RING_DURATION: Duration = Duration::from_secs(3);

/// Upper bound for the server-supplied text delay.
pub const MAX_TEXT_DELAY: Duration = Duration::from_secs(30);

/// Default bound on the outbound decision call.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDelay {
    pub delay: Duration,
    /// True when the requested value had to be coerced into `[0, max]`.
    pub clamped: bool,
}

/// PURE FUNCTION: untrusted `simulated_delay` seconds -> bounded wait.
/// NaN and negatives collapse to zero, anything above `max` (including +inf) to `max`.
pub fn text_delay(simulated_delay: f64, max: Duration) -> TextDelay {
    if simulated_delay.is_nan() || simulated_delay < 0.0 {
        return TextDelay { delay: Duration::ZERO, clamped: true };
    }
    if simulated_delay > max.as_secs_f64() {
        return TextDelay { delay: max, clamped: true };
    }
    TextDelay {
        delay: Duration::from_secs_f64(simulated_delay),
        clamped: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_passes_through() {
        let d = text_delay(2.0, MAX_TEXT_DELAY);
        assert_eq!(d.delay, Duration::from_secs(2));
        assert!(!d.clamped);

        let half = text_delay(0.5, MAX_TEXT_DELAY);
        assert_eq!(half.delay, Duration::from_millis(500));

        let zero = text_delay(0.0, MAX_TEXT_DELAY);
        assert_eq!(zero.delay, Duration::ZERO);
        assert!(!zero.clamped);
    }

    #[test]
    fn hostile_values_are_bounded() {
        assert_eq!(text_delay(-4.0, MAX_TEXT_DELAY), TextDelay { delay: Duration::ZERO, clamped: true });
        assert_eq!(text_delay(f64::NAN, MAX_TEXT_DELAY), TextDelay { delay: Duration::ZERO, clamped: true });
        assert_eq!(text_delay(1e12, MAX_TEXT_DELAY), TextDelay { delay: MAX_TEXT_DELAY, clamped: true });
        assert_eq!(text_delay(f64::INFINITY, MAX_TEXT_DELAY), TextDelay { delay: MAX_TEXT_DELAY, clamped: true });
    }

    #[test]
    fn max_itself_is_not_clamped() {
        let d = text_delay(30.0, MAX_TEXT_DELAY);
        assert_eq!(d.delay, MAX_TEXT_DELAY);
        assert!(!d.clamped);
    }
}
