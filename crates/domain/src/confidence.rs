//! Confidence — a numeric score reported by a presence sensor.

use std::str::FromStr;

use crate::error::InvalidConfidenceError;

/// Default boundary between "probably away" and "probably home".
pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// A confidence score parsed from an entity state.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Strictly above `threshold`.
    #[must_use]
    pub fn is_above(self, threshold: f64) -> bool {
        self.0 > threshold
    }

    /// At or below `threshold`. `NaN` is neither above nor at-or-below.
    #[must_use]
    pub fn is_at_or_below(self, threshold: f64) -> bool {
        self.0 <= threshold
    }
}

impl FromStr for Confidence {
    type Err = InvalidConfidenceError;

    /// Parse a state value, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .map(Self)
            .map_err(|_| InvalidConfidenceError {
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_integer_and_decimal_values() {
        assert_eq!("72".parse::<Confidence>().unwrap().value(), 72.0);
        assert_eq!("10.5".parse::<Confidence>().unwrap().value(), 10.5);
        assert_eq!("-3".parse::<Confidence>().unwrap().value(), -3.0);
    }

    #[test]
    fn should_ignore_surrounding_whitespace() {
        assert_eq!(" 42\n".parse::<Confidence>().unwrap().value(), 42.0);
    }

    #[test]
    fn should_reject_non_numeric_value() {
        let err = "unavailable".parse::<Confidence>().unwrap_err();
        assert_eq!(err.value, "unavailable");
    }

    #[test]
    fn should_reject_empty_value() {
        assert!("".parse::<Confidence>().is_err());
    }

    #[test]
    fn should_treat_threshold_as_at_or_below() {
        let c = Confidence::new(DEFAULT_THRESHOLD);
        assert!(!c.is_above(DEFAULT_THRESHOLD));
        assert!(c.is_at_or_below(DEFAULT_THRESHOLD));
    }

    #[test]
    fn should_treat_nan_as_neither_side() {
        let c: Confidence = "NaN".parse().unwrap();
        assert!(!c.is_above(DEFAULT_THRESHOLD));
        assert!(!c.is_at_or_below(DEFAULT_THRESHOLD));
    }
}
