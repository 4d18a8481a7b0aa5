//! Tracker — one confidence sensor bridged to one device presence.
//!
//! A tracker watches a `trigger` entity holding a confidence score and a
//! `device` entity holding a presence. When the two disagree it republishes
//! the corrected presence on `device_topic`.

use serde::Deserialize;

use crate::confidence::{Confidence, DEFAULT_THRESHOLD};
use crate::entity::EntityKey;
use crate::error::ValidationError;
use crate::presence::Presence;

/// Configuration of a single tracker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackerConfig {
    /// Label used in logs. Defaults to the device key.
    #[serde(default)]
    pub name: Option<String>,
    /// Entity whose state is the confidence score; changes to it run the rule.
    pub trigger: EntityKey,
    /// Entity whose state is the current presence.
    pub device: EntityKey,
    /// Topic the corrected presence is published to.
    pub device_topic: String,
    /// Confidence boundary. Above it means home, at or below means away.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl TrackerConfig {
    /// Create a tracker with the default threshold.
    #[must_use]
    pub fn new(trigger: EntityKey, device: EntityKey, device_topic: impl Into<String>) -> Self {
        Self {
            name: None,
            trigger,
            device,
            device_topic: device_topic.into(),
            threshold: DEFAULT_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown in logs.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.device.as_str())
    }

    /// Check invariants that deserialization alone does not enforce.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTopic`] when `device_topic` is blank
    /// and [`ValidationError::NonFiniteThreshold`] for a `NaN` or infinite
    /// threshold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.device_topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if !self.threshold.is_finite() {
            return Err(ValidationError::NonFiniteThreshold);
        }
        Ok(())
    }

    /// Apply this tracker's threshold to the current readings.
    #[must_use]
    pub fn decide(&self, current: Option<Presence>, confidence: Confidence) -> Option<Presence> {
        decide(current, confidence, self.threshold)
    }
}

/// Decide which presence, if any, should be republished.
///
/// - `not_home` and confidence above `threshold` → `home`
/// - `home` and confidence at or below `threshold` → `not_home`
/// - anything else, including an unrecognised presence → nothing
#[must_use]
pub fn decide(
    current: Option<Presence>,
    confidence: Confidence,
    threshold: f64,
) -> Option<Presence> {
    match current? {
        Presence::NotHome if confidence.is_above(threshold) => Some(Presence::Home),
        Presence::Home if confidence.is_at_or_below(threshold) => Some(Presence::NotHome),
        _ => None,
    }
}
