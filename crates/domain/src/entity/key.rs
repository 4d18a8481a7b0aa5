//! Entity key — the host-assigned name of an entity (e.g. `sensor.phone_confidence`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifies an entity in the host's state store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityKey(String);

impl EntityKey {
    /// Wrap a key after checking it is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyEntityKey`] for a blank key.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::EmptyEntityKey);
        }
        Ok(Self(key))
    }

    /// Split a `<domain>.<object_id>` key into its two halves.
    ///
    /// Returns `None` when the key has no dot, either half is empty, or
    /// either half contains `/`, `+` or `#`.
    #[must_use]
    pub fn split(&self) -> Option<(&str, &str)> {
        let (domain, object_id) = self.0.split_once('.')?;
        (is_topic_level(domain) && is_topic_level(object_id)).then_some((domain, object_id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Non-empty and free of MQTT level separators and wildcards.
fn is_topic_level(part: &str) -> bool {
    !part.is_empty() && !part.contains(['/', '+', '#'])
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for EntityKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityKey> for String {
    fn from(key: EntityKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_empty_key() {
        assert_eq!(EntityKey::new(""), Err(ValidationError::EmptyEntityKey));
        assert_eq!(EntityKey::new("   "), Err(ValidationError::EmptyEntityKey));
    }

    #[test]
    fn should_split_domain_and_object_id() {
        let key = EntityKey::new("sensor.phone_confidence").unwrap();
        assert_eq!(key.split(), Some(("sensor", "phone_confidence")));
    }

    #[test]
    fn should_not_split_key_without_dot() {
        let key = EntityKey::new("phone").unwrap();
        assert_eq!(key.split(), None);
    }

    #[test]
    fn should_not_split_key_with_empty_half() {
        assert_eq!(EntityKey::new(".phone").unwrap().split(), None);
        assert_eq!(EntityKey::new("sensor.").unwrap().split(), None);
    }

    #[test]
    fn should_not_split_key_with_topic_separator() {
        assert_eq!(EntityKey::new("sensor.a/b").unwrap().split(), None);
        assert_eq!(EntityKey::new("sensor/a.b").unwrap().split(), None);
    }

    #[test]
    fn should_not_split_key_with_wildcard() {
        assert_eq!(EntityKey::new("sensor.phone#").unwrap().split(), None);
        assert_eq!(EntityKey::new("sensor.+").unwrap().split(), None);
        assert_eq!(EntityKey::new("+.phone").unwrap().split(), None);
    }

    #[test]
    fn should_keep_extra_dots_in_object_id() {
        let key = EntityKey::new("sensor.phone.v2").unwrap();
        assert_eq!(key.split(), Some(("sensor", "phone.v2")));
    }

    #[test]
    fn should_deserialize_from_plain_string() {
        let key: EntityKey = serde_json::from_str("\"device_tracker.phone\"").unwrap();
        assert_eq!(key.as_str(), "device_tracker.phone");
    }

    #[test]
    fn should_fail_to_deserialize_empty_string() {
        let result: Result<EntityKey, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
