//! Mapping between entity keys and MQTT state topics.
//!
//! An entity `sensor.phone_confidence` with prefix `homeassistant` is read
//! from `homeassistant/sensor/phone_confidence/state`.

use std::collections::HashMap;

use minipresence_domain::entity::EntityKey;
use minipresence_domain::error::ValidationError;

use crate::error::MqttError;

const STATE_SUFFIX: &str = "state";

/// Build the state topic of `key` under `prefix`.
///
/// # Errors
///
/// - [`ValidationError::MalformedEntityKey`] if `key` is not of the form
///   `<domain>.<object_id>` with both halves usable as topic levels
/// - [`ValidationError::WildcardInPrefix`] if `prefix` contains `+` or `#`
pub fn state_topic(prefix: &str, key: &EntityKey) -> Result<String, ValidationError> {
    if prefix.contains(['+', '#']) {
        return Err(ValidationError::WildcardInPrefix(prefix.to_string()));
    }
    let (domain, object_id) = key
        .split()
        .ok_or_else(|| ValidationError::MalformedEntityKey(key.to_string()))?;
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        Ok(format!("{domain}/{object_id}/{STATE_SUFFIX}"))
    } else {
        Ok(format!("{prefix}/{domain}/{object_id}/{STATE_SUFFIX}"))
    }
}

/// The set of state topics the bridge subscribes to.
#[derive(Debug, Clone, Default)]
pub struct StateTopics {
    by_topic: HashMap<String, EntityKey>,
}

impl StateTopics {
    /// Map every key onto its state topic. Duplicate keys collapse.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Topic`] for the first key that cannot be mapped.
    pub fn new(
        prefix: &str,
        keys: impl IntoIterator<Item = EntityKey>,
    ) -> Result<Self, MqttError> {
        let mut by_topic = HashMap::new();
        for key in keys {
            let topic = state_topic(prefix, &key).map_err(MqttError::Topic)?;
            by_topic.insert(topic, key);
        }
        Ok(Self { by_topic })
    }

    /// Entity stored under `topic`, if subscribed.
    #[must_use]
    pub fn resolve(&self, topic: &str) -> Option<&EntityKey> {
        self.by_topic.get(topic)
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.by_topic.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_topic.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_topic.is_empty()
    }
}

/// Decode a state payload.
///
/// Payloads are UTF-8 text, trimmed. A JSON string (`"home"`) is unwrapped
/// to its contents; anything else is kept verbatim.
///
/// # Errors
///
/// Returns [`MqttError::PayloadEncoding`] for non UTF-8 payloads.
pub fn decode_payload(payload: &[u8]) -> Result<String, MqttError> {
    let text = std::str::from_utf8(payload)
        .map_err(MqttError::PayloadEncoding)?
        .trim();
    if text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && let Ok(inner) = serde_json::from_str::<String>(text)
    {
        return Ok(inner);
    }
    Ok(text.to_string())
}
