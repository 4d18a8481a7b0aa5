//! Entity state — the latest raw value of an entity and the notification
//! emitted when it changes.

use super::EntityKey;
use crate::time::Timestamp;

/// Attribute name used for the primary state value of an entity.
pub const STATE_ATTRIBUTE: &str = "state";

/// Latest known value of an entity.
///
/// The value is kept as the host delivered it; interpretation (numeric
/// confidence, presence) happens where it is read.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub value: String,
    pub last_updated: Timestamp,
}

impl EntityState {
    #[must_use]
    pub fn new(value: impl Into<String>, last_updated: Timestamp) -> Self {
        Self {
            value: value.into(),
            last_updated,
        }
    }
}

/// Notification that an entity's state was written.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChanged {
    pub entity: EntityKey,
    pub attribute: String,
    pub old: Option<String>,
    pub new: String,
}

impl StateChanged {
    /// Build a notification for the primary `state` attribute.
    #[must_use]
    pub fn state(entity: EntityKey, old: Option<String>, new: impl Into<String>) -> Self {
        Self {
            entity,
            attribute: STATE_ATTRIBUTE.to_string(),
            old,
            new: new.into(),
        }
    }

    /// Whether the value actually differs from the previous one.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.old.as_deref() != Some(self.new.as_str())
    }
}
