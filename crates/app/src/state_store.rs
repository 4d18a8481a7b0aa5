//! In-process entity state store with change notifications.
//!
//! Holds the latest value of every entity the bridge has seen and
//! broadcasts a [`StateChanged`] whenever a value differs from the previous
//! one. Listeners register for a single entity key.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;

use minipresence_domain::entity::{EntityKey, EntityState, StateChanged};
use minipresence_domain::error::PresenceError;
use minipresence_domain::time::now;

use crate::ports::StateReader;

/// Latest entity values plus a [`broadcast`] channel of changes.
///
/// Writing a value identical to the stored one refreshes `last_updated`
/// without notifying listeners.
pub struct StateStore {
    states: RwLock<HashMap<EntityKey, EntityState>>,
    sender: broadcast::Sender<StateChanged>,
}

impl StateStore {
    /// Create an empty store whose notification channel holds `capacity`
    /// pending changes per listener.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            states: RwLock::new(HashMap::new()),
            sender,
        }
    }

    /// Record a new value for `key`.
    ///
    /// Returns the notification that was broadcast, or `None` when the value
    /// did not change.
    pub fn set_state(&self, key: EntityKey, value: impl Into<String>) -> Option<StateChanged> {
        let value = value.into();
        let old = {
            let mut states = self.states.write().unwrap_or_else(PoisonError::into_inner);
            states
                .insert(key.clone(), EntityState::new(value.clone(), now()))
                .map(|previous| previous.value)
        };

        let change = StateChanged::state(key, old, value);
        if !change.is_change() {
            return None;
        }

        tracing::trace!(
            entity = %change.entity,
            old = ?change.old,
            new = %change.new,
            "state changed"
        );
        // send fails only when nobody listens, which is fine.
        let _ = self.sender.send(change.clone());
        Some(change)
    }

    /// Synchronous lookup of the latest state.
    #[must_use]
    pub fn state(&self, key: &EntityKey) -> Option<EntityState> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Register a listener for changes to `key`.
    ///
    /// Only changes made *after* this call are delivered.
    #[must_use]
    pub fn listen(&self, key: EntityKey) -> StateListener {
        StateListener {
            key,
            receiver: self.sender.subscribe(),
        }
    }
}

impl StateReader for StateStore {
    fn get_state(
        &self,
        key: &EntityKey,
    ) -> impl Future<Output = Result<Option<EntityState>, PresenceError>> + Send {
        let state = self.state(key);
        async { Ok(state) }
    }
}

/// Receives the changes of a single entity, in the order they were written.
pub struct StateListener {
    key: EntityKey,
    receiver: broadcast::Receiver<StateChanged>,
}

impl StateListener {
    /// Entity this listener watches.
    #[must_use]
    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    /// Wait for the next change of the watched entity.
    ///
    /// Returns `None` once the store is gone. Changes dropped because the
    /// listener fell behind are skipped with a warning.
    pub async fn recv(&mut self) -> Option<StateChanged> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if change.entity == self.key => return Some(change),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(entity = %self.key, skipped, "state listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
