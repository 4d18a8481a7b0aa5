//! State port — read access to the host's entity states.

use std::future::Future;

use minipresence_domain::entity::{EntityKey, EntityState};
use minipresence_domain::error::PresenceError;

/// Reads the latest known state of an entity.
pub trait StateReader {
    /// Return the current state of `key`, or `None` if it has never been seen.
    fn get_state(
        &self,
        key: &EntityKey,
    ) -> impl Future<Output = Result<Option<EntityState>, PresenceError>> + Send;
}

impl<T: StateReader + Send + Sync> StateReader for std::sync::Arc<T> {
    fn get_state(
        &self,
        key: &EntityKey,
    ) -> impl Future<Output = Result<Option<EntityState>, PresenceError>> + Send {
        (**self).get_state(key)
    }
}
