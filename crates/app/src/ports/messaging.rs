//! Messaging port — outbound publish to a topic.

use std::future::Future;

use minipresence_domain::error::PresenceError;

/// Sends payloads to named topics.
///
/// Fire-and-forget: success means the message was handed to the transport,
/// not that any consumer received it.
pub trait MessagePublisher {
    /// Publish `payload` on `topic`.
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), PresenceError>> + Send;
}

impl<T: MessagePublisher + Send + Sync> MessagePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl Future<Output = Result<(), PresenceError>> + Send {
        (**self).publish(topic, payload)
    }
}
