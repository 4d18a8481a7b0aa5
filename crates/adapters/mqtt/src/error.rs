//! MQTT adapter error types.

use minipresence_domain::error::{PresenceError, ValidationError};

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// An entity key cannot be mapped onto a state topic.
    #[error("cannot map entity key to a state topic")]
    Topic(#[source] ValidationError),

    /// An incoming payload is not valid UTF-8.
    #[error("MQTT payload is not valid UTF-8")]
    PayloadEncoding(#[source] std::str::Utf8Error),

    /// A domain-level error.
    #[error("domain error")]
    Domain(#[source] PresenceError),
}

impl MqttError {
    /// Convert into a [`PresenceError`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> PresenceError {
        match self {
            Self::Domain(err) => err,
            Self::Topic(err) => PresenceError::Validation(err),
            other => PresenceError::Transport(Box::new(other)),
        }
    }
}

impl From<MqttError> for PresenceError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
