//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PresenceError`] via `From` at port boundaries.

/// Top-level error for everything that crosses a port boundary.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("invalid confidence")]
    InvalidConfidence(#[from] InvalidConfidenceError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A messaging or connection failure raised by an adapter.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A confidence state that could not be read as a number.
#[derive(Debug, thiserror::Error)]
#[error("confidence value {value:?} is not a number")]
pub struct InvalidConfidenceError {
    pub value: String,
}

/// A lookup that found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{kind} {key} not found")]
pub struct NotFoundError {
    pub kind: &'static str,
    pub key: String,
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("entity key must not be empty")]
    EmptyEntityKey,

    #[error("entity key {0:?} must have the form <domain>.<object_id>")]
    MalformedEntityKey(String),

    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("state prefix {0:?} must not contain MQTT wildcards")]
    WildcardInPrefix(String),

    #[error("threshold must be a finite number")]
    NonFiniteThreshold,
}
