//! Presence republisher — turns confidence changes into presence updates.
//!
//! On every change of the tracker's `trigger` entity the republisher reads
//! the current confidence and the current device presence, applies the
//! tracker threshold and, when the two disagree, publishes the corrected
//! presence on the device topic.

use minipresence_domain::confidence::Confidence;
use minipresence_domain::entity::{EntityKey, EntityState, StateChanged};
use minipresence_domain::error::{NotFoundError, PresenceError};
use minipresence_domain::presence::Presence;
use minipresence_domain::tracker::TrackerConfig;

use crate::ports::{MessagePublisher, StateReader};
use crate::state_store::StateListener;

/// Application service bridging one confidence sensor to one device presence.
pub struct PresenceRepublisher<S, P> {
    config: TrackerConfig,
    states: S,
    publisher: P,
}

impl<S, P> PresenceRepublisher<S, P>
where
    S: StateReader,
    P: MessagePublisher,
{
    /// Create a republisher for `config`, reading from `states` and
    /// publishing through `publisher`.
    pub fn new(config: TrackerConfig, states: S, publisher: P) -> Self {
        Self {
            config,
            states,
            publisher,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// React to one change of the trigger entity.
    ///
    /// The notification contents are not used: both values are read fresh
    /// from the state port. Returns the presence that was published, if any.
    ///
    /// # Errors
    ///
    /// - [`PresenceError::NotFound`] if the trigger or device has no state
    /// - [`PresenceError::InvalidConfidence`] if the trigger state is not a number
    /// - any error returned by the state or messaging port
    pub async fn handle_state_change(
        &self,
        change: &StateChanged,
    ) -> Result<Option<Presence>, PresenceError> {
        tracing::debug!(
            tracker = self.config.display_name(),
            entity = %change.entity,
            attribute = %change.attribute,
            old = ?change.old,
            new = %change.new,
            "trigger changed"
        );

        let confidence: Confidence = self.read(&self.config.trigger).await?.value.parse()?;
        let device = self.read(&self.config.device).await?;

        let current = Presence::parse(&device.value);
        if current.is_none() {
            tracing::debug!(
                tracker = self.config.display_name(),
                device = %self.config.device,
                value = %device.value,
                "unrecognised presence, ignoring"
            );
        }

        let Some(target) = self.config.decide(current, confidence) else {
            tracing::debug!(
                tracker = self.config.display_name(),
                confidence = confidence.value(),
                presence = %device.value,
                "presence consistent with confidence"
            );
            return Ok(None);
        };

        self.publisher
            .publish(&self.config.device_topic, target.as_str())
            .await?;

        tracing::info!(
            tracker = self.config.display_name(),
            topic = %self.config.device_topic,
            confidence = confidence.value(),
            presence = %target,
            "presence republished"
        );
        Ok(Some(target))
    }

    /// Process changes from `listener` until it closes.
    ///
    /// Failures of a single invocation are logged and do not stop the loop.
    pub async fn run(self, mut listener: StateListener) {
        tracing::info!(
            tracker = self.config.display_name(),
            trigger = %listener.key(),
            "tracker listening"
        );

        while let Some(change) = listener.recv().await {
            if let Err(err) = self.handle_state_change(&change).await {
                tracing::error!(
                    tracker = self.config.display_name(),
                    error = %err,
                    cause = ?std::error::Error::source(&err).map(ToString::to_string),
                    "presence update failed"
                );
            }
        }

        tracing::info!(tracker = self.config.display_name(), "tracker stopped");
    }

    async fn read(&self, key: &EntityKey) -> Result<EntityState, PresenceError> {
        self.states.get_state(key).await?.ok_or_else(|| {
            NotFoundError {
                kind: "Entity state",
                key: key.to_string(),
            }
            .into()
        })
    }
}
