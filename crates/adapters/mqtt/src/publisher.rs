//! [`MessagePublisher`] backed by an MQTT client.

use rumqttc::{AsyncClient, QoS};

use minipresence_app::ports::MessagePublisher;
use minipresence_domain::error::PresenceError;

use crate::error::MqttError;

/// Publishes payloads with QoS 1 through a shared `rumqttc` client.
///
/// Cloning is cheap; all clones feed the same connection.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    retain: bool,
}

impl MqttPublisher {
    #[must_use]
    pub fn new(client: AsyncClient, retain: bool) -> Self {
        Self { client, retain }
    }
}

impl MessagePublisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PresenceError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, self.retain, payload.as_bytes().to_vec())
            .await
            .map_err(MqttError::Client)?;
        tracing::trace!(topic, payload, "MQTT message queued");
        Ok(())
    }
}
