//! # minipresence-adapter-mqtt
//!
//! MQTT adapter — connects minipresence to the home-automation host through
//! an MQTT broker.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker
//! - Subscribe to the state topics of every entity a tracker reads
//!   (`<state_prefix>/<domain>/<object_id>/state`) and write incoming values
//!   into the [`StateStore`]
//! - Publish presence updates through [`MqttPublisher`]
//!
//! Subscriptions are (re)issued on every `CONNACK`, so a broker restart
//! does not silently drop them.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `minipresence-app` and
//! `minipresence-domain`.

mod config;
mod error;
mod publisher;
pub mod topic;

pub use config::MqttConfig;
pub use error::MqttError;
pub use publisher::MqttPublisher;

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS, SubscribeFilter};
use tokio::task::JoinHandle;

use minipresence_app::state_store::StateStore;
use minipresence_domain::entity::{EntityKey, StateChanged};

use topic::{StateTopics, decode_payload};

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Live connection to the broker: the client plus its event-loop task.
pub struct MqttBridge {
    client: AsyncClient,
    retain: bool,
    event_loop: Option<JoinHandle<()>>,
}

impl MqttBridge {
    /// Create the client and spawn the event loop that feeds `store`.
    ///
    /// The connection itself is established by the event loop; this call
    /// does not wait for the broker.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Topic`] if any key cannot be mapped onto a state
    /// topic.
    pub fn connect(
        config: &MqttConfig,
        store: Arc<StateStore>,
        keys: impl IntoIterator<Item = EntityKey>,
    ) -> Result<Self, MqttError> {
        let topics = StateTopics::new(&config.state_prefix, keys)?;
        let (client, eventloop) = AsyncClient::new(config.options(), config.channel_capacity);

        tracing::info!(
            broker = %config.broker_host,
            port = config.broker_port,
            topics = topics.len(),
            "MQTT bridge starting"
        );

        let handle = tokio::spawn(run_event_loop(eventloop, client.clone(), topics, store));

        Ok(Self {
            client,
            retain: config.retain,
            event_loop: Some(handle),
        })
    }

    /// A publisher sharing this bridge's connection.
    #[must_use]
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher::new(self.client.clone(), self.retain)
    }

    /// Disconnect from the broker and stop the event loop.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the disconnect request could not be
    /// queued; the event loop is stopped regardless.
    pub async fn shutdown(&mut self) -> Result<(), MqttError> {
        let result = self.client.disconnect().await.map_err(MqttError::Client);
        if let Some(handle) = self.event_loop.take() {
            handle.abort();
            tracing::debug!("MQTT event loop aborted");
        }
        tracing::info!("MQTT bridge stopped");
        result
    }
}

async fn run_event_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    topics: StateTopics,
    store: Arc<StateStore>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!("MQTT connected");
                subscribe_all(&client, &topics);
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                ingest(&topics, &store, &publish.topic, &publish.payload);
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "MQTT connection error, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

fn subscribe_all(client: &AsyncClient, topics: &StateTopics) {
    if topics.is_empty() {
        return;
    }
    let filters = topics
        .topics()
        .map(|topic| SubscribeFilter::new(topic.to_string(), QoS::AtLeastOnce));
    // One request for every topic: this runs on the event-loop task, which
    // cannot drain its own request channel while it is queueing.
    match client.try_subscribe_many(filters) {
        Ok(()) => tracing::debug!(topics = topics.len(), "subscribed"),
        Err(err) => tracing::error!(topics = topics.len(), error = %err, "failed to subscribe"),
    }
}

/// Write one incoming state message into `store`.
///
/// Messages on unknown topics and payloads that are not UTF-8 are dropped.
pub fn ingest(
    topics: &StateTopics,
    store: &StateStore,
    topic: &str,
    payload: &[u8],
) -> Option<StateChanged> {
    let Some(key) = topics.resolve(topic) else {
        tracing::trace!(topic, "message on unsubscribed topic ignored");
        return None;
    };
    match decode_payload(payload) {
        Ok(value) => store.set_state(key.clone(), value),
        Err(err) => {
            tracing::warn!(topic, error = %err, "dropping undecodable state payload");
            None
        }
    }
}
