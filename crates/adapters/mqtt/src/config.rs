//! MQTT connection configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the MQTT bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Prefix of the entity state topics (`<prefix>/<domain>/<object_id>/state`).
    pub state_prefix: String,
    /// Optional broker username.
    pub username: Option<String>,
    /// Optional broker password, only used together with `username`.
    pub password: Option<String>,
    /// Whether published presence messages are retained by the broker.
    pub retain: bool,
    /// Capacity of the client request channel.
    pub channel_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "minipresence".to_string(),
            keep_alive_secs: 30,
            state_prefix: "homeassistant".to_string(),
            username: None,
            password: None,
            retain: false,
            channel_capacity: 64,
        }
    }
}

impl MqttConfig {
    /// Build the `rumqttc` connection options.
    #[must_use]
    pub fn options(&self) -> rumqttc::MqttOptions {
        let mut options = rumqttc::MqttOptions::new(
            self.client_id.clone(),
            self.broker_host.clone(),
            self.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(self.keep_alive_secs)));
        if let Some(username) = &self.username {
            options.set_credentials(
                username.clone(),
                self.password.clone().unwrap_or_default(),
            );
        }
        options
    }
}
