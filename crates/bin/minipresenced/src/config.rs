//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `minipresence.toml` in the working directory, or the file named
//! by `MINIPRESENCE_CONFIG`. Every section except `trackers` has a sensible
//! default. Environment variables take precedence over file values.

use std::collections::BTreeSet;

use serde::Deserialize;

use minipresence_adapter_mqtt::MqttConfig;
use minipresence_adapter_mqtt::topic::state_topic;
use minipresence_domain::entity::EntityKey;
use minipresence_domain::error::ValidationError;
use minipresence_domain::tracker::TrackerConfig;

const DEFAULT_PATH: &str = "minipresence.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Broker connection settings.
    pub mqtt: MqttConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// State store settings.
    pub store: StoreConfig,
    /// One entry per confidence → presence bridge.
    pub trackers: Vec<TrackerConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// In-process state store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Pending change notifications kept per tracker before it lags.
    pub capacity: usize,
}

impl Config {
    /// Load configuration from file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MINIPRESENCE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.into());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("MINIPRESENCE_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(val) = var("MINIPRESENCE_MQTT_PORT")
            && let Ok(port) = val.parse()
        {
            self.mqtt.broker_port = port;
        }
        if let Some(val) = var("MINIPRESENCE_MQTT_USERNAME") {
            self.mqtt.username = Some(val);
        }
        if let Some(val) = var("MINIPRESENCE_MQTT_PASSWORD") {
            self.mqtt.password = Some(val);
        }
        if let Some(val) = var("MINIPRESENCE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "mqtt broker port must be non-zero".to_string(),
            ));
        }
        if self.mqtt.channel_capacity == 0 {
            return Err(ConfigError::Validation(
                "mqtt channel capacity must be non-zero".to_string(),
            ));
        }
        if self.store.capacity == 0 {
            return Err(ConfigError::Validation(
                "store capacity must be non-zero".to_string(),
            ));
        }
        if self.trackers.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[trackers]] entry is required".to_string(),
            ));
        }
        for tracker in &self.trackers {
            tracker
                .validate()
                .and_then(|()| state_topic(&self.mqtt.state_prefix, &tracker.trigger))
                .and_then(|_| state_topic(&self.mqtt.state_prefix, &tracker.device))
                .map_err(|source| ConfigError::Tracker {
                    name: tracker.display_name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Every entity some tracker reads, deduplicated.
    #[must_use]
    pub fn watched_keys(&self) -> BTreeSet<EntityKey> {
        self.trackers
            .iter()
            .flat_map(|t| [t.trigger.clone(), t.device.clone()])
            .collect()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "minipresenced=info,minipresence=info".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// A tracker entry is invalid.
    #[error("invalid tracker {name}")]
    Tracker {
        name: String,
        #[source]
        source: ValidationError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_TRACKER: &str = r#"
        [[trackers]]
        trigger = "sensor.phone_confidence"
        device = "device_tracker.phone"
        device_topic = "location/phone"
    "#;

    fn one_tracker() -> Config {
        toml::from_str(ONE_TRACKER).unwrap()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.mqtt.broker_host, "localhost");
        assert_eq!(config.mqtt.broker_port, 1883);
        assert_eq!(config.store.capacity, 256);
        assert_eq!(config.logging.filter, "minipresenced=info,minipresence=info");
        assert!(config.trackers.is_empty());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            [mqtt]
            broker_host = "10.0.0.2"
            broker_port = 1884
            state_prefix = "statestream"

            [logging]
            filter = "debug"

            [store]
            capacity = 32

            [[trackers]]
            name = "alice"
            trigger = "sensor.alice_confidence"
            device = "device_tracker.alice"
            device_topic = "location/alice"
            threshold = 25.5

            [[trackers]]
            trigger = "sensor.bob_confidence"
            device = "device_tracker.bob"
            device_topic = "location/bob"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.mqtt.broker_host, "10.0.0.2");
        assert_eq!(config.mqtt.broker_port, 1884);
        assert_eq!(config.mqtt.state_prefix, "statestream");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.store.capacity, 32);
        assert_eq!(config.trackers.len(), 2);
        assert_eq!(config.trackers[0].display_name(), "alice");
        assert!((config.trackers[0].threshold - 25.5).abs() < f64::EPSILON);
        assert!((config.trackers[1].threshold - 10.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert!(config.trackers.is_empty());
    }

    #[test]
    fn should_reject_missing_trackers() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = one_tracker();
        config.mqtt.broker_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_store_capacity() {
        let mut config = one_tracker();
        config.store.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_name_invalid_tracker() {
        let mut config = one_tracker();
        config.trackers[0].device_topic = String::new();
        match config.validate() {
            Err(ConfigError::Tracker { name, source }) => {
                assert_eq!(name, "device_tracker.phone");
                assert_eq!(source, ValidationError::EmptyTopic);
            }
            other => panic!("expected tracker error, got {other:?}"),
        }
    }

    #[test]
    fn should_reject_zero_channel_capacity() {
        let mut config = one_tracker();
        config.mqtt.channel_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_reject_key_that_is_not_a_topic_level() {
        for raw in ["sensor.a/b", "sensor/a.b", "sensor.phone#", "phone"] {
            let mut config = one_tracker();
            config.trackers[0].trigger = EntityKey::new(raw).unwrap();
            match config.validate() {
                Err(ConfigError::Tracker { source, .. }) => {
                    assert_eq!(source, ValidationError::MalformedEntityKey(raw.to_string()));
                }
                other => panic!("expected tracker error for {raw}, got {other:?}"),
            }
        }
    }

    #[test]
    fn should_reject_malformed_device_key() {
        let mut config = one_tracker();
        config.trackers[0].device = EntityKey::new("device_tracker.+").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Tracker { .. })
        ));
    }

    #[test]
    fn should_reject_wildcard_state_prefix() {
        let mut config = one_tracker();
        config.mqtt.state_prefix = "homeassistant/#".to_string();
        match config.validate() {
            Err(ConfigError::Tracker { source, .. }) => {
                assert_eq!(
                    source,
                    ValidationError::WildcardInPrefix("homeassistant/#".to_string())
                );
            }
            other => panic!("expected tracker error, got {other:?}"),
        }
    }

    #[test]
    fn should_report_parse_error_for_empty_entity_key() {
        let toml = r#"
            [[trackers]]
            trigger = ""
            device = "device_tracker.phone"
            device_topic = "location/phone"
        "#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_missing_topic() {
        let toml = r#"
            [[trackers]]
            trigger = "sensor.phone_confidence"
            device = "device_tracker.phone"
        "#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_overrides() {
        let mut config = one_tracker();
        config.apply_overrides(|name| match name {
            "MINIPRESENCE_MQTT_HOST" => Some("broker.lan".to_string()),
            "MINIPRESENCE_MQTT_PORT" => Some("8883".to_string()),
            "MINIPRESENCE_LOG" => Some("trace".to_string()),
            _ => None,
        });
        assert_eq!(config.mqtt.broker_host, "broker.lan");
        assert_eq!(config.mqtt.broker_port, 8883);
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_prefer_rust_log_over_own_variable() {
        let mut config = one_tracker();
        config.apply_overrides(|name| match name {
            "MINIPRESENCE_LOG" => Some("debug".to_string()),
            "RUST_LOG" => Some("warn".to_string()),
            _ => None,
        });
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_ignore_unparseable_port_override() {
        let mut config = one_tracker();
        config.apply_overrides(|name| {
            (name == "MINIPRESENCE_MQTT_PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.mqtt.broker_port, 1883);
    }

    #[test]
    fn should_collect_watched_keys_once() {
        let mut config = one_tracker();
        let mut second = config.trackers[0].clone();
        second.trigger = EntityKey::new("sensor.phone_wifi_confidence").unwrap();
        second.device_topic = "location/phone_wifi".to_string();
        config.trackers.push(second);

        let keys: Vec<String> = config
            .watched_keys()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            keys,
            vec![
                "device_tracker.phone",
                "sensor.phone_confidence",
                "sensor.phone_wifi_confidence",
            ]
        );
    }
}
