//! # minipresenced — minipresence daemon
//!
//! Composition root that wires all adapters together and runs the bridge.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Create the in-process state store
//! - Connect the MQTT adapter, which feeds the store and publishes presence
//! - Spawn one presence republisher per configured tracker
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use minipresence_adapter_mqtt::MqttBridge;
use minipresence_app::ports::MessagePublisher;
use minipresence_app::services::presence_republisher::PresenceRepublisher;
use minipresence_app::state_store::{StateListener, StateStore};
use minipresence_domain::tracker::TrackerConfig;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // State store and listeners, registered before anything can write
    let store = Arc::new(StateStore::new(config.store.capacity));
    let listening = listen_all(&config.trackers, &store);

    // MQTT
    let mut bridge = MqttBridge::connect(&config.mqtt, Arc::clone(&store), config.watched_keys())
        .context("failed to start MQTT bridge")?;

    // Trackers
    let trackers = spawn_trackers(listening, &store, &bridge.publisher());
    tracing::info!(trackers = trackers.len(), "minipresenced running");

    shutdown_signal().await;
    tracing::info!("shutting down");

    for handle in trackers {
        handle.abort();
    }
    if let Err(err) = bridge.shutdown().await {
        tracing::warn!(error = %err, "MQTT disconnect failed");
    }

    Ok(())
}

/// Register one listener per tracker on its trigger entity.
fn listen_all(
    trackers: &[TrackerConfig],
    store: &StateStore,
) -> Vec<(TrackerConfig, StateListener)> {
    trackers
        .iter()
        .map(|tracker| (tracker.clone(), store.listen(tracker.trigger.clone())))
        .collect()
}

fn spawn_trackers<P>(
    listening: Vec<(TrackerConfig, StateListener)>,
    store: &Arc<StateStore>,
    publisher: &P,
) -> Vec<JoinHandle<()>>
where
    P: MessagePublisher + Clone + Send + Sync + 'static,
{
    listening
        .into_iter()
        .map(|(tracker, listener)| {
            let republisher =
                PresenceRepublisher::new(tracker, Arc::clone(store), publisher.clone());
            tokio::spawn(republisher.run(listener))
        })
        .collect()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
