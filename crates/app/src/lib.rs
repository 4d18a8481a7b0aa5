//! # minipresence-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `StateReader` — read the latest value of an entity
//!   - `MessagePublisher` — send a payload to a messaging topic
//! - Provide **in-process infrastructure** (the state store) that holds the
//!   latest entity values and notifies listeners on change
//! - Define the **presence republisher** use-case that reacts to confidence
//!   changes and publishes corrected presence
//!
//! ## Dependency rule
//! Depends on `minipresence-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod state_store;
