//! # minipresence-domain
//!
//! Pure domain model for the minipresence bridge.
//!
//! ## Responsibilities
//! - Foundational types: entity keys, error conventions, timestamps
//! - Define **entity states** and the **state change** notifications that
//!   carry them
//! - Define **presence** (`home` / `not_home`) and **confidence** (a parsed
//!   numeric score)
//! - Define **trackers**: the configuration of one confidence → presence
//!   bridge and the threshold rule that decides what to republish
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod confidence;
pub mod entity;
pub mod presence;
pub mod tracker;
