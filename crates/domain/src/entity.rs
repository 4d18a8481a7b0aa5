//! Entities — named state holders owned by the home-automation host.
//!
//! The bridge never owns entities; it only reads their latest value and
//! reacts to notifications that the value changed.

mod key;
mod state;

pub use key::EntityKey;
pub use state::{EntityState, StateChanged};
