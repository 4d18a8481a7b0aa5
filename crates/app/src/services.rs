//! Application services (use-cases).

pub mod presence_republisher;
