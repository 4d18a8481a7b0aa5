//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp recorded whenever an entity state is written.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
