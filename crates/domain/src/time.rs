//! Time and timestamp helpers.

use chrono::{DateTime, Local, NaiveTime, Utc};

/// UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Milliseconds since the Unix epoch, appended to camera URLs so that no
/// cache between the dashboard and the device serves a stale frame.
#[must_use]
pub fn cache_buster() -> i64 {
    now().timestamp_millis()
}

/// Local wall-clock time, used for the "last update" label.
#[must_use]
pub fn local_time_of_day() -> NaiveTime {
    Local::now().time()
}
