//! Status snapshot — the full payload returned by one `/api/status` poll.
//!
//! A snapshot is transient: it is decoded, applied to the view model, and
//! dropped. Nothing here is persisted client-side.

use serde::{Deserialize, Serialize};

/// Feeding cycle progress as reported by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingStatus {
    /// Human-readable state label (device-defined, e.g. `"Idle"`, `"Dispensing"`).
    pub state: String,
    /// Carousel compartment currently aligned with the outlet.
    pub compartment: i32,
    /// Cycle progress, 0–100.
    pub progress: f64,
    /// Whether a feeding cycle is running. The only source of the
    /// idle / in-progress distinction; never computed locally.
    pub in_progress: bool,
}

/// Environment sensor readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorStatus {
    /// Whether the temperature/humidity reading is trustworthy.
    pub valid: bool,
    /// Degrees Celsius. The device reports `null` for a failed read.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity in percent. `null` for a failed read.
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Whether the presence sensor currently detects the pet.
    pub presence: bool,
}

/// Schedule summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatus {
    /// Device-formatted label for the next scheduled feeding.
    pub next_feeding: String,
    /// Feedings completed today.
    pub today_count: u32,
    /// Configured maximum feedings per day.
    pub max_per_day: u32,
}

/// Device health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    /// Wi-Fi status label (e.g. `"-61 dBm"`).
    pub wifi: String,
    /// Free heap in bytes.
    pub free_heap: u64,
    /// Milliseconds since the device booted.
    pub uptime: u64,
}

/// One complete status poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub feeding: FeedingStatus,
    pub sensors: SensorStatus,
    pub schedule: ScheduleStatus,
    pub system: SystemStatus,
}
