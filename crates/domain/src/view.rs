//! Dashboard view model.
//!
//! A typed stand-in for the page's display elements. Front-ends render these
//! fields; they never look anything up by element id.

use chrono::NaiveTime;

use crate::camera::CameraPanel;
use crate::connection::ConnectionState;
use crate::format;
use crate::status::StatusSnapshot;

/// Text shown in every field before the first snapshot arrives.
pub const PLACEHOLDER: &str = "--";

/// Everything the dashboard displays.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub feeding_state: String,
    pub compartment: String,
    /// CSS width of the progress bar.
    pub progress_width: String,
    pub progress_text: String,
    pub feed_now_enabled: bool,
    pub cancel_enabled: bool,
    pub temperature: String,
    pub humidity: String,
    pub presence: String,
    pub next_feeding: String,
    pub feedings_today: String,
    pub wifi: String,
    pub free_heap: String,
    pub uptime: String,
    pub last_update: String,
    pub connection: ConnectionState,
    pub camera: CameraPanel,
}

impl Default for DashboardView {
    fn default() -> Self {
        let placeholder = || PLACEHOLDER.to_string();
        Self {
            feeding_state: placeholder(),
            compartment: placeholder(),
            progress_width: format::progress_width(0.0),
            progress_text: format::format_progress(0.0),
            feed_now_enabled: true,
            cancel_enabled: false,
            temperature: placeholder(),
            humidity: placeholder(),
            presence: placeholder(),
            next_feeding: placeholder(),
            feedings_today: placeholder(),
            wifi: placeholder(),
            free_heap: placeholder(),
            uptime: placeholder(),
            last_update: placeholder(),
            connection: ConnectionState::Disconnected,
            camera: CameraPanel::default(),
        }
    }
}

impl DashboardView {
    /// Replace every snapshot-backed field and mark the view connected.
    ///
    /// Temperature and humidity are only replaced when the sensor reading is
    /// valid; an invalid reading keeps the last good values on screen.
    pub fn apply_snapshot(&mut self, snapshot: &StatusSnapshot, updated_at: NaiveTime) {
        let feeding = &snapshot.feeding;
        self.feeding_state.clone_from(&feeding.state);
        self.compartment = feeding.compartment.to_string();
        self.progress_width = format::progress_width(feeding.progress);
        self.progress_text = format::format_progress(feeding.progress);
        self.feed_now_enabled = !feeding.in_progress;
        self.cancel_enabled = feeding.in_progress;

        let sensors = &snapshot.sensors;
        if sensors.valid {
            if let Some(celsius) = sensors.temperature {
                self.temperature = format::format_temperature(celsius);
            }
            if let Some(percent) = sensors.humidity {
                self.humidity = format::format_humidity(percent);
            }
        }
        self.presence = format::presence_label(sensors.presence).to_string();

        let schedule = &snapshot.schedule;
        self.next_feeding.clone_from(&schedule.next_feeding);
        self.feedings_today =
            format::format_feedings_today(schedule.today_count, schedule.max_per_day);

        let system = &snapshot.system;
        self.wifi.clone_from(&system.wifi);
        self.free_heap = format::format_free_heap(system.free_heap);
        self.uptime = format::format_uptime(system.uptime);

        self.last_update = format::format_clock(updated_at);
        self.connection = ConnectionState::Connected;
    }

    /// Flip the connectivity indicator. Returns whether it changed.
    pub fn set_connection(&mut self, state: ConnectionState) -> bool {
        if self.connection == state {
            return false;
        }
        self.connection = state;
        true
    }

    /// Whether a feeding cycle is running according to the latest snapshot.
    #[must_use]
    pub fn feeding_in_progress(&self) -> bool {
        self.cancel_enabled
    }
}
