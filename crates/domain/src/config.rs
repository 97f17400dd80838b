//! Feeder configuration and the editable config form.
//!
//! The device is the source of truth. The form mirrors it once at startup and
//! writes back in two groups that are never merged:
//!
//! | Group | Endpoint | Fields |
//! |-------|----------|--------|
//! | schedule | `/api/config/schedule` | `autoEnabled`, `feedingInterval`, `portionsPerDay` |
//! | advanced | `/api/config/advanced` | `requirePresence`, `playSound`, `tempAlerts`, `humidityAlerts` |

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Full configuration as returned by `GET /api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeederConfig {
    pub auto_enabled: bool,
    /// Hours between automatic feedings.
    pub feeding_interval: i32,
    pub portions_per_day: i32,
    pub require_presence: bool,
    pub play_sound: bool,
    pub temp_alerts: bool,
    pub humidity_alerts: bool,
}

impl FeederConfig {
    /// The schedule group of this configuration.
    #[must_use]
    pub fn schedule(&self) -> ScheduleSettings {
        ScheduleSettings {
            auto_enabled: self.auto_enabled,
            feeding_interval: self.feeding_interval,
            portions_per_day: self.portions_per_day,
        }
    }

    /// The advanced group of this configuration.
    #[must_use]
    pub fn advanced(&self) -> AdvancedSettings {
        AdvancedSettings {
            require_presence: self.require_presence,
            play_sound: self.play_sound,
            temp_alerts: self.temp_alerts,
            humidity_alerts: self.humidity_alerts,
        }
    }

    /// Overwrite the schedule group, leaving the advanced group untouched.
    pub fn apply_schedule(&mut self, settings: ScheduleSettings) {
        self.auto_enabled = settings.auto_enabled;
        self.feeding_interval = settings.feeding_interval;
        self.portions_per_day = settings.portions_per_day;
    }

    /// Overwrite the advanced group, leaving the schedule group untouched.
    pub fn apply_advanced(&mut self, settings: AdvancedSettings) {
        self.require_presence = settings.require_presence;
        self.play_sound = settings.play_sound;
        self.temp_alerts = settings.temp_alerts;
        self.humidity_alerts = settings.humidity_alerts;
    }
}

impl Default for FeederConfig {
    /// Factory defaults of the device.
    fn default() -> Self {
        Self {
            auto_enabled: true,
            feeding_interval: 4,
            portions_per_day: 4,
            require_presence: true,
            play_sound: true,
            temp_alerts: true,
            humidity_alerts: true,
        }
    }
}

/// Body of `POST /api/config/schedule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSettings {
    pub auto_enabled: bool,
    pub feeding_interval: i32,
    pub portions_per_day: i32,
}

/// Body of `POST /api/config/advanced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettings {
    pub require_presence: bool,
    pub play_sound: bool,
    pub temp_alerts: bool,
    pub humidity_alerts: bool,
}

/// Local, editable mirror of the device configuration.
///
/// Integer fields are kept as the raw text a form input holds and only parsed
/// when their group is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigForm {
    pub auto_enabled: bool,
    pub feeding_interval: String,
    pub portions_per_day: String,
    pub require_presence: bool,
    pub play_sound: bool,
    pub temp_alerts: bool,
    pub humidity_alerts: bool,
}

impl ConfigForm {
    /// Populate every field from the device configuration.
    pub fn load(&mut self, config: &FeederConfig) {
        *self = Self::from(config);
    }

    /// Parse the schedule group for submission.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAnInteger`] if either integer field does
    /// not parse.
    pub fn schedule_settings(&self) -> Result<ScheduleSettings, ValidationError> {
        Ok(ScheduleSettings {
            auto_enabled: self.auto_enabled,
            feeding_interval: parse_int("feedingInterval", &self.feeding_interval)?,
            portions_per_day: parse_int("portionsPerDay", &self.portions_per_day)?,
        })
    }

    /// Collect the advanced group for submission. Booleans cannot be invalid.
    #[must_use]
    pub fn advanced_settings(&self) -> AdvancedSettings {
        AdvancedSettings {
            require_presence: self.require_presence,
            play_sound: self.play_sound,
            temp_alerts: self.temp_alerts,
            humidity_alerts: self.humidity_alerts,
        }
    }
}

impl From<&FeederConfig> for ConfigForm {
    fn from(config: &FeederConfig) -> Self {
        Self {
            auto_enabled: config.auto_enabled,
            feeding_interval: config.feeding_interval.to_string(),
            portions_per_day: config.portions_per_day.to_string(),
            require_presence: config.require_presence,
            play_sound: config.play_sound,
            temp_alerts: config.temp_alerts,
            humidity_alerts: config.humidity_alerts,
        }
    }
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self::from(&FeederConfig::default())
    }
}

fn parse_int(field: &'static str, raw: &str) -> Result<i32, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            value: raw.to_string(),
        })
}
