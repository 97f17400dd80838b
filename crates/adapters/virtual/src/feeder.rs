//! In-memory feeder state machine.

use std::time::Instant;

use feederdash_domain::config::{AdvancedSettings, FeederConfig, ScheduleSettings};
use feederdash_domain::reply::Ack;
use feederdash_domain::status::{
    FeedingStatus, ScheduleStatus, SensorStatus, StatusSnapshot, SystemStatus,
};

/// Progress added by every status read while a feeding runs.
pub const PROGRESS_STEP: f64 = 25.0;

/// Number of compartments on the carousel.
pub const COMPARTMENTS: i32 = 4;

/// JFIF header followed by end-of-image; stands in for a camera frame.
pub const FRAME: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

const FREE_HEAP: u64 = 187_392;
const WIFI: &str = "-58 dBm";

/// Feeding cycle stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    SoundAlert,
    MovingCarousel,
    Dispensing,
    Returning,
    Complete,
}

impl Stage {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::SoundAlert => "Sound alert",
            Self::MovingCarousel => "Moving carousel",
            Self::Dispensing => "Dispensing food",
            Self::Returning => "Returning",
            Self::Complete => "Complete",
        }
    }

    fn for_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            Self::Complete
        } else if progress >= 75.0 {
            Self::Returning
        } else if progress >= 50.0 {
            Self::Dispensing
        } else if progress >= 25.0 {
            Self::MovingCarousel
        } else {
            Self::SoundAlert
        }
    }
}

/// Simulated feeder.
///
/// Every status read is one simulation step: a running feeding advances by
/// [`PROGRESS_STEP`] and, one read after reaching 100 %, returns to idle and
/// counts towards today's total.
#[derive(Debug)]
pub struct VirtualFeeder {
    stage: Stage,
    progress: f64,
    compartment: i32,
    today_count: u32,
    config: FeederConfig,
    sensors: SensorStatus,
    camera_enabled: bool,
    booted_at: Instant,
}

impl Default for VirtualFeeder {
    fn default() -> Self {
        Self {
            stage: Stage::Idle,
            progress: 0.0,
            compartment: 0,
            today_count: 0,
            config: FeederConfig::default(),
            sensors: SensorStatus {
                valid: true,
                temperature: Some(22.5),
                humidity: Some(45.0),
                presence: false,
            },
            camera_enabled: true,
            booted_at: Instant::now(),
        }
    }
}

impl VirtualFeeder {
    /// Enable or disable the simulated camera.
    #[must_use]
    pub fn with_camera(mut self, enabled: bool) -> Self {
        self.camera_enabled = enabled;
        self
    }

    /// Override the simulated sensor readings.
    #[must_use]
    pub fn with_sensors(mut self, sensors: SensorStatus) -> Self {
        self.sensors = sensors;
        self
    }

    /// Start with a given configuration.
    #[must_use]
    pub fn with_config(mut self, config: FeederConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn today_count(&self) -> u32 {
        self.today_count
    }

    #[must_use]
    pub fn config(&self) -> &FeederConfig {
        &self.config
    }

    /// Read the status, advancing the simulation by one step.
    pub fn status(&mut self) -> StatusSnapshot {
        self.step();
        self.snapshot()
    }

    fn step(&mut self) {
        match self.stage {
            Stage::Idle => {}
            Stage::Complete => {
                self.stage = Stage::Idle;
                self.progress = 0.0;
                self.today_count += 1;
                self.compartment = (self.compartment + 1) % COMPARTMENTS;
            }
            _ => {
                self.progress = (self.progress + PROGRESS_STEP).min(100.0);
                self.stage = Stage::for_progress(self.progress);
            }
        }
    }

    fn snapshot(&self) -> StatusSnapshot {
        let uptime = u64::try_from(self.booted_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        StatusSnapshot {
            feeding: FeedingStatus {
                state: self.stage.label().to_string(),
                compartment: self.compartment,
                progress: self.progress,
                in_progress: self.stage != Stage::Idle,
            },
            sensors: self.sensors.clone(),
            schedule: ScheduleStatus {
                next_feeding: self.next_feeding(),
                today_count: self.today_count,
                max_per_day: u32::try_from(self.config.portions_per_day).unwrap_or(0),
            },
            system: SystemStatus {
                wifi: WIFI.to_string(),
                free_heap: FREE_HEAP,
                uptime,
            },
        }
    }

    fn next_feeding(&self) -> String {
        if self.config.auto_enabled {
            format!("In {}h", self.config.feeding_interval)
        } else {
            "Manual only".to_string()
        }
    }

    /// Start a manual feeding.
    pub fn feed_now(&mut self) -> Ack {
        if self.stage != Stage::Idle {
            return Ack::declined("Feeding already in progress");
        }
        self.stage = Stage::SoundAlert;
        self.progress = 0.0;
        Ack::ok("Feeding started")
    }

    /// Abort any feeding in progress. Always succeeds.
    pub fn cancel(&mut self) -> Ack {
        self.stage = Stage::Idle;
        self.progress = 0.0;
        Ack::ok("Feeding cancelled")
    }

    pub fn save_schedule(&mut self, settings: ScheduleSettings) -> Ack {
        if settings.feeding_interval <= 0 || settings.portions_per_day <= 0 {
            return Ack::declined("Interval and portions must be positive");
        }
        self.config.apply_schedule(settings);
        Ack::ok("Configuration saved")
    }

    pub fn save_advanced(&mut self, settings: AdvancedSettings) -> Ack {
        self.config.apply_advanced(settings);
        Ack::ok("Advanced configuration saved")
    }

    pub fn reset_daily(&mut self) -> Ack {
        self.today_count = 0;
        Ack::ok("Counter reset")
    }

    /// Restart: any feeding is dropped and uptime starts over.
    pub fn reboot(&mut self) -> Ack {
        self.stage = Stage::Idle;
        self.progress = 0.0;
        self.booted_at = Instant::now();
        Ack::ok("Rebooting...")
    }

    /// One camera frame, or `None` when the camera is disabled.
    #[must_use]
    pub fn frame(&self) -> Option<&'static [u8]> {
        self.camera_enabled.then_some(FRAME)
    }
}
