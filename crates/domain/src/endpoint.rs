//! Fixed REST surface exposed by the feeder.
//!
//! | Path | Method |
//! |------|--------|
//! | `/api/status` | GET |
//! | `/api/feed/now` | POST |
//! | `/api/feed/cancel` | POST |
//! | `/api/config` | GET |
//! | `/api/config/schedule` | POST |
//! | `/api/config/advanced` | POST |
//! | `/api/system/reset-daily` | POST |
//! | `/api/system/reboot` | POST |
//! | `/camera/stream?<ts>` | GET |
//! | `/camera/capture?<ts>` | GET |

pub const STATUS: &str = "/api/status";
pub const FEED_NOW: &str = "/api/feed/now";
pub const FEED_CANCEL: &str = "/api/feed/cancel";
pub const CONFIG: &str = "/api/config";
pub const CONFIG_SCHEDULE: &str = "/api/config/schedule";
pub const CONFIG_ADVANCED: &str = "/api/config/advanced";
pub const RESET_DAILY: &str = "/api/system/reset-daily";
pub const REBOOT: &str = "/api/system/reboot";
pub const CAMERA_STREAM: &str = "/camera/stream";
pub const CAMERA_CAPTURE: &str = "/camera/capture";

/// The two camera endpoints. Both return raw image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraShot {
    /// Re-fetchable single frame standing in for live video.
    Stream,
    /// One-off photo capture.
    Capture,
}

impl CameraShot {
    /// Path without the cache-busting query.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Stream => CAMERA_STREAM,
            Self::Capture => CAMERA_CAPTURE,
        }
    }

    /// Path with the `?<timestamp>` query appended.
    #[must_use]
    pub fn url(self, cache_buster: i64) -> String {
        format!("{}?{cache_buster}", self.path())
    }
}
