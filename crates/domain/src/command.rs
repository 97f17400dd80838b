//! Commands — one-shot actions forwarded to the feeder.
//!
//! | Command | Endpoint | Confirmation |
//! |---------|----------|--------------|
//! | `FeedNow` | `POST /api/feed/now` | yes |
//! | `CancelFeeding` | `POST /api/feed/cancel` | yes |
//! | `ResetDaily` | `POST /api/system/reset-daily` | yes |
//! | `Reboot` | `POST /api/system/reboot` | yes |
//!
//! Configuration saves and photo capture are not commands: they carry a body
//! or return bytes, and have their own feedback texts.

use std::time::Duration;

use crate::endpoint;
use crate::reply::Ack;
use crate::toast::Toast;

/// Delay after a reboot request before the indicator is forced to disconnected.
pub const REBOOT_DISCONNECT_AFTER: Duration = Duration::from_secs(2);

/// Delay after a reboot request before the dashboard reloads.
pub const REBOOT_RELOAD_AFTER: Duration = Duration::from_secs(15);

pub const REBOOTING: &str = "Rebooting system\u{2026}";
pub const CONFIG_SAVED: &str = "Configuration saved";
pub const CONFIG_SAVE_FAILED: &str = "Error saving configuration";

/// A body-less POST command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FeedNow,
    CancelFeeding,
    ResetDaily,
    Reboot,
}

impl Command {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::FeedNow => endpoint::FEED_NOW,
            Self::CancelFeeding => endpoint::FEED_CANCEL,
            Self::ResetDaily => endpoint::RESET_DAILY,
            Self::Reboot => endpoint::REBOOT,
        }
    }

    /// Question the front-end asks before sending.
    #[must_use]
    pub fn confirmation(self) -> &'static str {
        match self {
            Self::FeedNow => "Start a manual feeding now?",
            Self::CancelFeeding => "Cancel the feeding in progress?",
            Self::ResetDaily => "Reset the daily feeding counter?",
            Self::Reboot => "Reboot the feeder? This takes 10-20 seconds.",
        }
    }

    #[must_use]
    pub fn success_text(self) -> &'static str {
        match self {
            Self::FeedNow => "Feeding started",
            Self::CancelFeeding => "Feeding cancelled",
            Self::ResetDaily => "Daily counter reset",
            Self::Reboot => REBOOTING,
        }
    }

    /// Fallback used when a declined reply carries no message.
    #[must_use]
    pub fn failure_text(self) -> &'static str {
        match self {
            Self::FeedNow => "feeding could not start",
            Self::CancelFeeding => "could not cancel feeding",
            Self::ResetDaily => "could not reset counter",
            Self::Reboot => "reboot was refused",
        }
    }

    /// Toast derived from the device's acknowledgement.
    #[must_use]
    pub fn outcome_toast(self, ack: &Ack) -> Toast {
        if ack.success {
            Toast::success(self.success_text())
        } else {
            let reason = ack.message.as_deref().unwrap_or(self.failure_text());
            Toast::error(format!("Error: {reason}"))
        }
    }
}

/// Toast for either configuration group save.
#[must_use]
pub fn config_saved_toast(ack: &Ack) -> Toast {
    if ack.success {
        Toast::success(CONFIG_SAVED)
    } else {
        Toast::error(CONFIG_SAVE_FAILED)
    }
}
