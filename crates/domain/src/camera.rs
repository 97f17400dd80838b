//! Camera panel state.
//!
//! Two independent mechanisms feed one image slot:
//!
//! - the **stream**: a cache-busted URL refreshed on demand. Refreshing arms an
//!   error handler; if the image then fails to load, the handler swaps in an
//!   inline placeholder and raises a toast. The next successful load (the
//!   placeholder itself, or a later frame) disarms it.
//! - the **capture**: a one-off photo fetched by the client and shown through a
//!   local handle (a blob URL in the browser, a file path natively).

use crate::endpoint::CameraShot;
use crate::toast::Toast;

pub const CAMERA_UNAVAILABLE: &str = "Camera unavailable";
pub const CAPTURING: &str = "Capturing photo\u{2026}";
pub const CAPTURED: &str = "Photo captured";
pub const CAPTURE_FAILED: &str = "Error capturing photo";

/// Inline SVG shown when the stream cannot be loaded.
pub const PLACEHOLDER_SRC: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='640' height='480'%3E%3Crect width='640' height='480' fill='%23f0f0f0'/%3E%3Ctext x='50%25' y='50%25' text-anchor='middle' fill='%23999' font-size='20'%3ECamera unavailable%3C/text%3E%3C/svg%3E";

/// What the image slot currently points at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CameraSource {
    /// Nothing requested yet.
    #[default]
    Empty,
    /// A stream frame URL, including its cache buster.
    Stream(String),
    /// The inline "unavailable" graphic.
    Placeholder,
    /// A captured photo, addressed by its local handle.
    Captured(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CameraPanel {
    source: CameraSource,
    error_handler_armed: bool,
}

impl CameraPanel {
    #[must_use]
    pub fn source(&self) -> &CameraSource {
        &self.source
    }

    /// Value for the image element's `src`.
    #[must_use]
    pub fn src(&self) -> &str {
        match &self.source {
            CameraSource::Empty => "",
            CameraSource::Stream(url) | CameraSource::Captured(url) => url,
            CameraSource::Placeholder => PLACEHOLDER_SRC,
        }
    }

    #[must_use]
    pub fn is_error_handler_armed(&self) -> bool {
        self.error_handler_armed
    }

    /// Point the slot at a fresh stream frame and arm the error handler.
    /// Returns the URL to load.
    pub fn refresh_stream(&mut self, cache_buster: i64) -> &str {
        self.source = CameraSource::Stream(CameraShot::Stream.url(cache_buster));
        self.error_handler_armed = true;
        self.src()
    }

    /// The image failed to load.
    ///
    /// With the handler armed, swaps in the placeholder and returns the toast
    /// to show. Without it, nothing changes.
    pub fn load_failed(&mut self) -> Option<Toast> {
        if !self.error_handler_armed {
            return None;
        }
        self.source = CameraSource::Placeholder;
        Some(Toast::error(CAMERA_UNAVAILABLE))
    }

    /// The image loaded; the error handler clears itself.
    pub fn loaded(&mut self) {
        self.error_handler_armed = false;
    }

    /// Show a captured photo.
    pub fn show_capture(&mut self, handle: impl Into<String>) {
        self.source = CameraSource::Captured(handle.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_empty_and_disarmed() {
        let panel = CameraPanel::default();
        assert_eq!(panel.source(), &CameraSource::Empty);
        assert_eq!(panel.src(), "");
        assert!(!panel.is_error_handler_armed());
    }

    #[test]
    fn should_arm_handler_on_refresh() {
        let mut panel = CameraPanel::default();
        let url = panel.refresh_stream(1234).to_string();
        assert_eq!(url, "/camera/stream?1234");
        assert!(panel.is_error_handler_armed());
    }

    #[test]
    fn should_swap_placeholder_and_toast_when_armed_load_fails() {
        let mut panel = CameraPanel::default();
        panel.refresh_stream(1);

        let toast = panel.load_failed().unwrap();
        assert!(toast.is_error());
        assert_eq!(toast.text, "Camera unavailable");
        assert_eq!(panel.source(), &CameraSource::Placeholder);
        assert_eq!(panel.src(), PLACEHOLDER_SRC);
    }

    #[test]
    fn should_ignore_failures_once_handler_cleared() {
        let mut panel = CameraPanel::default();
        panel.refresh_stream(1);
        panel.loaded();

        assert!(panel.load_failed().is_none());
        assert_eq!(panel.src(), "/camera/stream?1");
    }

    #[test]
    fn should_disarm_after_placeholder_loads() {
        let mut panel = CameraPanel::default();
        panel.refresh_stream(1);
        panel.load_failed();
        panel.loaded();
        assert!(!panel.is_error_handler_armed());
    }

    #[test]
    fn should_rearm_on_every_refresh() {
        let mut panel = CameraPanel::default();
        panel.refresh_stream(1);
        panel.loaded();
        panel.refresh_stream(2);
        assert!(panel.is_error_handler_armed());
        assert_eq!(panel.src(), "/camera/stream?2");
    }

    #[test]
    fn should_show_captured_photo_handle() {
        let mut panel = CameraPanel::default();
        panel.show_capture("blob:http://feeder.local/abc");
        assert_eq!(
            panel.source(),
            &CameraSource::Captured("blob:http://feeder.local/abc".to_string())
        );
        assert_eq!(panel.src(), "blob:http://feeder.local/abc");
    }
}
