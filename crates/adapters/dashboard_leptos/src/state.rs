//! Reactive dashboard state and the actions that mutate it.
//!
//! One [`DashboardState`] lives in context for the whole page. The poll loop
//! and every user action write into its signals; components only read them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use feederdash_domain::camera::{CAPTURE_FAILED, CAPTURED, CAPTURING, CameraSource};
use feederdash_domain::command::{self, Command, REBOOTING};
use feederdash_domain::config::ConfigForm;
use feederdash_domain::connection::ConnectionState;
use feederdash_domain::endpoint::CameraShot;
use feederdash_domain::reply::Ack;
use feederdash_domain::time;
use feederdash_domain::toast::Toast;
use feederdash_domain::view::DashboardView;
use gloo_timers::future::TimeoutFuture;
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::ToastProvider;

pub const POLL_INTERVAL_MS: u32 = 2_000;

fn millis(duration: std::time::Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Wait left before the next poll so polls start [`POLL_INTERVAL_MS`] apart.
/// A poll that overran the interval is followed by the next one at once.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn delay_after_poll(elapsed_ms: f64) -> u32 {
    (f64::from(POLL_INTERVAL_MS) - elapsed_ms).clamp(0.0, f64::from(POLL_INTERVAL_MS)) as u32
}

/// Identifies the poll loop allowed to run. Starting or stopping bumps the
/// generation, so an older loop still waiting on its timer exits when it
/// wakes up.
#[derive(Clone, Default)]
struct PollGeneration(Arc<AtomicU64>);

impl PollGeneration {
    fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn stop(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}

#[derive(Clone)]
pub struct DashboardState {
    pub view: RwSignal<DashboardView>,
    pub form: RwSignal<ConfigForm>,
    toasts: ToastProvider,
    polling: PollGeneration,
}

impl DashboardState {
    pub fn new(toasts: ToastProvider) -> Self {
        Self {
            view: RwSignal::new(DashboardView::default()),
            form: RwSignal::new(ConfigForm::default()),
            toasts,
            polling: PollGeneration::default(),
        }
    }

    /// Poll now, then every [`POLL_INTERVAL_MS`] measured from the start of
    /// each poll. Polls never overlap. Replaces any loop already running.
    pub fn start_polling(&self) {
        let generation = self.polling.begin();
        let state = self.clone();
        spawn_local(async move {
            while state.polling.is_current(generation) {
                let started = js_sys::Date::now();
                state.poll_once().await;
                let elapsed = js_sys::Date::now() - started;
                TimeoutFuture::new(delay_after_poll(elapsed)).await;
            }
        });
    }

    pub fn stop_polling(&self) {
        self.polling.stop();
    }

    pub async fn poll_once(&self) {
        match api::fetch_status().await {
            Ok(Some(snapshot)) => self
                .view
                .update(|view| view.apply_snapshot(&snapshot, time::local_time_of_day())),
            Ok(None) => {}
            Err(err) => {
                warn!("status poll failed: {err}");
                self.mark_disconnected();
            }
        }
    }

    fn mark_disconnected(&self) {
        if self.view.with_untracked(|view| view.connection.is_connected()) {
            self.view.update(|view| {
                view.set_connection(ConnectionState::Disconnected);
            });
        }
    }

    pub async fn load_configuration(&self) {
        match api::fetch_config().await {
            Ok(Some(config)) => self.form.update(|form| form.load(&config)),
            Ok(None) => warn!("feeder declined to return its configuration"),
            Err(err) => warn!("config load failed: {err}"),
        }
    }

    /// Ask, send and toast a body-less command. Reboot goes through
    /// [`Self::reboot`].
    pub async fn run_command(&self, command: Command) {
        if command == Command::Reboot {
            self.reboot().await;
            return;
        }
        if !confirm(command.confirmation()) {
            return;
        }
        match api::send_command(command).await {
            Ok(ack) => {
                self.toasts.show(command.outcome_toast(&ack));
                if ack.success && command == Command::ResetDaily {
                    self.poll_once().await;
                }
            }
            Err(err) => {
                warn!("{command:?} failed: {err}");
                self.toasts.show(Toast::connection_error());
            }
        }
    }

    pub async fn save_schedule(&self) {
        let settings = match self.form.with_untracked(ConfigForm::schedule_settings) {
            Ok(settings) => settings,
            Err(err) => {
                self.toasts.show(Toast::error(format!("Error: {err}")));
                return;
            }
        };
        self.report_save(api::save_schedule(&settings).await);
    }

    pub async fn save_advanced(&self) {
        let settings = self.form.with_untracked(ConfigForm::advanced_settings);
        self.report_save(api::save_advanced(&settings).await);
    }

    fn report_save(&self, result: Result<Ack, api::ApiError>) {
        match result {
            Ok(ack) => self.toasts.show(command::config_saved_toast(&ack)),
            Err(err) => {
                warn!("config save failed: {err}");
                self.toasts.show(Toast::connection_error());
            }
        }
    }

    /// Reboot the feeder. Whatever it answers, the indicator goes
    /// disconnected after two seconds and the page reloads after fifteen.
    pub async fn reboot(&self) {
        if !confirm(Command::Reboot.confirmation()) {
            return;
        }
        if let Err(err) = api::reboot().await {
            warn!("reboot request failed: {err}");
            self.toasts.show(Toast::connection_error());
            return;
        }
        self.toasts.show(Toast::success(REBOOTING));

        let view = self.view;
        spawn_local(async move {
            TimeoutFuture::new(millis(command::REBOOT_DISCONNECT_AFTER)).await;
            view.update(|view| {
                view.set_connection(ConnectionState::Disconnected);
            });
        });
        spawn_local(async move {
            TimeoutFuture::new(millis(command::REBOOT_RELOAD_AFTER)).await;
            if let Err(err) = window().location().reload() {
                warn!("page reload failed: {err:?}");
            }
        });
    }

    /// Point the camera at a fresh stream frame.
    pub fn refresh_camera(&self) {
        self.view.update(|view| {
            view.camera.refresh_stream(time::cache_buster());
        });
    }

    /// Bound to the image's `error` event.
    pub fn camera_failed(&self) {
        let toast = self
            .view
            .try_update(|view| view.camera.load_failed())
            .flatten();
        if let Some(toast) = toast {
            self.toasts.show(toast);
        }
    }

    /// Bound to the image's `load` event.
    pub fn camera_loaded(&self) {
        if self.view.with_untracked(|view| view.camera.is_error_handler_armed()) {
            self.view.update(|view| view.camera.loaded());
        }
    }

    pub async fn capture_photo(&self) {
        self.toasts.show(Toast::success(CAPTURING));
        let bytes = match api::fetch_image(CameraShot::Capture, time::cache_buster()).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("capture failed: {err}");
                self.toasts.show(Toast::error(CAPTURE_FAILED));
                return;
            }
        };
        let url = match blob_url(&bytes) {
            Ok(url) => url,
            Err(err) => {
                warn!("could not display capture: {err:?}");
                self.toasts.show(Toast::error(CAPTURE_FAILED));
                return;
            }
        };
        let previous = self.view.with_untracked(|view| view.camera.source().clone());
        if let CameraSource::Captured(old) = previous {
            let _ = web_sys::Url::revoke_object_url(&old);
        }
        self.view.update(|view| view.camera.show_capture(url));
        self.toasts.show(Toast::success(CAPTURED));
    }
}

fn confirm(question: &str) -> bool {
    window().confirm_with_message(question).unwrap_or(false)
}

fn blob_url(bytes: &[u8]) -> Result<String, wasm_bindgen::JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/jpeg");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    web_sys::Url::create_object_url_with_blob(&blob)
}

/// Access the dashboard state from Leptos context.
///
/// Must be called below the [`Dashboard`](crate::pages::Dashboard) page.
pub fn use_dashboard() -> DashboardState {
    use_context::<DashboardState>().expect("DashboardState not found in context")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wait_out_the_rest_of_the_interval() {
        assert_eq!(delay_after_poll(0.0), 2_000);
        assert_eq!(delay_after_poll(350.0), 1_650);
    }

    #[test]
    fn should_poll_again_at_once_after_an_overrun() {
        assert_eq!(delay_after_poll(2_000.0), 0);
        assert_eq!(delay_after_poll(5_300.0), 0);
    }

    #[test]
    fn should_retire_loop_when_stopped_then_restarted() {
        let polling = PollGeneration::default();
        let first = polling.begin();

        polling.stop();
        let second = polling.begin();

        assert!(!polling.is_current(first));
        assert!(polling.is_current(second));
    }

    #[test]
    fn should_retire_loop_when_stopped() {
        let polling = PollGeneration::default();
        let generation = polling.begin();

        polling.stop();

        assert!(!polling.is_current(generation));
    }
}
