//! Dashboard session — the use-case object behind every front-end.
//!
//! A session owns the view model, the config form, the toast channel and the
//! poll task. Front-ends observe it through [`DashboardSession::subscribe_view`]
//! and [`DashboardSession::subscribe_toasts`] and drive it by calling the
//! action methods.
//!
//! Polls are strictly sequential: the loop awaits each poll before waiting for
//! the next tick, so results always apply in request order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use feederdash_domain::camera::{CAPTURE_FAILED, CAPTURED, CAPTURING};
use feederdash_domain::command::{
    self, Command, REBOOT_DISCONNECT_AFTER, REBOOT_RELOAD_AFTER, REBOOTING,
};
use feederdash_domain::config::ConfigForm;
use feederdash_domain::connection::ConnectionState;
use feederdash_domain::endpoint::CameraShot;
use feederdash_domain::error::FeederError;
use feederdash_domain::reply::Ack;
use feederdash_domain::time;
use feederdash_domain::toast::Toast;
use feederdash_domain::view::DashboardView;

use crate::ports::{FeederApi, PhotoStore};

/// Default cadence of the status poll.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

const TOAST_CAPACITY: usize = 32;

/// Timing knobs of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Delay between the start of two consecutive polls.
    pub poll_interval: Duration,
    /// After a reboot request, when to force the indicator to disconnected.
    pub reboot_disconnect_after: Duration,
    /// After a reboot request, when to reload the dashboard.
    pub reboot_reload_after: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            reboot_disconnect_after: REBOOT_DISCONNECT_AFTER,
            reboot_reload_after: REBOOT_RELOAD_AFTER,
        }
    }
}

/// What one status poll did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A fresh snapshot replaced the display; indicator connected.
    Updated,
    /// The device answered `success: false`; nothing changed.
    Declined,
    /// No usable answer; display kept, indicator disconnected.
    Failed,
}

/// A running dashboard bound to one feeder.
pub struct DashboardSession<A, P> {
    inner: Arc<Inner<A, P>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
    deferred: Mutex<Vec<JoinHandle<()>>>,
}

struct Inner<A, P> {
    api: A,
    photos: P,
    settings: SessionSettings,
    view: watch::Sender<DashboardView>,
    toasts: broadcast::Sender<Toast>,
    form: Mutex<ConfigForm>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A, P> DashboardSession<A, P>
where
    A: FeederApi + 'static,
    P: PhotoStore + 'static,
{
    /// Create an idle session. Nothing is requested until [`start`](Self::start).
    pub fn new(api: A, photos: P, settings: SessionSettings) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        let (toasts, _) = broadcast::channel(TOAST_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                api,
                photos,
                settings,
                view,
                toasts,
                form: Mutex::new(ConfigForm::default()),
            }),
            poll_task: Mutex::new(None),
            deferred: Mutex::new(Vec::new()),
        }
    }

    /// Start polling (first poll immediately) and load the configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(&self) {
        self.start_polling();
        // Failures are logged inside; the form keeps its defaults.
        let _ = self.inner.load_configuration().await;
    }

    /// Spawn the poll loop, replacing any loop already running.
    pub fn start_polling(&self) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.settings.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                inner.poll_once().await;
            }
        });
        if let Some(previous) = lock(&self.poll_task).replace(handle) {
            previous.abort();
        }
        tracing::info!(interval = ?self.inner.settings.poll_interval, "status polling started");
    }

    /// Stop the poll loop and cancel pending reboot effects.
    pub fn stop(&self) {
        if let Some(handle) = lock(&self.poll_task).take() {
            handle.abort();
            tracing::info!("status polling stopped");
        }
        for handle in lock(&self.deferred).drain(..) {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        lock(&self.poll_task)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run one status cycle outside the regular cadence.
    pub async fn poll_once(&self) -> PollOutcome {
        self.inner.poll_once().await
    }

    /// Current view model.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        self.inner.view.borrow().clone()
    }

    /// Observe every change to the view model.
    #[must_use]
    pub fn subscribe_view(&self) -> watch::Receiver<DashboardView> {
        self.inner.view.subscribe()
    }

    /// Receive every toast raised after this call.
    #[must_use]
    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Toast> {
        self.inner.toasts.subscribe()
    }

    /// Current config form contents.
    #[must_use]
    pub fn form(&self) -> ConfigForm {
        lock(&self.inner.form).clone()
    }

    /// Edit the config form in place, as a user would.
    pub fn edit_form(&self, edit: impl FnOnce(&mut ConfigForm)) {
        edit(&mut lock(&self.inner.form));
    }

    /// `GET /api/config` into the form. Failures are logged, never toasted.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode error; the form is left unchanged.
    pub async fn load_configuration(&self) -> Result<(), FeederError> {
        self.inner.load_configuration().await
    }

    /// Save the schedule group of the form.
    ///
    /// # Errors
    ///
    /// Returns [`FeederError::Validation`] without sending anything if an
    /// integer field does not parse, or the transport error if the request
    /// fails. Both are toasted.
    #[tracing::instrument(skip(self))]
    pub async fn save_schedule(&self) -> Result<Ack, FeederError> {
        let parsed = self.form().schedule_settings();
        let settings = match parsed {
            Ok(settings) => settings,
            Err(err) => {
                self.inner.notify(Toast::error(format!("Error: {err}")));
                return Err(err.into());
            }
        };
        let result = self.inner.api.save_schedule(settings).await;
        self.inner.report_save(result)
    }

    /// Save the advanced group of the form.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request fails (also toasted).
    #[tracing::instrument(skip(self))]
    pub async fn save_advanced(&self) -> Result<Ack, FeederError> {
        let settings = self.form().advanced_settings();
        let result = self.inner.api.save_advanced(settings).await;
        self.inner.report_save(result)
    }

    /// Start a manual feeding.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request fails (also toasted).
    pub async fn feed_now(&self) -> Result<Ack, FeederError> {
        self.inner.run_command(Command::FeedNow).await
    }

    /// Cancel the feeding in progress.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request fails (also toasted).
    pub async fn cancel_feeding(&self) -> Result<Ack, FeederError> {
        self.inner.run_command(Command::CancelFeeding).await
    }

    /// Reset the daily feeding counter, then refresh the status at once.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request fails (also toasted).
    pub async fn reset_daily(&self) -> Result<Ack, FeederError> {
        let ack = self.inner.run_command(Command::ResetDaily).await?;
        if ack.success {
            self.inner.poll_once().await;
        }
        Ok(ack)
    }

    /// Ask the feeder to reboot.
    ///
    /// Once the request is answered (whatever the answer), schedules exactly
    /// two effects: the indicator goes disconnected after
    /// [`SessionSettings::reboot_disconnect_after`], and the dashboard
    /// reloads after [`SessionSettings::reboot_reload_after`].
    ///
    /// # Errors
    ///
    /// Returns the transport error if the request never got an answer; no
    /// effect is scheduled in that case.
    #[tracing::instrument(skip(self))]
    pub async fn reboot(&self) -> Result<(), FeederError> {
        if let Err(err) = self.inner.api.reboot().await {
            tracing::warn!(error = %err, "reboot request failed");
            self.inner.notify(Toast::connection_error());
            return Err(err);
        }
        self.inner.notify(Toast::success(REBOOTING));
        self.schedule_reboot_effects();
        Ok(())
    }

    /// Number of deferred reboot effects that have not run yet.
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        lock(&self.deferred)
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Point the camera at a fresh stream frame and try to load it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. When the error handler was armed the
    /// placeholder is shown and a toast raised.
    pub async fn refresh_camera(&self) -> Result<(), FeederError> {
        let cache_buster = time::cache_buster();
        self.inner.view.send_modify(|view| {
            view.camera.refresh_stream(cache_buster);
        });

        match self
            .inner
            .api
            .fetch_image(CameraShot::Stream, cache_buster)
            .await
        {
            Ok(_) => {
                self.inner.view.send_modify(|view| view.camera.loaded());
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "camera stream unavailable");
                let mut toast = None;
                self.inner.view.send_modify(|view| {
                    toast = view.camera.load_failed();
                    // The inline placeholder always loads.
                    view.camera.loaded();
                });
                if let Some(toast) = toast {
                    self.inner.notify(toast);
                }
                Err(err)
            }
        }
    }

    /// Capture one photo, store it, and show it in the camera panel.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (non-2xx included) or the store error. The
    /// camera panel is left untouched and an error toast raised.
    #[tracing::instrument(skip(self))]
    pub async fn capture_photo(&self) -> Result<String, FeederError> {
        self.inner.notify(Toast::success(CAPTURING));
        let taken_at = time::cache_buster();

        let result = async {
            let photo = self
                .inner
                .api
                .fetch_image(CameraShot::Capture, taken_at)
                .await?;
            self.inner.photos.store(photo, taken_at).await
        }
        .await;

        match result {
            Ok(handle) => {
                self.inner
                    .view
                    .send_modify(|view| view.camera.show_capture(handle.clone()));
                self.inner.notify(Toast::success(CAPTURED));
                Ok(handle)
            }
            Err(err) => {
                tracing::warn!(error = %err, "photo capture failed");
                self.inner.notify(Toast::error(CAPTURE_FAILED));
                Err(err)
            }
        }
    }

    /// Start over as a freshly opened dashboard: placeholders, config reload,
    /// one immediate poll.
    pub async fn reload(&self) {
        self.inner.reload().await;
    }

    fn schedule_reboot_effects(&self) {
        let settings = self.inner.settings;

        let inner = Arc::clone(&self.inner);
        let disconnect = tokio::spawn(async move {
            tokio::time::sleep(settings.reboot_disconnect_after).await;
            inner.mark_disconnected();
        });

        let inner = Arc::clone(&self.inner);
        let reload = tokio::spawn(async move {
            tokio::time::sleep(settings.reboot_reload_after).await;
            inner.reload().await;
        });

        let mut deferred = lock(&self.deferred);
        deferred.retain(|handle| !handle.is_finished());
        deferred.push(disconnect);
        deferred.push(reload);
    }
}

impl<A, P> Drop for DashboardSession<A, P> {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.poll_task).take() {
            handle.abort();
        }
        for handle in lock(&self.deferred).drain(..) {
            handle.abort();
        }
    }
}

impl<A, P> Inner<A, P>
where
    A: FeederApi,
    P: PhotoStore,
{
    async fn poll_once(&self) -> PollOutcome {
        match self.api.fetch_status().await {
            Ok(Some(snapshot)) => {
                let updated_at = time::local_time_of_day();
                self.view
                    .send_modify(|view| view.apply_snapshot(&snapshot, updated_at));
                tracing::debug!(
                    state = %snapshot.feeding.state,
                    in_progress = snapshot.feeding.in_progress,
                    "status updated"
                );
                PollOutcome::Updated
            }
            Ok(None) => {
                tracing::debug!("status poll declined by device");
                PollOutcome::Declined
            }
            Err(err) => {
                let changed = self
                    .view
                    .send_if_modified(|view| view.set_connection(ConnectionState::Disconnected));
                if changed {
                    tracing::warn!(error = %err, "lost connection to feeder");
                } else {
                    tracing::debug!(error = %err, "status poll failed");
                }
                PollOutcome::Failed
            }
        }
    }

    fn mark_disconnected(&self) {
        self.view
            .send_if_modified(|view| view.set_connection(ConnectionState::Disconnected));
    }

    async fn load_configuration(&self) -> Result<(), FeederError> {
        match self.api.fetch_config().await {
            Ok(Some(config)) => {
                lock(&self.form).load(&config);
                tracing::debug!(?config, "configuration loaded");
                Ok(())
            }
            Ok(None) => {
                tracing::debug!("configuration request declined by device");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load configuration");
                Err(err)
            }
        }
    }

    async fn reload(&self) {
        tracing::info!("reloading dashboard");
        self.view.send_replace(DashboardView::default());
        *lock(&self.form) = ConfigForm::default();
        let _ = self.load_configuration().await;
        self.poll_once().await;
    }

    #[tracing::instrument(skip(self))]
    async fn run_command(&self, command: Command) -> Result<Ack, FeederError> {
        match self.api.send_command(command).await {
            Ok(ack) => {
                self.notify(command.outcome_toast(&ack));
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(error = %err, "command failed");
                self.notify(Toast::connection_error());
                Err(err)
            }
        }
    }

    fn report_save(&self, result: Result<Ack, FeederError>) -> Result<Ack, FeederError> {
        match result {
            Ok(ack) => {
                self.notify(command::config_saved_toast(&ack));
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save configuration");
                self.notify(Toast::connection_error());
                Err(err)
            }
        }
    }

    fn notify(&self, toast: Toast) {
        tracing::debug!(kind = toast.kind.as_str(), text = %toast.text, "toast");
        // broadcast::send fails only when nobody listens, which is fine.
        let _ = self.toasts.send(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feederdash_domain::config::{AdvancedSettings, FeederConfig, ScheduleSettings};
    use feederdash_domain::status::{
        FeedingStatus, ScheduleStatus, SensorStatus, StatusSnapshot, SystemStatus,
    };
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Status,
        Command(Command),
        Reboot,
        Config,
        Schedule(ScheduleSettings),
        Advanced(AdvancedSettings),
        Image(CameraShot),
    }

    enum Scripted<T> {
        Reply(T),
        Fail,
    }

    #[derive(Default)]
    struct StubApi {
        statuses: Mutex<VecDeque<Scripted<Option<StatusSnapshot>>>>,
        acks: Mutex<VecDeque<Scripted<Ack>>>,
        config: Option<FeederConfig>,
        config_fails: bool,
        image: Option<Vec<u8>>,
        reboot_fails: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl StubApi {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, call: &Call) -> usize {
            self.calls().iter().filter(|c| *c == call).count()
        }

        fn push_status(&self, status: Scripted<Option<StatusSnapshot>>) {
            self.statuses.lock().unwrap().push_back(status);
        }

        fn push_ack(&self, ack: Scripted<Ack>) {
            self.acks.lock().unwrap().push_back(ack);
        }

        fn next_ack(&self) -> Result<Ack, FeederError> {
            match self.acks.lock().unwrap().pop_front() {
                Some(Scripted::Reply(ack)) => Ok(ack),
                Some(Scripted::Fail) => Err(FeederError::Transport("connection refused".into())),
                None => Ok(Ack::ok("done")),
            }
        }
    }

    impl FeederApi for StubApi {
        async fn fetch_status(&self) -> Result<Option<StatusSnapshot>, FeederError> {
            self.record(Call::Status);
            match self.statuses.lock().unwrap().pop_front() {
                Some(Scripted::Reply(reply)) => Ok(reply),
                Some(Scripted::Fail) | None => {
                    Err(FeederError::Transport("connection refused".into()))
                }
            }
        }

        async fn send_command(&self, command: Command) -> Result<Ack, FeederError> {
            self.record(Call::Command(command));
            self.next_ack()
        }

        async fn reboot(&self) -> Result<(), FeederError> {
            self.record(Call::Reboot);
            if self.reboot_fails {
                Err(FeederError::Transport("connection reset".into()))
            } else {
                Ok(())
            }
        }

        async fn fetch_config(&self) -> Result<Option<FeederConfig>, FeederError> {
            self.record(Call::Config);
            if self.config_fails {
                Err(FeederError::Transport("timeout".into()))
            } else {
                Ok(self.config.clone())
            }
        }

        async fn save_schedule(&self, settings: ScheduleSettings) -> Result<Ack, FeederError> {
            self.record(Call::Schedule(settings));
            self.next_ack()
        }

        async fn save_advanced(&self, settings: AdvancedSettings) -> Result<Ack, FeederError> {
            self.record(Call::Advanced(settings));
            self.next_ack()
        }

        async fn fetch_image(
            &self,
            shot: CameraShot,
            _cache_buster: i64,
        ) -> Result<Vec<u8>, FeederError> {
            self.record(Call::Image(shot));
            self.image.clone().ok_or(FeederError::Status(503))
        }
    }

    #[derive(Default)]
    struct StubPhotos {
        stored: Mutex<Vec<usize>>,
    }

    impl PhotoStore for StubPhotos {
        async fn store(&self, photo: Vec<u8>, taken_at: i64) -> Result<String, FeederError> {
            self.stored.lock().unwrap().push(photo.len());
            Ok(format!("photo-{taken_at}.jpg"))
        }
    }

    type TestSession = DashboardSession<Arc<StubApi>, Arc<StubPhotos>>;

    fn make_session(api: StubApi) -> (TestSession, Arc<StubApi>, Arc<StubPhotos>) {
        let api = Arc::new(api);
        let photos = Arc::new(StubPhotos::default());
        let session = DashboardSession::new(
            Arc::clone(&api),
            Arc::clone(&photos),
            SessionSettings::default(),
        );
        (session, api, photos)
    }

    fn snapshot(state: &str, in_progress: bool, today_count: u32) -> StatusSnapshot {
        StatusSnapshot {
            feeding: FeedingStatus {
                state: state.to_string(),
                compartment: 1,
                progress: if in_progress { 50.0 } else { 0.0 },
                in_progress,
            },
            sensors: SensorStatus {
                valid: true,
                temperature: Some(21.0),
                humidity: Some(40.0),
                presence: false,
            },
            schedule: ScheduleStatus {
                next_feeding: "Soon".to_string(),
                today_count,
                max_per_day: 4,
            },
            system: SystemStatus {
                wifi: "-60 dBm".to_string(),
                free_heap: 102_400,
                uptime: 90_000,
            },
        }
    }

    fn drain(rx: &mut broadcast::Receiver<Toast>) -> Vec<Toast> {
        let mut toasts = Vec::new();
        while let Ok(toast) = rx.try_recv() {
            toasts.push(toast);
        }
        toasts
    }

    #[tokio::test]
    async fn should_render_snapshot_and_connect_after_successful_poll() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 1))));

        let outcome = session.poll_once().await;

        assert_eq!(outcome, PollOutcome::Updated);
        let view = session.view();
        assert_eq!(view.feeding_state, "Idle");
        assert_eq!(view.feedings_today, "1/4");
        assert_eq!(view.uptime, "1m 30s");
        assert_eq!(view.free_heap, "100.0 KB");
        assert_eq!(view.connection, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn should_keep_last_snapshot_and_disconnect_when_poll_fails() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_status(Scripted::Reply(Some(snapshot("Dispensing", true, 2))));
        api.push_status(Scripted::Fail);

        session.poll_once().await;
        let before = session.view();
        let outcome = session.poll_once().await;
        let after = session.view();

        assert_eq!(outcome, PollOutcome::Failed);
        assert_eq!(after.connection, ConnectionState::Disconnected);
        assert_eq!(after.feeding_state, before.feeding_state);
        assert_eq!(after.feedings_today, before.feedings_today);
        assert_eq!(after.last_update, before.last_update);
        assert!(after.cancel_enabled);
    }

    #[tokio::test]
    async fn should_leave_view_untouched_when_status_declined() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 0))));
        api.push_status(Scripted::Reply(None));

        session.poll_once().await;
        let before = session.view();
        let outcome = session.poll_once().await;

        assert_eq!(outcome, PollOutcome::Declined);
        assert_eq!(session.view(), before);
    }

    #[tokio::test]
    async fn should_notify_view_subscribers_on_update() {
        let (session, api, _) = make_session(StubApi::default());
        let mut rx = session.subscribe_view();
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 0))));

        session.poll_once().await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().feeding_state, "Idle");
    }

    #[tokio::test]
    async fn should_toggle_buttons_from_server_progress_flag() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_status(Scripted::Reply(Some(snapshot("Dispensing", true, 0))));
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 1))));

        session.poll_once().await;
        assert!(!session.view().feed_now_enabled);
        assert!(session.view().cancel_enabled);

        session.poll_once().await;
        assert!(session.view().feed_now_enabled);
        assert!(!session.view().cancel_enabled);
    }

    #[tokio::test]
    async fn should_toast_success_when_feed_acknowledged() {
        let (session, api, _) = make_session(StubApi::default());
        let mut toasts = session.subscribe_toasts();

        let ack = session.feed_now().await.unwrap();

        assert!(ack.success);
        assert_eq!(api.calls(), vec![Call::Command(Command::FeedNow)]);
        assert_eq!(drain(&mut toasts), vec![Toast::success("Feeding started")]);
    }

    #[tokio::test]
    async fn should_toast_device_message_when_feed_declined() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_ack(Scripted::Reply(Ack::declined("Feeding already in progress")));
        let mut toasts = session.subscribe_toasts();

        let ack = session.feed_now().await.unwrap();

        assert!(!ack.success);
        assert_eq!(
            drain(&mut toasts),
            vec![Toast::error("Error: Feeding already in progress")]
        );
    }

    #[tokio::test]
    async fn should_toast_connection_error_when_cancel_fails() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_ack(Scripted::Fail);
        let mut toasts = session.subscribe_toasts();

        let result = session.cancel_feeding().await;

        assert!(matches!(result, Err(FeederError::Transport(_))));
        assert_eq!(drain(&mut toasts), vec![Toast::connection_error()]);
    }

    #[tokio::test]
    async fn should_poll_again_after_successful_reset() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 0))));

        session.reset_daily().await.unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::Command(Command::ResetDaily), Call::Status]
        );
        assert_eq!(session.view().feedings_today, "0/4");
    }

    #[tokio::test]
    async fn should_not_poll_after_declined_reset() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_ack(Scripted::Reply(Ack::default()));

        session.reset_daily().await.unwrap();

        assert_eq!(api.count(&Call::Status), 0);
    }

    #[tokio::test]
    async fn should_load_configuration_into_form() {
        let config = FeederConfig {
            auto_enabled: false,
            feeding_interval: 8,
            portions_per_day: 2,
            require_presence: false,
            play_sound: false,
            temp_alerts: true,
            humidity_alerts: false,
        };
        let (session, _, _) = make_session(StubApi {
            config: Some(config.clone()),
            ..StubApi::default()
        });

        session.load_configuration().await.unwrap();

        assert_eq!(session.form(), ConfigForm::from(&config));
    }

    #[tokio::test]
    async fn should_keep_default_form_and_stay_silent_when_config_fails() {
        let (session, _, _) = make_session(StubApi {
            config_fails: true,
            ..StubApi::default()
        });
        let mut toasts = session.subscribe_toasts();

        assert!(session.load_configuration().await.is_err());
        assert_eq!(session.form(), ConfigForm::default());
        assert!(drain(&mut toasts).is_empty());
    }

    #[tokio::test]
    async fn should_send_only_schedule_group_when_saving_schedule() {
        let (session, api, _) = make_session(StubApi::default());
        session.edit_form(|form| {
            form.auto_enabled = false;
            form.feeding_interval = "6".to_string();
            form.portions_per_day = "3".to_string();
            form.play_sound = false;
        });
        let mut toasts = session.subscribe_toasts();

        session.save_schedule().await.unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::Schedule(ScheduleSettings {
                auto_enabled: false,
                feeding_interval: 6,
                portions_per_day: 3,
            })]
        );
        assert_eq!(drain(&mut toasts), vec![Toast::success("Configuration saved")]);
    }

    #[tokio::test]
    async fn should_send_only_advanced_group_when_saving_advanced() {
        let (session, api, _) = make_session(StubApi::default());
        session.edit_form(|form| {
            form.feeding_interval = "not a number".to_string();
            form.temp_alerts = false;
        });

        session.save_advanced().await.unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::Advanced(AdvancedSettings {
                require_presence: true,
                play_sound: true,
                temp_alerts: false,
                humidity_alerts: true,
            })]
        );
    }

    #[tokio::test]
    async fn should_refuse_to_send_schedule_with_invalid_integer() {
        let (session, api, _) = make_session(StubApi::default());
        session.edit_form(|form| form.portions_per_day = "lots".to_string());
        let mut toasts = session.subscribe_toasts();

        let result = session.save_schedule().await;

        assert!(matches!(result, Err(FeederError::Validation(_))));
        assert!(api.calls().is_empty());
        let toasts = drain(&mut toasts);
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].is_error());
    }

    #[tokio::test]
    async fn should_toast_save_error_when_declined() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_ack(Scripted::Reply(Ack::default()));
        let mut toasts = session.subscribe_toasts();

        session.save_advanced().await.unwrap();

        assert_eq!(
            drain(&mut toasts),
            vec![Toast::error("Error saving configuration")]
        );
    }

    #[tokio::test]
    async fn should_show_captured_photo_and_toast() {
        let (session, api, photos) = make_session(StubApi {
            image: Some(vec![0xFF, 0xD8, 0xFF]),
            ..StubApi::default()
        });
        let mut toasts = session.subscribe_toasts();

        let handle = session.capture_photo().await.unwrap();

        assert_eq!(api.calls(), vec![Call::Image(CameraShot::Capture)]);
        assert_eq!(photos.stored.lock().unwrap().as_slice(), &[3]);
        assert_eq!(session.view().camera.src(), handle);
        assert_eq!(
            drain(&mut toasts),
            vec![
                Toast::success("Capturing photo\u{2026}"),
                Toast::success("Photo captured"),
            ]
        );
    }

    #[tokio::test]
    async fn should_keep_image_and_toast_error_when_capture_rejected() {
        let (session, _, photos) = make_session(StubApi::default());
        let before = session.view().camera;
        let mut toasts = session.subscribe_toasts();

        let result = session.capture_photo().await;

        assert!(matches!(result, Err(FeederError::Status(503))));
        assert_eq!(session.view().camera, before);
        assert!(photos.stored.lock().unwrap().is_empty());
        let toasts = drain(&mut toasts);
        assert_eq!(toasts.last(), Some(&Toast::error("Error capturing photo")));
    }

    #[tokio::test]
    async fn should_show_placeholder_when_stream_fails() {
        let (session, _, _) = make_session(StubApi::default());
        let mut toasts = session.subscribe_toasts();

        assert!(session.refresh_camera().await.is_err());

        let camera = session.view().camera;
        assert_eq!(
            camera.source(),
            &feederdash_domain::camera::CameraSource::Placeholder
        );
        assert!(!camera.is_error_handler_armed());
        assert_eq!(drain(&mut toasts), vec![Toast::error("Camera unavailable")]);
    }

    #[tokio::test]
    async fn should_point_camera_at_stream_when_frame_loads() {
        let (session, api, _) = make_session(StubApi {
            image: Some(vec![1, 2, 3]),
            ..StubApi::default()
        });

        session.refresh_camera().await.unwrap();

        assert_eq!(api.calls(), vec![Call::Image(CameraShot::Stream)]);
        let camera = session.view().camera;
        assert!(camera.src().starts_with("/camera/stream?"));
        assert!(!camera.is_error_handler_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_schedule_disconnect_then_reload_after_reboot() {
        let (session, api, _) = make_session(StubApi {
            config: Some(FeederConfig::default()),
            ..StubApi::default()
        });
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 3))));
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 0))));
        session.poll_once().await;
        let mut toasts = session.subscribe_toasts();

        session.reboot().await.unwrap();

        assert_eq!(session.pending_deferred(), 2);
        assert_eq!(drain(&mut toasts), vec![Toast::success("Rebooting system\u{2026}")]);
        assert_eq!(session.view().connection, ConnectionState::Connected);

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(session.view().connection, ConnectionState::Disconnected);
        assert_eq!(session.view().feedings_today, "3/4");
        assert_eq!(session.pending_deferred(), 1);
        assert_eq!(api.count(&Call::Config), 0);

        tokio::time::sleep(Duration::from_millis(13_000)).await;
        assert_eq!(session.pending_deferred(), 0);
        assert_eq!(api.count(&Call::Config), 1);
        assert_eq!(session.view().connection, ConnectionState::Connected);
        assert_eq!(session.view().feedings_today, "0/4");
    }

    #[tokio::test(start_paused = true)]
    async fn should_schedule_nothing_when_reboot_request_fails() {
        let (session, _, _) = make_session(StubApi {
            reboot_fails: true,
            ..StubApi::default()
        });
        let mut toasts = session.subscribe_toasts();

        assert!(session.reboot().await.is_err());

        assert_eq!(session.pending_deferred(), 0);
        assert_eq!(drain(&mut toasts), vec![Toast::connection_error()]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_poll_immediately_then_every_interval() {
        let (session, api, _) = make_session(StubApi::default());
        for count in 0..5 {
            api.push_status(Scripted::Reply(Some(snapshot("Idle", false, count))));
        }

        session.start().await;
        tokio::time::sleep(Duration::from_millis(4_100)).await;

        assert!(session.is_polling());
        assert_eq!(api.count(&Call::Status), 3);
        assert_eq!(api.count(&Call::Config), 1);
        assert_eq!(session.view().feedings_today, "2/4");

        session.stop();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!session.is_polling());
        assert_eq!(api.count(&Call::Status), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_polling_through_failures() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_status(Scripted::Fail);
        api.push_status(Scripted::Fail);
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 1))));

        session.start_polling();
        tokio::time::sleep(Duration::from_millis(4_100)).await;

        assert_eq!(api.count(&Call::Status), 3);
        assert_eq!(session.view().connection, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn should_reset_view_and_form_on_reload() {
        let (session, api, _) = make_session(StubApi::default());
        api.push_status(Scripted::Reply(Some(snapshot("Idle", false, 2))));
        session.poll_once().await;
        session.edit_form(|form| form.feeding_interval = "9".to_string());

        session.reload().await;

        assert_eq!(session.form(), ConfigForm::default());
        let view = session.view();
        assert_eq!(view.feeding_state, "--");
        assert_eq!(view.connection, ConnectionState::Disconnected);
        assert_eq!(api.count(&Call::Config), 1);
    }

    #[tokio::test]
    async fn should_stop_polling_when_dropped() {
        let (session, _, _) = make_session(StubApi::default());
        session.start_polling();
        let abort_handle = session
            .poll_task
            .lock()
            .unwrap()
            .as_ref()
            .map(JoinHandle::abort_handle)
            .unwrap();

        drop(session);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(abort_handle.is_finished());
    }

    #[test]
    fn should_default_to_two_second_polls() {
        let settings = SessionSettings::default();
        assert_eq!(settings.poll_interval, Duration::from_secs(2));
        assert_eq!(settings.reboot_disconnect_after, Duration::from_secs(2));
        assert_eq!(settings.reboot_reload_after, Duration::from_secs(15));
    }
}
