//! Feeder API port — the device's fixed REST surface.

use std::future::Future;

use feederdash_domain::command::Command;
use feederdash_domain::config::{AdvancedSettings, FeederConfig, ScheduleSettings};
use feederdash_domain::endpoint::CameraShot;
use feederdash_domain::error::FeederError;
use feederdash_domain::reply::Ack;
use feederdash_domain::status::StatusSnapshot;

/// Everything the dashboard asks of the feeder.
///
/// Implementations live in adapter crates (e.g. `adapter_http_reqwest`).
/// A reply with `success: false` is returned as data (`Ok(None)` or an
/// [`Ack`] with `success == false`); `Err` means no usable answer arrived.
pub trait FeederApi: Send + Sync {
    /// `GET /api/status`. `Ok(None)` when the device declines.
    fn fetch_status(
        &self,
    ) -> impl Future<Output = Result<Option<StatusSnapshot>, FeederError>> + Send;

    /// POST one of the body-less command endpoints.
    ///
    /// [`Command::Reboot`] is better sent through [`reboot`](Self::reboot),
    /// which does not read the reply.
    fn send_command(
        &self,
        command: Command,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send;

    /// `POST /api/system/reboot`. Any HTTP answer counts as delivered; the
    /// body is ignored because the device may restart mid-response.
    fn reboot(&self) -> impl Future<Output = Result<(), FeederError>> + Send;

    /// `GET /api/config`. `Ok(None)` when the device declines.
    fn fetch_config(
        &self,
    ) -> impl Future<Output = Result<Option<FeederConfig>, FeederError>> + Send;

    /// `POST /api/config/schedule` with only the schedule group.
    fn save_schedule(
        &self,
        settings: ScheduleSettings,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send;

    /// `POST /api/config/advanced` with only the advanced group.
    fn save_advanced(
        &self,
        settings: AdvancedSettings,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send;

    /// `GET /camera/{stream,capture}?<cache_buster>`. Non-2xx is an error.
    fn fetch_image(
        &self,
        shot: CameraShot,
        cache_buster: i64,
    ) -> impl Future<Output = Result<Vec<u8>, FeederError>> + Send;
}

impl<T: FeederApi> FeederApi for std::sync::Arc<T> {
    fn fetch_status(
        &self,
    ) -> impl Future<Output = Result<Option<StatusSnapshot>, FeederError>> + Send {
        (**self).fetch_status()
    }

    fn send_command(
        &self,
        command: Command,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send {
        (**self).send_command(command)
    }

    fn reboot(&self) -> impl Future<Output = Result<(), FeederError>> + Send {
        (**self).reboot()
    }

    fn fetch_config(
        &self,
    ) -> impl Future<Output = Result<Option<FeederConfig>, FeederError>> + Send {
        (**self).fetch_config()
    }

    fn save_schedule(
        &self,
        settings: ScheduleSettings,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send {
        (**self).save_schedule(settings)
    }

    fn save_advanced(
        &self,
        settings: AdvancedSettings,
    ) -> impl Future<Output = Result<Ack, FeederError>> + Send {
        (**self).save_advanced(settings)
    }

    fn fetch_image(
        &self,
        shot: CameraShot,
        cache_buster: i64,
    ) -> impl Future<Output = Result<Vec<u8>, FeederError>> + Send {
        (**self).fetch_image(shot, cache_buster)
    }
}
