//! HTTP API client wrapping `gloo-net` for calls to the feeder.
//!
//! The dashboard is served by the feeder itself, so every path is
//! origin-relative. Bodies are decoded with the domain decoders so the
//! browser and the native client read replies identically.

use feederdash_domain::command::Command;
use feederdash_domain::config::{AdvancedSettings, FeederConfig, ScheduleSettings};
use feederdash_domain::endpoint::{self, CameraShot};
use feederdash_domain::error::FeederError;
use feederdash_domain::reply::{self, Ack};
use feederdash_domain::status::StatusSnapshot;
use gloo_net::http::{Request, Response};
use serde::Serialize;

/// Error returned by API client methods.
///
/// Any request that produced no usable answer ends up here: network
/// failures, non-2xx statuses and undecodable bodies alike.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<FeederError> for ApiError {
    fn from(err: FeederError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Check the HTTP response status and turn non-2xx into an error.
fn check_response(resp: Response) -> Result<Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    Err(ApiError {
        message: format!("HTTP {}", resp.status()),
    })
}

async fn body(resp: Response) -> Result<Vec<u8>, ApiError> {
    Ok(check_response(resp)?.binary().await?)
}

async fn post_json<T: Serialize>(path: &str, payload: &T) -> Result<Ack, ApiError> {
    let resp = Request::post(path).json(payload)?.send().await?;
    Ok(reply::decode_ack(&body(resp).await?)?)
}

/// Fetch the status snapshot. `Ok(None)` means the feeder answered with
/// `success: false`.
pub async fn fetch_status() -> Result<Option<StatusSnapshot>, ApiError> {
    let resp = Request::get(endpoint::STATUS).send().await?;
    Ok(reply::decode_status(&body(resp).await?)?)
}

/// Fetch the stored configuration.
pub async fn fetch_config() -> Result<Option<FeederConfig>, ApiError> {
    let resp = Request::get(endpoint::CONFIG).send().await?;
    Ok(reply::decode_config(&body(resp).await?)?)
}

/// Send a body-less command and return the feeder's acknowledgement.
pub async fn send_command(command: Command) -> Result<Ack, ApiError> {
    let resp = Request::post(command.path()).send().await?;
    Ok(reply::decode_ack(&body(resp).await?)?)
}

pub async fn save_schedule(settings: &ScheduleSettings) -> Result<Ack, ApiError> {
    post_json(endpoint::CONFIG_SCHEDULE, settings).await
}

pub async fn save_advanced(settings: &AdvancedSettings) -> Result<Ack, ApiError> {
    post_json(endpoint::CONFIG_ADVANCED, settings).await
}

/// Ask the feeder to reboot. Only a network failure is an error; the reply,
/// if any, is not read.
pub async fn reboot() -> Result<(), ApiError> {
    Request::post(Command::Reboot.path()).send().await?;
    Ok(())
}

/// Fetch a single camera frame.
pub async fn fetch_image(shot: CameraShot, cache_buster: i64) -> Result<Vec<u8>, ApiError> {
    let resp = Request::get(&shot.url(cache_buster)).send().await?;
    body(resp).await
}
