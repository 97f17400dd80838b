//! # feederdash-adapter-http-reqwest
//!
//! [`FeederApi`] implementation over HTTP using [reqwest](https://docs.rs/reqwest).
//!
//! ## Responsibilities
//! - Build absolute URLs from the configured origin and the fixed endpoint paths
//! - Apply the per-request timeout
//! - Map non-2xx answers to [`FeederError::Status`] and transport failures to
//!   [`FeederError::Transport`]
//! - Hand bodies to the domain decoders; `success: false` stays data
//!
//! ## Dependency rule
//! Depends on `feederdash-app` (for the port trait) and `feederdash-domain`
//! (for wire types). Never leaks reqwest types past the port.

pub mod config;
pub mod error;

use serde::Serialize;

use feederdash_app::ports::FeederApi;
use feederdash_domain::command::Command;
use feederdash_domain::config::{AdvancedSettings, FeederConfig, ScheduleSettings};
use feederdash_domain::endpoint::{self, CameraShot};
use feederdash_domain::error::FeederError;
use feederdash_domain::reply::{self, Ack};
use feederdash_domain::status::StatusSnapshot;

pub use config::HttpConfig;
pub use error::HttpError;

/// Feeder client backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestFeederApi {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestFeederApi {
    /// Build a client for the feeder described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(HttpError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Origin every path is appended to, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.client.get(self.url(path)).send().await?;
        read_body(response).await
    }

    async fn post(&self, path: &str) -> Result<Vec<u8>, HttpError> {
        let response = self.client.post(self.url(path)).send().await?;
        read_body(response).await
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Vec<u8>, HttpError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, HttpError> {
    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::Status(status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}

impl FeederApi for ReqwestFeederApi {
    async fn fetch_status(&self) -> Result<Option<StatusSnapshot>, FeederError> {
        let body = self.get(endpoint::STATUS).await?;
        reply::decode_status(&body)
    }

    async fn send_command(&self, command: Command) -> Result<Ack, FeederError> {
        tracing::debug!(path = command.path(), "sending command");
        let body = self.post(command.path()).await?;
        reply::decode_ack(&body)
    }

    async fn reboot(&self) -> Result<(), FeederError> {
        let response = self
            .client
            .post(self.url(endpoint::REBOOT))
            .send()
            .await
            .map_err(HttpError::from)?;
        tracing::debug!(status = response.status().as_u16(), "reboot request answered");
        Ok(())
    }

    async fn fetch_config(&self) -> Result<Option<FeederConfig>, FeederError> {
        let body = self.get(endpoint::CONFIG).await?;
        reply::decode_config(&body)
    }

    async fn save_schedule(&self, settings: ScheduleSettings) -> Result<Ack, FeederError> {
        let body = self.post_json(endpoint::CONFIG_SCHEDULE, &settings).await?;
        reply::decode_ack(&body)
    }

    async fn save_advanced(&self, settings: AdvancedSettings) -> Result<Ack, FeederError> {
        let body = self.post_json(endpoint::CONFIG_ADVANCED, &settings).await?;
        reply::decode_ack(&body)
    }

    async fn fetch_image(
        &self,
        shot: CameraShot,
        cache_buster: i64,
    ) -> Result<Vec<u8>, FeederError> {
        self.get(&shot.url(cache_buster))
            .await
            .map_err(FeederError::from)
    }
}
