//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `feederdash.toml` in the working directory (or the path given
//! with `--config`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values, and CLI
//! flags over both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use feederdash_adapter_http_reqwest::HttpConfig;
use feederdash_app::session::{POLL_INTERVAL, SessionSettings};

/// Default config file name.
pub const CONFIG_FILE: &str = "feederdash.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the feeder lives.
    pub device: HttpConfig,
    /// Status poll cadence.
    pub polling: PollingConfig,
    /// Captured photo storage.
    pub camera: CameraConfig,
    /// Virtual feeder listener.
    pub demo: DemoConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between status polls, in milliseconds.
    pub interval_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Directory captured photos are written to.
    pub capture_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// `host:port` the virtual feeder binds to.
    pub bind: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (if present), apply
    /// environment-variable overrides, then the `--device-url` flag, and
    /// validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values fail validation.
    pub fn load(path: &Path, device_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        if let Some(url) = device_url {
            config.device.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FEEDERDASH_DEVICE_URL") {
            self.device.base_url = val;
        }
        if let Ok(val) = std::env::var("FEEDERDASH_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.device.request_timeout_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("FEEDERDASH_POLL_MS") {
            if let Ok(ms) = val.parse() {
                self.polling.interval_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("FEEDERDASH_CAPTURE_DIR") {
            self.camera.capture_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("FEEDERDASH_DEMO_BIND") {
            self.demo.bind = val;
        }
        if let Ok(val) = std::env::var("FEEDERDASH_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    /// Check semantic constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.device.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "device.base_url must not be empty".to_string(),
            ));
        }
        if self.device.request_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "device.request_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "polling.interval_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Session timings derived from the polling section.
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            poll_interval: Duration::from_millis(self.polling.interval_ms),
            ..SessionSettings::default()
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: u64::try_from(POLL_INTERVAL.as_millis()).unwrap_or(2_000),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            capture_dir: PathBuf::from("captures"),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "feederdash=info,feederdash_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.device.base_url, "http://feeder.local");
        assert_eq!(config.device.request_timeout_ms, 5_000);
        assert_eq!(config.polling.interval_ms, 2_000);
        assert_eq!(config.camera.capture_dir, PathBuf::from("captures"));
        assert_eq!(config.demo.bind, "127.0.0.1:8080");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.polling.interval_ms, 2_000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [device]
            base_url = 'http://192.168.1.40'
            request_timeout_ms = 1500

            [polling]
            interval_ms = 500

            [camera]
            capture_dir = '/tmp/shots'

            [demo]
            bind = '0.0.0.0:9000'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.device.base_url, "http://192.168.1.40");
        assert_eq!(config.device.request_timeout_ms, 1500);
        assert_eq!(config.polling.interval_ms, 500);
        assert_eq!(config.camera.capture_dir, PathBuf::from("/tmp/shots"));
        assert_eq!(config.demo.bind, "0.0.0.0:9000");
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [device]
            base_url = 'http://10.0.0.2'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.device.base_url, "http://10.0.0.2");
        assert_eq!(config.device.request_timeout_ms, 5_000);
        assert_eq!(config.polling.interval_ms, 2_000);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent-feederdash.toml")).unwrap();
        assert_eq!(config.device.base_url, "http://feeder.local");
    }

    #[test]
    fn should_let_device_url_flag_replace_empty_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feederdash.toml");
        std::fs::write(&path, "[device]\nbase_url = ''\n").unwrap();

        let config = Config::load(&path, Some("http://10.0.0.7".to_string())).unwrap();

        assert_eq!(config.device.base_url, "http://10.0.0.7");
    }

    #[test]
    fn should_reject_empty_file_url_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feederdash.toml");
        std::fs::write(&path, "[device]\nbase_url = ''\n").unwrap();

        assert!(matches!(
            Config::load(&path, None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_reject_empty_base_url() {
        let mut config = Config::default();
        config.device.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_timeout() {
        let mut config = Config::default();
        config.device.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_interval() {
        let mut config = Config::default();
        config.polling.interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("interval_ms")
        ));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_derive_session_settings_from_polling() {
        let mut config = Config::default();
        config.polling.interval_ms = 750;
        let settings = config.session_settings();
        assert_eq!(settings.poll_interval, Duration::from_millis(750));
        assert_eq!(settings.reboot_reload_after, Duration::from_secs(15));
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
