//! Feeder connection configuration.

use std::time::Duration;

use serde::Deserialize;

/// Where the feeder lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Origin of the feeder, e.g. `http://feeder.local`. Paths are appended.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl HttpConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://feeder.local".to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.base_url, "http://feeder.local");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            base_url = "http://192.168.1.50"
            request_timeout_ms = 1500
        "#;
        let config: HttpConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://192.168.1.50");
        assert_eq!(config.request_timeout_ms, 1500);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: HttpConfig = toml::from_str(r#"base_url = "http://10.0.0.7""#).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.7");
        assert_eq!(config.request_timeout_ms, 5_000);
    }
}
