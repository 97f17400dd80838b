//! Decoding of device replies.
//!
//! Every JSON endpoint wraps its payload in an envelope carrying a `success`
//! flag. A reply with `success: false` is an answer, not a failure: the
//! decoders below return `Ok(None)` for it and reserve `Err` for bodies that
//! are not the expected JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::FeederConfig;
use crate::error::FeederError;
use crate::status::StatusSnapshot;

/// Generic `{success, message?}` acknowledgement returned by command endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    /// A successful acknowledgement with a message.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    /// A declined acknowledgement with a message.
    #[must_use]
    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// `GET /api/status` body as the device serialises it.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReply<'a> {
    pub success: bool,
    #[serde(flatten)]
    pub snapshot: &'a StatusSnapshot,
}

/// `GET /api/config` body as the device serialises it.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReply<'a> {
    pub success: bool,
    pub config: &'a FeederConfig,
}

fn succeeded(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Decode a `/api/status` body.
///
/// # Errors
///
/// Returns [`FeederError::Decode`] if the body is not JSON, or if it reports
/// success but the snapshot groups are missing or mistyped.
pub fn decode_status(body: &[u8]) -> Result<Option<StatusSnapshot>, FeederError> {
    let value: Value = serde_json::from_slice(body)?;
    if !succeeded(&value) {
        return Ok(None);
    }
    Ok(Some(StatusSnapshot::deserialize(&value)?))
}

/// Decode a `/api/config` body.
///
/// # Errors
///
/// Returns [`FeederError::Decode`] if the body is not JSON, or if it reports
/// success without a well-formed `config` object.
pub fn decode_config(body: &[u8]) -> Result<Option<FeederConfig>, FeederError> {
    let value: Value = serde_json::from_slice(body)?;
    if !succeeded(&value) {
        return Ok(None);
    }
    let config = value.get("config").cloned().unwrap_or(Value::Null);
    Ok(Some(FeederConfig::deserialize(config)?))
}

/// Decode a command acknowledgement.
///
/// # Errors
///
/// Returns [`FeederError::Decode`] if the body is not a JSON object.
pub fn decode_ack(body: &[u8]) -> Result<Ack, FeederError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_BODY: &str = r#"{
        "success": true,
        "feeding": {"state": "Idle", "compartment": 0, "progress": 0.0, "inProgress": false},
        "sensors": {"valid": true, "temperature": 21.5, "humidity": 40.2, "presence": true},
        "schedule": {"nextFeeding": "Soon", "todayCount": 1, "maxPerDay": 4},
        "system": {"wifi": "-55 dBm", "freeHeap": 204800, "uptime": 3700000}
    }"#;

    #[test]
    fn should_decode_successful_status() {
        let snapshot = decode_status(STATUS_BODY.as_bytes()).unwrap().unwrap();
        assert_eq!(snapshot.feeding.state, "Idle");
        assert_eq!(snapshot.schedule.today_count, 1);
        assert_eq!(snapshot.system.wifi, "-55 dBm");
    }

    #[test]
    fn should_return_none_when_status_declined() {
        let result = decode_status(br#"{"success": false}"#).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn should_treat_missing_success_flag_as_declined() {
        let result = decode_status(br#"{"feeding": {}}"#).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn should_fail_when_status_body_is_not_json() {
        let err = decode_status(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, FeederError::Decode(_)));
    }

    #[test]
    fn should_fail_when_successful_status_lacks_groups() {
        let err = decode_status(br#"{"success": true, "feeding": {}}"#).unwrap_err();
        assert!(matches!(err, FeederError::Decode(_)));
    }

    #[test]
    fn should_decode_config_envelope() {
        let body = br#"{"success": true, "config": {
            "autoEnabled": false, "feedingInterval": 6, "portionsPerDay": 3,
            "requirePresence": true, "playSound": false,
            "tempAlerts": true, "humidityAlerts": true
        }}"#;
        let config = decode_config(body).unwrap().unwrap();
        assert!(!config.auto_enabled);
        assert_eq!(config.feeding_interval, 6);
    }

    #[test]
    fn should_fail_when_config_object_missing() {
        assert!(decode_config(br#"{"success": true}"#).is_err());
    }

    #[test]
    fn should_decode_ack_with_and_without_message() {
        let ack = decode_ack(br#"{"success": false, "message": "busy"}"#).unwrap();
        assert_eq!(ack, Ack::declined("busy"));

        let ack = decode_ack(br#"{"success": true}"#).unwrap();
        assert!(ack.success);
        assert!(ack.message.is_none());
    }

    #[test]
    fn should_serialize_status_reply_flat() {
        let snapshot = decode_status(STATUS_BODY.as_bytes()).unwrap().unwrap();
        let value = serde_json::to_value(StatusReply {
            success: true,
            snapshot: &snapshot,
        })
        .unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["feeding"]["inProgress"], false);
        assert_eq!(value["system"]["freeHeap"], 204_800);
    }

    #[test]
    fn should_round_trip_config_reply_through_decoder() {
        let config = FeederConfig::default();
        let body = serde_json::to_vec(&ConfigReply {
            success: true,
            config: &config,
        })
        .unwrap();
        assert_eq!(decode_config(&body).unwrap(), Some(config));
    }
}
