//! Configuration Module
//!
//! Coercion toggles (`CastConfig`) and process-level settings loaded from
//! environment variables (`Config`).

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};

// == Cast Config ==
/// Toggles gating the individual recognizers of the coercion engine.
///
/// Recognizers with meaningful false-positive risk are off by default.
/// Field names on the wire follow the host's JSON config (`castUUID`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    /// Recognize canonical hyphenated UUIDs (default: false)
    #[serde(rename = "castUUID")]
    pub cast_uuid: bool,
    /// Recognize `YYYY-MM-DD` dates (default: true)
    #[serde(rename = "castDate")]
    pub cast_date: bool,
    /// Recognize `HH:MM:SS` times (default: true)
    #[serde(rename = "castTime")]
    pub cast_time: bool,
    /// Recognize zoned ISO-8601 timestamps (default: true)
    #[serde(rename = "castDatetime")]
    pub cast_datetime: bool,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            cast_uuid: false,
            cast_date: true,
            cast_time: true,
            cast_datetime: true,
        }
    }
}

impl CastConfig {
    /// Builds a CastConfig from a host JSON config object.
    ///
    /// Missing toggles keep their defaults and unrelated keys are ignored.
    /// A toggle holding a non-boolean value is an `InvalidArgument`.
    pub fn from_json(value: &Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        CastConfig::deserialize(value)
            .map_err(|e| BridgeError::InvalidArgument(format!("invalid cast config: {e}")))
    }

    /// Returns a copy with UUID recognition switched on or off.
    pub fn with_uuid(mut self, enabled: bool) -> Self {
        self.cast_uuid = enabled;
        self
    }
}

// == Process Config ==
/// Process-level configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Coercion toggles applied to every bound parameter
    pub cast: CastConfig,
    /// Idle time after which a shared resource is evicted, in milliseconds
    pub idle_ttl_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CAST_UUID` - Recognize UUIDs (default: false)
    /// - `CAST_DATE` - Recognize dates (default: true)
    /// - `CAST_TIME` - Recognize times (default: true)
    /// - `CAST_DATETIME` - Recognize timestamps (default: true)
    /// - `IDLE_TTL_MS` - Shared resource idle TTL in milliseconds (default: 30000)
    pub fn from_env() -> Self {
        let defaults = CastConfig::default();
        Self {
            cast: CastConfig {
                cast_uuid: env_flag("CAST_UUID").unwrap_or(defaults.cast_uuid),
                cast_date: env_flag("CAST_DATE").unwrap_or(defaults.cast_date),
                cast_time: env_flag("CAST_TIME").unwrap_or(defaults.cast_time),
                cast_datetime: env_flag("CAST_DATETIME").unwrap_or(defaults.cast_datetime),
            },
            idle_ttl_ms: env::var("IDLE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
        }
    }

    /// Idle TTL as a Duration.
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_millis(self.idle_ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cast: CastConfig::default(),
            idle_ttl_ms: 30_000,
        }
    }
}

/// Reads a boolean flag, accepting `true/false`, `1/0`, `yes/no`.
fn env_flag(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cast_config_default() {
        let config = CastConfig::default();
        assert!(!config.cast_uuid);
        assert!(config.cast_date);
        assert!(config.cast_time);
        assert!(config.cast_datetime);
    }

    #[test]
    fn test_cast_config_from_json() {
        let config = CastConfig::from_json(&json!({"castUUID": true, "castTime": false})).unwrap();
        assert!(config.cast_uuid);
        assert!(!config.cast_time);
        assert!(config.cast_date);
        assert!(config.cast_datetime);
    }

    #[test]
    fn test_cast_config_ignores_unknown_keys() {
        let config = CastConfig::from_json(&json!({"url": "jdbc:hsqldb:mem:test"})).unwrap();
        assert_eq!(config, CastConfig::default());
    }

    #[test]
    fn test_cast_config_null_is_default() {
        assert_eq!(CastConfig::from_json(&Value::Null).unwrap(), CastConfig::default());
    }

    #[test]
    fn test_cast_config_rejects_wrong_type() {
        let result = CastConfig::from_json(&json!({"castUUID": "yes"}));
        assert!(matches!(result, Err(BridgeError::InvalidArgument(_))));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cast, CastConfig::default());
        assert_eq!(config.idle_ttl_ms, 30_000);
        assert_eq!(config.idle_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CAST_UUID");
        env::remove_var("CAST_DATE");
        env::remove_var("CAST_TIME");
        env::remove_var("CAST_DATETIME");
        env::remove_var("IDLE_TTL_MS");

        let config = Config::from_env();
        assert_eq!(config.cast, CastConfig::default());
        assert_eq!(config.idle_ttl_ms, 30_000);
    }
}
