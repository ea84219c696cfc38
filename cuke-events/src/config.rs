//! Bus configuration
//!
//! Defaults suit test runs: log rejected calls and stop dispatch at the first
//! failing handler. Values can come from code, the environment
//! (`CUKE_BUS_LOG_EVENTS`, `CUKE_BUS_DISPATCH`) or a TOML document.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// What happens when a handler returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Stop at the first failure; later handlers are not called.
    #[default]
    FailFast,
    /// Call every handler, then report all failures together.
    ContinueOnError,
}

impl FromStr for DispatchPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fail_fast" => Ok(DispatchPolicy::FailFast),
            "continue_on_error" => Ok(DispatchPolicy::ContinueOnError),
            _ => Err(ConfigError::InvalidValue {
                key: "dispatch".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Event bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// Log subscriptions, dispatches and rejected calls
    pub log_events: bool,

    /// Handler failure policy
    pub dispatch: DispatchPolicy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            log_events: true,
            dispatch: DispatchPolicy::FailFast,
        }
    }
}

const ENV_PREFIX: &str = "CUKE_BUS_";

impl BusConfig {
    /// Read overrides from `CUKE_BUS_*` variables on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars())
    }

    /// Same as [`BusConfig::from_env`] over an explicit variable list.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref();
            match name.to_lowercase().as_str() {
                "log_events" => config.log_events = parse_flag(name, value)?,
                "dispatch" => config.dispatch = value.parse()?,
                _ => {}
            }
        }
        Ok(config)
    }

    /// Parse a TOML document such as `dispatch = "continue_on_error"`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(format!("TOML parse error: {e}")))
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_lowercase(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BusConfig::default();
        assert!(config.log_events);
        assert_eq!(config.dispatch, DispatchPolicy::FailFast);
    }

    #[test]
    fn test_from_vars() {
        let config = BusConfig::from_vars([
            ("CUKE_BUS_LOG_EVENTS", "0"),
            ("CUKE_BUS_DISPATCH", "continue-on-error"),
            ("PATH", "/usr/bin"),
        ])
        .unwrap();

        assert!(!config.log_events);
        assert_eq!(config.dispatch, DispatchPolicy::ContinueOnError);
    }

    #[test]
    fn test_from_vars_rejects_bad_flag() {
        let err = BusConfig::from_vars([("CUKE_BUS_LOG_EVENTS", "maybe")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "log_events".to_string(),
                value: "maybe".to_string()
            }
        );
    }

    #[test]
    fn test_from_toml() {
        let config = BusConfig::from_toml_str(
            r#"
            log_events = false
            dispatch = "continue_on_error"
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            BusConfig {
                log_events: false,
                dispatch: DispatchPolicy::ContinueOnError
            }
        );
    }

    #[test]
    fn test_from_toml_partial_keeps_defaults() {
        let config = BusConfig::from_toml_str("log_events = false").unwrap();
        assert_eq!(config.dispatch, DispatchPolicy::FailFast);
    }

    #[test]
    fn test_from_toml_rejects_unknown_policy() {
        assert!(BusConfig::from_toml_str(r#"dispatch = "retry""#).is_err());
        assert!(BusConfig::from_toml_str("colour = true").is_err());
    }
}
