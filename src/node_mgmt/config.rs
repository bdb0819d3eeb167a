//! Agent configuration, read from the environment (after `.env` loading)

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::{defaults, envvars};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone)]
pub struct AgentConfig {
    pub device_path: String,
    pub agent_id: i64,
    pub collector_url: Url,
    pub api_key: String,
    pub poll_interval: Duration,
    pub poll_roundtime: bool,
    pub http_timeout: Duration,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let device_path = device_path_from_env()?;
        let agent_id = parse_required::<i64>(envvars::AGENT_ID)?;

        let raw_url = required(envvars::REPORT_URL)?;
        let collector_url =
            Url::parse(&raw_url).map_err(|e| invalid(envvars::REPORT_URL, &raw_url, e))?;
        if !matches!(collector_url.scheme(), "http" | "https") {
            return Err(invalid(
                envvars::REPORT_URL,
                &raw_url,
                "scheme must be http or https",
            ));
        }

        let api_key = required(envvars::X_API_KEY)?;

        let poll_interval = parse_secs(envvars::POLL_INTERVAL, defaults::POLL_INTERVAL)?;
        let poll_roundtime = parse_bool(envvars::POLL_ROUNDTIME, false)?;
        let http_timeout = parse_secs(envvars::HTTP_TIMEOUT, defaults::HTTP_TIMEOUT)?;

        Ok(AgentConfig {
            device_path,
            agent_id,
            collector_url,
            api_key,
            poll_interval,
            poll_roundtime,
            http_timeout,
        })
    }
}

// Keep the API key out of logs
impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("device_path", &self.device_path)
            .field("agent_id", &self.agent_id)
            .field("collector_url", &self.collector_url.as_str())
            .field("api_key", &"***")
            .field("poll_interval", &self.poll_interval)
            .field("poll_roundtime", &self.poll_roundtime)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Serial device path; the only setting device commands need
pub fn device_path_from_env() -> Result<String, ConfigError> {
    required(envvars::AC_PORT)
}

fn invalid(var: &'static str, value: &str, reason: impl fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn optional(var: &'static str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    optional(var).ok_or(ConfigError::Missing(var))
}

fn parse_required<T>(var: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = required(var)?;
    raw.trim().parse().map_err(|e| invalid(var, &raw, e))
}

fn parse_secs(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let Some(raw) = optional(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(invalid(var, &raw, "must be greater than zero")),
        Ok(secs) if secs > defaults::MAX_DURATION.as_secs() => Err(invalid(
            var,
            &raw,
            format!("must be at most {} seconds", defaults::MAX_DURATION.as_secs()),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(invalid(var, &raw, e)),
    }
}

fn parse_bool(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = optional(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, &raw, "expected true or false")),
    }
}
