//! Startup configuration from the environment

use crate::assistant::DEFAULT_BASE_URL;
use crate::orchestrator::PollPolicy;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid number: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Everything the relay needs to start
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub assistant_id: String,
    pub base_url: String,
    pub port: u16,
    pub poll: PollPolicy,
    pub upstream_timeout: Duration,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = PollPolicy::default();
        let poll_interval_ms = number(&lookup, "RUN_POLL_INTERVAL_MS")?
            .unwrap_or_else(|| u64::try_from(defaults.interval.as_millis()).unwrap_or(1000));
        let poll_budget = number(&lookup, "RUN_POLL_BUDGET")?.unwrap_or(defaults.budget);
        let timeout_secs = number(&lookup, "UPSTREAM_TIMEOUT_SECS")?.unwrap_or(60);

        if poll_interval_ms == 0 {
            return Err(ConfigError::Zero("RUN_POLL_INTERVAL_MS"));
        }
        if poll_budget == 0 {
            return Err(ConfigError::Zero("RUN_POLL_BUDGET"));
        }
        if timeout_secs == 0 {
            return Err(ConfigError::Zero("UPSTREAM_TIMEOUT_SECS"));
        }

        Ok(Self {
            api_key: required(&lookup, "OPENAI_API_KEY")?,
            assistant_id: required(&lookup, "ASSISTANT_ID")?,
            base_url: non_empty(&lookup, "OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            port: number(&lookup, "RELAY_PORT")?.unwrap_or(8000),
            poll: PollPolicy {
                interval: Duration::from_millis(poll_interval_ms),
                budget: poll_budget,
            },
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    non_empty(lookup, name).ok_or(ConfigError::Missing(name))
}

fn number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match non_empty(lookup, name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(None),
    }
}
