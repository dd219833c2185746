use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::kernel::time::{CALL_TIMEOUT, MAX_TEXT_DELAY, RING_DURATION};

pub const DEFAULT_API_URL: &str = "https://api-call.coepi.co";
pub const MISSED_CALL_ROUTE: &str = "api/missed-call";

pub const ENV_API_URL: &str = "MISSEDCALL_API_URL";
pub const ENV_RING_SECS: &str = "MISSEDCALL_RING_SECS";
pub const ENV_MAX_TEXT_DELAY_SECS: &str = "MISSEDCALL_MAX_TEXT_DELAY_SECS";
pub const ENV_CALL_TIMEOUT_SECS: &str = "MISSEDCALL_CALL_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Base address of the decision collaborator.
    pub api_base: Url,
    pub ring_duration: Duration,
    /// Ceiling for the server-supplied text delay.
    pub max_text_delay: Duration,
    /// `None` waits on the decision call forever.
    pub call_timeout: Option<Duration>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            ring_duration: RING_DURATION,
            max_text_delay: MAX_TEXT_DELAY,
            call_timeout: Some(CALL_TIMEOUT),
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENV_API_URL) {
            config.api_base = parse_base_url(&raw)?;
        }
        if let Some(raw) = get(ENV_RING_SECS) {
            config.ring_duration = parse_seconds(ENV_RING_SECS, &raw)?;
        }
        if let Some(raw) = get(ENV_MAX_TEXT_DELAY_SECS) {
            config.max_text_delay = parse_seconds(ENV_MAX_TEXT_DELAY_SECS, &raw)?;
        }
        if let Some(raw) = get(ENV_CALL_TIMEOUT_SECS) {
            let limit = parse_seconds(ENV_CALL_TIMEOUT_SECS, &raw)?;
            config.call_timeout = (!limit.is_zero()).then_some(limit);
        }

        Ok(config)
    }

    /// Full URL of `POST /api/missed-call`. A base path is always treated as a directory.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let mut base = self.api_base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(MISSED_CALL_ROUTE).map_err(|source| ConfigError::InvalidUrl {
            value: base.to_string(),
            source,
        })
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        value: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(raw.to_string())),
    }
}

pub fn parse_seconds(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidSeconds {
        key: key.to_string(),
        value: raw.to_string(),
    };
    let secs: f64 = raw.trim().parse().map_err(|_| invalid())?;
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}
