//! Connection settings for an Immich server.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{ImmichError, ImmichResult};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const MIN_API_KEY_LEN: usize = 10;

pub const ENV_BASE_URL: &str = "IMMICH_BASE_URL";
pub const ENV_API_KEY: &str = "IMMICH_API_KEY";
pub const ENV_TIMEOUT: &str = "IMMICH_TIMEOUT";
pub const ENV_MAX_RETRIES: &str = "IMMICH_MAX_RETRIES";

const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 5..=120;
const RETRY_RANGE: std::ops::RangeInclusive<u32> = 0..=5;

/// Validated settings used to build an [`crate::ImmichClient`].
#[derive(Clone)]
pub struct ImmichConfig {
    base_url: Url,
    api_key: String,
    timeout_secs: u64,
    max_retries: u32,
}

impl ImmichConfig {
    /// Build a config with default timeout and retry count.
    pub fn new(base_url: &str, api_key: &str) -> ImmichResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ImmichError::Config(format!("Invalid Immich base URL '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ImmichError::Config(format!(
                "Immich base URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        let api_key = api_key.trim();
        if api_key.len() < MIN_API_KEY_LEN {
            return Err(ImmichError::Config(format!(
                "API key must be at least {MIN_API_KEY_LEN} characters long"
            )));
        }

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> ImmichResult<Self> {
        if !TIMEOUT_RANGE.contains(&secs) {
            return Err(ImmichError::Config(format!(
                "Timeout must be between {} and {} seconds, got {secs}",
                TIMEOUT_RANGE.start(),
                TIMEOUT_RANGE.end()
            )));
        }
        self.timeout_secs = secs;
        Ok(self)
    }

    pub fn with_max_retries(mut self, retries: u32) -> ImmichResult<Self> {
        if !RETRY_RANGE.contains(&retries) {
            return Err(ImmichError::Config(format!(
                "Max retries must be between {} and {}, got {retries}",
                RETRY_RANGE.start(),
                RETRY_RANGE.end()
            )));
        }
        self.max_retries = retries;
        Ok(self)
    }

    /// Load from `IMMICH_*` environment variables.
    pub fn from_env() -> ImmichResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ImmichResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                ImmichError::Config(format!(
                    "Immich base URL must be provided via argument or {ENV_BASE_URL} environment variable"
                ))
            })?;
        let api_key = lookup(ENV_API_KEY)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                ImmichError::Config(format!(
                    "Immich API key must be provided via argument or {ENV_API_KEY} environment variable"
                ))
            })?;

        let mut config = Self::new(&base_url, &api_key)?;

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ImmichError::Config(format!("{ENV_TIMEOUT} must be an integer, got '{raw}'"))
            })?;
            config = config.with_timeout_secs(secs)?;
        }
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            let retries = raw.trim().parse::<u32>().map_err(|_| {
                ImmichError::Config(format!("{ENV_MAX_RETRIES} must be an integer, got '{raw}'"))
            })?;
            config = config.with_max_retries(retries)?;
        }

        Ok(config)
    }

    /// Base URL of the REST API, always ending in `/api`.
    pub fn api_base(&self) -> String {
        let trimmed = self.base_url.as_str().trim_end_matches('/');
        if trimmed.ends_with("/api") {
            trimmed.to_string()
        } else {
            format!("{trimmed}/api")
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl fmt::Debug for ImmichConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmichConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
