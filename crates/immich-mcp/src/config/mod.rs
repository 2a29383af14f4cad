//! Connection settings from CLI flags and `IMMICH_*` environment variables.

use clap::Args;

use immich_core::config::{ENV_API_KEY, ENV_BASE_URL, ENV_MAX_RETRIES, ENV_TIMEOUT};
use immich_core::{ImmichConfig, ImmichResult};

/// Flags shared by every subcommand that talks to Immich.
/// A flag wins over its environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Base URL of the Immich server, e.g. http://localhost:2283.
    #[arg(long, env = "IMMICH_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Immich API key.
    #[arg(long, env = "IMMICH_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds (5-120).
    #[arg(long, env = "IMMICH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Retries for failed requests (0-5).
    #[arg(long, env = "IMMICH_MAX_RETRIES", global = true)]
    pub max_retries: Option<u32>,
}

impl ConnectionArgs {
    /// Validate into an [`ImmichConfig`].
    pub fn resolve(&self) -> ImmichResult<ImmichConfig> {
        ImmichConfig::from_lookup(|key| match key {
            ENV_BASE_URL => self.base_url.clone(),
            ENV_API_KEY => self.api_key.clone(),
            ENV_TIMEOUT => self.timeout.map(|t| t.to_string()),
            ENV_MAX_RETRIES => self.max_retries.map(|r| r.to_string()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_flags_into_config() {
        let args = ConnectionArgs {
            base_url: Some("http://immich.local:2283".to_string()),
            api_key: Some("0123456789abcdef".to_string()),
            timeout: Some(10),
            max_retries: None,
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.api_base(), "http://immich.local:2283/api");
        assert_eq!(config.timeout().as_secs(), 10);
        assert_eq!(config.max_retries(), 3);
    }

    #[test]
    fn missing_url_is_a_config_error() {
        let err = ConnectionArgs::default().resolve().unwrap_err();
        assert!(err.to_string().contains("IMMICH_BASE_URL"));
    }
}
