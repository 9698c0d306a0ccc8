//! Runtime configuration.
//!
//! Remote-call parameters are read once in `main` (after `dotenvy` loads
//! `.env`) and injected into the components that need them. The classifier
//! never reads ambient process state — a test constructs a
//! `ClassifierConfig` pointing at a mock server with a dummy key.

use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_TOKENS: u32 = 8;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    /// Bound on the whole remote call — a stalled endpoint must not stall
    /// the monitor loop.
    pub timeout: Duration,
}

impl ClassifierConfig {
    /// Defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build from the environment.
    ///
    /// `ANTHROPIC_API_KEY` is required; `MIND_GLASS_ENDPOINT`,
    /// `MIND_GLASS_MODEL` and `MIND_GLASS_TIMEOUT_SECS` override defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Ok(endpoint) = std::env::var("MIND_GLASS_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("MIND_GLASS_MODEL") {
            config.model = model;
        }
        if let Ok(raw) = std::env::var("MIND_GLASS_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("MIND_GLASS_TIMEOUT_SECS", raw))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ANTHROPIC_API_KEY is not set (put it in the environment or a .env file)")]
    MissingApiKey,

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
