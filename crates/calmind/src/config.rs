//! Startup configuration.
//!
//! [`CompanionConfig`] is read once, before the first request, and is
//! read-only afterwards. [`CompanionConfig::from_env`] loads a `.env` file
//! if one exists and then reads:
//!
//! | Variable | Default | |
//! |----------|---------|-|
//! | `OPENROUTER_KEY` | — | required; `OPENAI_API_KEY` is accepted instead when the URL is OpenAI's |
//! | `CALMIND_MODEL` | `openai/gpt-3.5-turbo` | model identifier |
//! | `CALMIND_TEMPERATURE` | `0.7` | `0.0..=2.0` |
//! | `CALMIND_MAX_TOKENS` | `512` | per stage call |
//! | `CALMIND_API_URL` | OpenRouter | chat completions endpoint |
//! | `CALMIND_STAGE_TIMEOUT_SECS` | `60` | per stage call |
//! | `CALMIND_RETRIES` | `0` | transient failures only |
//! | `CALMIND_FLOW` | `fan-out` | `fan-out`, `sequential`, `emotion-first` |

use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::api::retry::RetryConfig;
use crate::companion::Flow;
use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "OPENROUTER_KEY";

/// Fallback credential, honored only for an `api.openai.com` endpoint.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Default bound on a single stage call.
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Process-wide companion configuration.
#[derive(Clone)]
pub struct CompanionConfig {
    /// API credential. Never logged.
    pub api_key: String,
    /// Chat completions endpoint. Default: [`OPENROUTER_URL`](crate::OPENROUTER_URL).
    pub api_url: String,
    /// Model identifier. Default: [`DEFAULT_MODEL`](crate::DEFAULT_MODEL).
    pub model: String,
    /// Sampling temperature. Default: `0.7`.
    pub temperature: f32,
    /// Maximum tokens per stage response. Default: `512`.
    pub max_tokens: u32,
    /// Bound on each stage call. Default: 60 s.
    pub stage_timeout: Duration,
    /// Backend retry policy. Default: no retries.
    pub retry: RetryConfig,
    /// Stage dispatch. Default: [`Flow::FanOut`].
    pub flow: Flow,
}

impl std::fmt::Debug for CompanionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanionConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("stage_timeout", &self.stage_timeout)
            .field("retry", &self.retry)
            .field("flow", &self.flow)
            .finish()
    }
}

impl CompanionConfig {
    /// Configuration with defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: crate::OPENROUTER_URL.to_string(),
            model: crate::DEFAULT_MODEL.to_string(),
            temperature: crate::DEFAULT_TEMPERATURE,
            max_tokens: crate::DEFAULT_MAX_TOKENS,
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
            retry: RetryConfig::default(),
            flow: Flow::default(),
        }
    }

    /// Load `.env` (if present) and read configuration from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => debug!("Ignoring unreadable .env: {e}"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_blank("CALMIND_API_URL");
        let targets_openai = api_url
            .as_deref()
            .is_some_and(|url| url.contains("api.openai.com"));
        let api_key = non_blank(API_KEY_VAR)
            .or_else(|| targets_openai.then(|| non_blank(OPENAI_KEY_VAR)).flatten())
            .ok_or(ConfigError::Missing(API_KEY_VAR))?;

        let mut config = Self::new(api_key);

        if let Some(model) = non_blank("CALMIND_MODEL") {
            config.model = model;
        }
        if let Some(url) = api_url {
            config.api_url = url;
        }
        if let Some(raw) = lookup("CALMIND_TEMPERATURE") {
            let temperature: f32 = parse_var("CALMIND_TEMPERATURE", &raw)?;
            config = config.with_temperature(temperature)?;
        }
        if let Some(raw) = lookup("CALMIND_MAX_TOKENS") {
            config.max_tokens = parse_positive("CALMIND_MAX_TOKENS", &raw)?;
        }
        if let Some(raw) = lookup("CALMIND_STAGE_TIMEOUT_SECS") {
            let secs: u32 = parse_positive("CALMIND_STAGE_TIMEOUT_SECS", &raw)?;
            config.stage_timeout = Duration::from_secs(u64::from(secs));
        }
        if let Some(raw) = lookup("CALMIND_RETRIES") {
            config.retry = RetryConfig::with_retries(parse_var("CALMIND_RETRIES", &raw)?);
        }
        if let Some(raw) = lookup("CALMIND_FLOW") {
            config.flow = parse_var("CALMIND_FLOW", &raw)?;
        }

        Ok(config)
    }

    /// Set the sampling temperature, rejecting values outside `0.0..=2.0`.
    pub fn with_temperature(mut self, temperature: f32) -> Result<Self, ConfigError> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                key: "CALMIND_TEMPERATURE",
                value: temperature.to_string(),
                reason: "must be between 0.0 and 2.0".into(),
            });
        }
        self.temperature = temperature;
        Ok(self)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }
}

fn parse_var<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    match parse_var::<u32>(key, raw)? {
        0 => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "must be greater than zero".into(),
        }),
        n => Ok(n),
    }
}
