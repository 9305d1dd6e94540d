//! The [`TextGenerator`] seam and its chat-completions implementation.
//!
//! A generator is given a *context* (who the model should be) and a
//! *prompt* (what to do) and returns generated text. The pipeline only
//! ever talks to `dyn TextGenerator`, so tests swap in stubs and other
//! providers can be plugged in by implementing one method.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::api::retry::RetryConfig;
use crate::config::CompanionConfig;
use crate::error::{ClientError, ConfigError};
use crate::{ChatRequest, Message, OpenRouterClient};

/// Boxed future returned by [`TextGenerator::generate`].
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ClientError>> + Send + 'a>>;

/// A text-generation capability: context + prompt in, text out.
///
/// # Example
///
/// ```ignore
/// struct Echo;
///
/// impl TextGenerator for Echo {
///     fn generate<'a>(&'a self, _context: &'a str, prompt: &'a str) -> GenerateFuture<'a> {
///         Box::pin(async move { Ok(prompt.to_string()) })
///     }
/// }
/// ```
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`, conditioned on `context`.
    fn generate<'a>(&'a self, context: &'a str, prompt: &'a str) -> GenerateFuture<'a>;
}

/// [`TextGenerator`] over an OpenAI-compatible chat completions endpoint.
///
/// Sends the context as the system message and the prompt as the user
/// message. Retries transient failures according to its [`RetryConfig`]
/// (none by default).
#[derive(Debug)]
pub struct ChatBackend {
    client: OpenRouterClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
    retry: RetryConfig,
}

impl ChatBackend {
    pub fn new(client: OpenRouterClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: crate::DEFAULT_TEMPERATURE,
            max_tokens: crate::DEFAULT_MAX_TOKENS,
            retry: RetryConfig::default(),
        }
    }

    /// Build a backend (and its HTTP client) from startup configuration.
    pub fn from_config(config: &CompanionConfig) -> Result<Self, ConfigError> {
        let client = OpenRouterClient::with_url(config.api_key.clone(), config.api_url.clone())?;
        Ok(Self::new(client, config.model.clone())
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
            .with_retry(config.retry.clone()))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, context: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(context), Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl TextGenerator for ChatBackend {
    fn generate<'a>(&'a self, context: &'a str, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move {
            let body = self.request(context, prompt);
            let mut attempt = 0;
            loop {
                match self.client.chat(&body).await {
                    Ok(text) => return Ok(text),
                    Err(e) if self.retry.should_retry(&e, attempt) => {
                        let delay = self.retry.delay(attempt);
                        warn!(
                            "Generation attempt {} failed ({e}); retrying in {:.1}s",
                            attempt + 1,
                            delay.as_secs_f64()
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    Err(e) => {
                        debug!("Generation failed after {} attempt(s): {e}", attempt + 1);
                        return Err(e);
                    }
                }
            }
        })
    }
}
