//! Emotional-support companion built on a four-stage LLM pipeline.
//!
//! `calmind` turns one free-text message about how someone feels into a
//! single composed reply: a recognized emotional state, a coping tip, an
//! affirmation, and a follow-up question, followed by a mood emoji chosen
//! from the raw message. The four fragments come from four role-specialized
//! generation stages run against an OpenAI-compatible chat completions
//! endpoint ([OpenRouter](https://openrouter.ai/) by default).
//!
//! # Getting started
//!
//! ```ignore
//! use calmind::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENROUTER_KEY and the CALMIND_* variables (and .env if present).
//!     let config = CompanionConfig::from_env()?;
//!     let companion = Companion::from_config(&config)?;
//!
//!     match companion.handle("I feel really anxious about tomorrow").await? {
//!         Reply::Clarification => println!("{}", CLARIFICATION_PROMPT),
//!         Reply::Composed(reply) => println!("{}", reply.text),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Entry point:** [`Companion::handle`](companion::Companion::handle)
//!   validates input, runs the pipeline, and composes the reply.
//! - **Stages and personas:** [`StageKind`](companion::StageKind) is the
//!   closed set of four stages; [`companion::persona`] holds their fixed
//!   role descriptions and prompt templates.
//! - **Dispatch:** [`Pipeline`](companion::Pipeline) runs the stages
//!   according to a [`Flow`](companion::Flow) (concurrent fan-out by
//!   default) and always assembles fragments in stage order.
//! - **Mood emoji:** [`MoodMarker::classify`](companion::MoodMarker::classify).
//! - **Plugging in a model:** implement [`TextGenerator`](api::TextGenerator),
//!   or use [`ChatBackend`](api::ChatBackend) over [`OpenRouterClient`].
//! - **Observing runs:** implement [`EventHandler`](companion::EventHandler).
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`companion`] | Input validation, personas, stages, pipeline, mood classifier, composer |
//! | [`api`] | [`TextGenerator`](api::TextGenerator) seam, chat backend, retry policy |
//! | [`config`] | Startup configuration from the environment |
//! | [`error`] | Client, generation, and configuration errors |

pub mod api;
pub mod companion;
pub mod config;
pub mod error;
pub mod prelude;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::error::{ClientError, ConfigError};

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for all stage calls.
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion budget per stage. Fragments are one or two sentences.
pub const DEFAULT_MAX_TOKENS: u32 = 512;

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body. A zero `max_tokens` is omitted so the
/// endpoint applies its own limit.
#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    pub temperature: f32,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

// ── Message types ──────────────────────────────────────────────────

/// Who a message speaks for: the persona context or the stage prompt.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// One message of a stage request.
#[derive(Serialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Token counts reported by the endpoint; logged, not returned.
#[derive(Deserialize, Debug)]
struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// Map an HTTP status and body onto the generated text or a [`ClientError`].
///
/// A completion without a choice, or whose content is blank, is an
/// [`ClientError::EmptyResponse`]: a stage never yields an empty fragment.
fn parse_completion(status: u16, text: &str) -> Result<String, ClientError> {
    if !(200..300).contains(&status) {
        return Err(ClientError::Http {
            status,
            body: text.to_string(),
        });
    }

    let parsed: RawChatResponse = serde_json::from_str(text)?;

    if let Some(err) = parsed.error {
        return Err(ClientError::Api(err.message));
    }

    if let Some(usage) = parsed.usage {
        debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
            usage.total_tokens.unwrap_or(0),
        );
    }

    parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ClientError::EmptyResponse)
}

// ── Client ─────────────────────────────────────────────────────────

const REFERER: &str = "https://github.com/calmind/calmind-rs";
const TITLE: &str = "calmind";

/// Async HTTP client for an OpenAI-compatible chat completions endpoint.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl OpenRouterClient {
    /// Create a new client for the default OpenRouter endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_url(api_key, OPENROUTER_URL)
    }

    /// Create a new client for a custom OpenAI-compatible endpoint.
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("calmind/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            url: url.into(),
        })
    }

    /// Send a chat completion request and return the generated text.
    pub async fn chat(&self, body: &ChatRequest) -> Result<String, ClientError> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        let content = parse_completion(status.as_u16(), &text)?;
        debug!("LLM output: {} chars text", content.len());
        Ok(content)
    }
}
