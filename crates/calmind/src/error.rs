//! Error types shared by the client, the pipeline, and startup configuration.
//!
//! Three failure surfaces exist:
//!
//! - [`ClientError`] — a single text-generation call failed (transport,
//!   HTTP status, API error body, malformed or empty response, timeout).
//! - [`GenerationFailure`] — a pipeline stage failed; carries the stage and
//!   the underlying [`ClientError`]. This is the only error a request can
//!   produce once it has entered the pipeline.
//! - [`ConfigError`] — startup configuration is missing or invalid. Fatal;
//!   raised before any request is accepted.
//!
//! Input that is too short is *not* an error: it yields
//! [`Reply::Clarification`](crate::companion::Reply::Clarification).

use std::time::Duration;

use thiserror::Error;

use crate::companion::StageKind;

/// A failed call to the text-generation capability.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("API HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The endpoint answered 2xx but the body carried an error object.
    #[error("API error: {0}")]
    Api(String),

    /// The body was not a chat-completion response.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// No choice, or a choice without usable text.
    #[error("empty response from model")]
    EmptyResponse,

    /// The call did not finish within the per-call bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A pipeline stage could not produce its fragment.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {cause}")]
pub struct GenerationFailure {
    pub stage: StageKind,
    #[source]
    pub cause: ClientError,
}

impl GenerationFailure {
    pub fn new(stage: StageKind, cause: ClientError) -> Self {
        Self { stage, cause }
    }
}

/// Missing or invalid startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
