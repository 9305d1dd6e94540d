//! Convenience re-exports for common `calmind` types.
//!
//! ```ignore
//! use calmind::prelude::*;
//! ```

// ── Client ──────────────────────────────────────────────────────────
pub use crate::{ChatRequest, Message, OpenRouterClient};

// ── Capability seam ─────────────────────────────────────────────────
pub use crate::api::{ChatBackend, GenerateFuture, RetryConfig, TextGenerator};

// ── Companion core ──────────────────────────────────────────────────
pub use crate::companion::{
    CLARIFICATION_PROMPT, Companion, ComposedReply, EventHandler, FnEventHandler, Flow,
    LoggingHandler, MoodMarker, NoopHandler, Pipeline, PipelineEvent, PipelineResult, Reply,
    StageKind, StageResult, UserInput,
};

// ── Configuration and errors ────────────────────────────────────────
pub use crate::config::CompanionConfig;
pub use crate::error::{ClientError, ConfigError, GenerationFailure};
