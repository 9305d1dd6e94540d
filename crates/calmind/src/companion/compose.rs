//! Reply composition and the [`Companion`] entry point.

use std::sync::Arc;

use tracing::{info, trace};

use crate::api::TextGenerator;
use crate::companion::input::UserInput;
use crate::companion::mood::MoodMarker;
use crate::companion::pipeline::{Pipeline, PipelineResult};
use crate::config::CompanionConfig;
use crate::error::{ConfigError, GenerationFailure};

/// Returned instead of running the pipeline when the message is too short.
pub const CLARIFICATION_PROMPT: &str = "Could you tell me a bit more about how you're feeling?";

/// The four fragments joined in stage order, followed by the mood marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedReply {
    pub text: String,
    pub mood: MoodMarker,
}

/// Join the fragments in stage order with no separator and append the
/// marker's emoji.
pub fn compose(result: &PipelineResult, mood: MoodMarker) -> ComposedReply {
    let mut text: String = result.texts().concat();
    text.push_str(mood.emoji());
    ComposedReply { text, mood }
}

/// Outcome of [`Companion::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The message was too short; ask for more. No generation happened.
    Clarification,
    Composed(ComposedReply),
}

impl Reply {
    /// The text to show the user.
    pub fn text(&self) -> &str {
        match self {
            Reply::Clarification => CLARIFICATION_PROMPT,
            Reply::Composed(reply) => &reply.text,
        }
    }

    pub fn mood(&self) -> Option<MoodMarker> {
        match self {
            Reply::Clarification => None,
            Reply::Composed(reply) => Some(reply.mood),
        }
    }

    pub fn is_clarification(&self) -> bool {
        matches!(self, Reply::Clarification)
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Clarification => CLARIFICATION_PROMPT.to_string(),
            Reply::Composed(reply) => reply.text,
        }
    }
}

/// Entry point: validate, run the pipeline, compose.
///
/// Cheap to share behind an `Arc`; every call is independent.
pub struct Companion {
    pipeline: Pipeline,
}

impl Companion {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// A companion with a default pipeline over `generator`.
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(Pipeline::new(generator))
    }

    /// A companion over the configured chat backend.
    pub fn from_config(config: &CompanionConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(Pipeline::from_config(config)?))
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Turn one raw message into a reply.
    ///
    /// Messages shorter than [`MIN_INPUT_CHARS`](super::MIN_INPUT_CHARS)
    /// after trimming yield [`Reply::Clarification`] without any generation
    /// call. Otherwise all four stages must succeed; any
    /// [`GenerationFailure`] is returned as-is and nothing partial escapes.
    pub async fn handle(&self, raw: &str) -> Result<Reply, GenerationFailure> {
        let Some(input) = UserInput::new(raw) else {
            info!("Message too short; asking for more");
            return Ok(Reply::Clarification);
        };
        trace!("Handling message: {input}");

        let result = self.pipeline.execute(&input).await?;
        let mood = MoodMarker::classify(input.as_str());
        let reply = compose(&result, mood);
        info!(
            "Composed reply: {} chars, mood {}",
            reply.text.chars().count(),
            mood.name()
        );
        Ok(Reply::Composed(reply))
    }
}
