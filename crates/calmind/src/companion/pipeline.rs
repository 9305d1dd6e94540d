//! Four-stage dispatch with ordered assembly.
//!
//! A [`Pipeline`] issues one generation call per [`StageKind`] and returns
//! a [`PipelineResult`] holding the four fragments in stage order. How the
//! calls are dispatched is chosen by [`Flow`]:
//!
//! - [`Flow::FanOut`] (default) — all four calls concurrently, each from the
//!   raw message alone.
//! - [`Flow::Sequential`] — one call at a time, in stage order.
//! - [`Flow::EmotionFirst`] — Emotion first; its fragment is then threaded
//!   into the three remaining prompts, which run concurrently.
//!
//! Every call is bounded by the stage timeout. The first failure aborts the
//! run: pending calls are dropped and no partial result is returned.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::{ChatBackend, TextGenerator};
use crate::companion::events::{EventHandler, LoggingHandler, PipelineEvent};
use crate::companion::input::UserInput;
use crate::companion::stage::StageKind;
use crate::config::{CompanionConfig, DEFAULT_STAGE_TIMEOUT};
use crate::error::{ClientError, ConfigError, GenerationFailure};

/// How the four stage calls are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Concurrent, independent stages.
    #[default]
    FanOut,
    /// One stage at a time, in stage order, independent prompts.
    Sequential,
    /// Emotion first, then the rest concurrently with the Emotion fragment
    /// added to their prompts.
    EmotionFirst,
}

impl Flow {
    pub fn as_str(self) -> &'static str {
        match self {
            Flow::FanOut => "fan-out",
            Flow::Sequential => "sequential",
            Flow::EmotionFirst => "emotion-first",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fan-out" | "fanout" | "concurrent" => Ok(Flow::FanOut),
            "sequential" => Ok(Flow::Sequential),
            "emotion-first" | "threaded" => Ok(Flow::EmotionFirst),
            other => Err(format!(
                "unknown flow '{other}' (expected fan-out, sequential, or emotion-first)"
            )),
        }
    }
}

/// One stage's fragment.
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage: StageKind,
    pub text: String,
    pub elapsed: Duration,
}

/// The four fragments of one run, in stage order.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    fragments: [StageResult; 4],
}

impl PipelineResult {
    fn new(
        emotion: StageResult,
        coping: StageResult,
        affirmation: StageResult,
        engagement: StageResult,
    ) -> Self {
        Self {
            fragments: [emotion, coping, affirmation, engagement],
        }
    }

    /// The fragment produced by `stage`.
    pub fn get(&self, stage: StageKind) -> &StageResult {
        &self.fragments[stage.index()]
    }

    /// Fragments in stage order.
    pub fn iter(&self) -> impl Iterator<Item = &StageResult> {
        self.fragments.iter()
    }

    pub fn texts(&self) -> [&str; 4] {
        let [e, c, a, g] = &self.fragments;
        [e.text.as_str(), c.text.as_str(), a.text.as_str(), g.text.as_str()]
    }
}

/// Runs the four stages against one generator.
///
/// Holds no per-request state, so one pipeline can serve concurrent
/// requests behind an `Arc`.
pub struct Pipeline {
    generator: Arc<dyn TextGenerator>,
    flow: Flow,
    stage_timeout: Duration,
    events: Arc<dyn EventHandler>,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            flow: Flow::default(),
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
            events: Arc::new(LoggingHandler),
        }
    }

    /// Build a pipeline over a [`ChatBackend`] from startup configuration.
    pub fn from_config(config: &CompanionConfig) -> Result<Self, ConfigError> {
        let backend = ChatBackend::from_config(config)?;
        Ok(Self::new(Arc::new(backend))
            .with_flow(config.flow)
            .with_stage_timeout(config.stage_timeout))
    }

    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.events = handler;
        self
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Run all four stages for `input`.
    pub async fn execute(&self, input: &UserInput) -> Result<PipelineResult, GenerationFailure> {
        let start = Instant::now();
        self.events
            .on_event(&PipelineEvent::RunStarted { flow: self.flow });

        let text = input.as_str();
        let result = match self.flow {
            Flow::FanOut => {
                let (e, c, a, g) = futures::try_join!(
                    self.run_stage(StageKind::Emotion, text, None),
                    self.run_stage(StageKind::Coping, text, None),
                    self.run_stage(StageKind::Affirmation, text, None),
                    self.run_stage(StageKind::Engagement, text, None),
                )?;
                PipelineResult::new(e, c, a, g)
            }
            Flow::Sequential => {
                let e = self.run_stage(StageKind::Emotion, text, None).await?;
                let c = self.run_stage(StageKind::Coping, text, None).await?;
                let a = self.run_stage(StageKind::Affirmation, text, None).await?;
                let g = self.run_stage(StageKind::Engagement, text, None).await?;
                PipelineResult::new(e, c, a, g)
            }
            Flow::EmotionFirst => {
                let e = self.run_stage(StageKind::Emotion, text, None).await?;
                let state = Some(e.text.as_str());
                let (c, a, g) = futures::try_join!(
                    self.run_stage(StageKind::Coping, text, state),
                    self.run_stage(StageKind::Affirmation, text, state),
                    self.run_stage(StageKind::Engagement, text, state),
                )?;
                PipelineResult::new(e, c, a, g)
            }
        };

        self.events.on_event(&PipelineEvent::RunFinished {
            elapsed: start.elapsed(),
        });
        Ok(result)
    }

    async fn run_stage(
        &self,
        stage: StageKind,
        input: &str,
        emotion: Option<&str>,
    ) -> Result<StageResult, GenerationFailure> {
        let context = stage.persona().context();
        let prompt = stage.prompt(input, emotion);

        self.events.on_event(&PipelineEvent::StageStarted { stage });
        let started = Instant::now();

        let outcome = match tokio::time::timeout(
            self.stage_timeout,
            self.generator.generate(&context, &prompt),
        )
        .await
        {
            Ok(Ok(text)) if text.trim().is_empty() => Err(ClientError::EmptyResponse),
            Ok(outcome) => outcome,
            Err(_) => Err(ClientError::Timeout(self.stage_timeout)),
        };

        match outcome {
            Ok(text) => {
                let elapsed = started.elapsed();
                self.events.on_event(&PipelineEvent::StageCompleted {
                    stage,
                    chars: text.chars().count(),
                    elapsed,
                });
                Ok(StageResult {
                    stage,
                    text,
                    elapsed,
                })
            }
            Err(error) => {
                self.events
                    .on_event(&PipelineEvent::StageFailed { stage, error: &error });
                Err(GenerationFailure::new(stage, error))
            }
        }
    }
}
