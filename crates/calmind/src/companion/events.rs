//! Observation of pipeline runs.
//!
//! The [`Pipeline`](super::Pipeline) reports what it does through
//! [`PipelineEvent`] values delivered to an [`EventHandler`]. Handlers are
//! purely observational; they cannot change the outcome of a run.
//!
//! | Handler | Use case |
//! |---------|----------|
//! | [`NoopHandler`] | Tests or silent runs |
//! | [`LoggingHandler`] | Structured logging via `tracing` (the default) |
//! | [`FnEventHandler`] | Quick closures for simple callbacks |

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::companion::pipeline::Flow;
use crate::companion::stage::StageKind;
use crate::error::ClientError;

/// Events emitted during a pipeline run.
#[derive(Debug)]
pub enum PipelineEvent<'a> {
    /// A run is starting.
    RunStarted { flow: Flow },
    /// A stage call is being issued.
    StageStarted { stage: StageKind },
    /// A stage produced its fragment.
    StageCompleted {
        stage: StageKind,
        chars: usize,
        elapsed: Duration,
    },
    /// A stage failed; the run is about to abort.
    StageFailed {
        stage: StageKind,
        error: &'a ClientError,
    },
    /// All four fragments are available.
    RunFinished { elapsed: Duration },
}

/// Handler for pipeline events.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &PipelineEvent<'_>) {
        let _ = event;
    }
}

/// A no-op event handler.
pub struct NoopHandler;
impl EventHandler for NoopHandler {}

/// An event handler backed by a closure.
///
/// ```ignore
/// let handler = FnEventHandler::new(|event| {
///     if let PipelineEvent::StageFailed { stage, .. } = event {
///         eprintln!("{stage} failed");
///     }
/// });
/// ```
pub struct FnEventHandler<F>
where
    F: Fn(&PipelineEvent<'_>) + Send + Sync,
{
    f: F,
}

impl<F> FnEventHandler<F>
where
    F: Fn(&PipelineEvent<'_>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventHandler for FnEventHandler<F>
where
    F: Fn(&PipelineEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &PipelineEvent<'_>) {
        (self.f)(event);
    }
}

/// Logs pipeline events through `tracing`.
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn on_event(&self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::RunStarted { flow } => {
                debug!("Pipeline run started (flow: {flow})");
            }
            PipelineEvent::StageStarted { stage } => {
                debug!("[{stage}] generating");
            }
            PipelineEvent::StageCompleted {
                stage,
                chars,
                elapsed,
            } => {
                debug!(
                    "[{stage}] done: {chars} chars in {:.1}s",
                    elapsed.as_secs_f64()
                );
            }
            PipelineEvent::StageFailed { stage, error } => {
                warn!("[{stage}] failed: {error}");
            }
            PipelineEvent::RunFinished { elapsed } => {
                info!("Pipeline finished in {:.1}s", elapsed.as_secs_f64());
            }
        }
    }
}
