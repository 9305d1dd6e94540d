//! The companion core: from one message to one composed reply.
//!
//! ```text
//! raw text ──▶ UserInput ──▶ Pipeline ──▶ [Emotion, Coping, Affirmation, Engagement]
//!    │            (≥ 4 chars)   (Flow)              │
//!    │                                              ▼
//!    └──────────▶ MoodMarker::classify ──▶ compose ──▶ Reply
//! ```
//!
//! - [`input`] — [`UserInput`], the minimum-length gate.
//! - [`persona`] — the four fixed [`Persona`] records and prompt templates.
//! - [`stage`] — [`StageKind`], the closed set of stages.
//! - [`pipeline`] — [`Pipeline`] dispatch and the ordered [`PipelineResult`].
//! - [`mood`] — [`MoodMarker`], the keyword mood classifier.
//! - [`compose`] — the composer and the [`Companion`] entry point.
//! - [`events`] — [`EventHandler`] observation of pipeline runs.

pub mod compose;
pub mod events;
pub mod input;
pub mod mood;
pub mod persona;
pub mod pipeline;
pub mod stage;

pub use compose::{CLARIFICATION_PROMPT, Companion, ComposedReply, Reply, compose};
pub use events::{EventHandler, FnEventHandler, LoggingHandler, NoopHandler, PipelineEvent};
pub use input::{MIN_INPUT_CHARS, UserInput};
pub use mood::MoodMarker;
pub use persona::Persona;
pub use pipeline::{Flow, Pipeline, PipelineResult, StageResult};
pub use stage::StageKind;
