//! The text-generation capability boundary.
//!
//! - [`backend`] — the [`TextGenerator`] trait the pipeline calls, and
//!   [`ChatBackend`], its implementation over
//!   [`OpenRouterClient`](crate::OpenRouterClient).
//! - [`retry`] — transient error detection and a doubling backoff.
//!   Retrying is the backend's concern only; the
//!   pipeline never retries a failed stage.

pub mod backend;
pub mod retry;

pub use backend::{ChatBackend, GenerateFuture, TextGenerator};
pub use retry::RetryConfig;
