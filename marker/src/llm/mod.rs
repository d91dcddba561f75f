//! # LLM Module
//!
//! Everything needed to talk to the external generative-model service.
//!
//! - [`model`]: the [`LanguageModel`] trait, the seam between the grader and the endpoint.
//! - [`ollama`]: HTTP implementation of the `POST {base}/api/generate` contract.
//! - [`client`]: [`LlmClient`], which adds the per-call timeout, the retry policy and the
//!   task-specific helpers (SQL analysis, solution comparison, feedback).
//! - [`prompts`]: prompt builders used by the helpers.
//! - [`retry`]: the injectable [`RetryPolicy`].

pub mod client;
pub mod model;
pub mod ollama;
pub mod prompts;
pub mod retry;

pub use client::LlmClient;
pub use model::{GenerateOptions, LanguageModel};
pub use ollama::OllamaModel;
pub use retry::RetryPolicy;
