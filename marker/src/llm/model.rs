//! Language Model Trait
//!
//! [`LanguageModel`] is implemented by anything that can turn a prompt into text. The
//! production implementation is [`crate::llm::OllamaModel`]; tests plug in scripted models.

use crate::error::MarkerError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Keys owned by the request envelope; options may not override them.
const RESERVED_KEYS: [&str; 3] = ["model", "prompt", "stream"];

/// Extra generation parameters merged into the request body (e.g. `temperature`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    values: Map<String, Value>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option. Reserved envelope keys (`model`, `prompt`, `stream`) are ignored.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, "ignoring reserved generation option");
            return self;
        }
        self.values.insert(key, value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

/// A text generator behind a single request/response call.
///
/// Implementations issue exactly one request per call: timeouts and retries are layered
/// on top by [`crate::llm::LlmClient`].
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerateOptions)
    -> Result<String, MarkerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reserved_keys_are_dropped() {
        let options = GenerateOptions::new()
            .with("temperature", 0.2)
            .with("model", "other")
            .with("stream", true);
        assert_eq!(options.as_map().len(), 1);
        assert_eq!(options.as_map()["temperature"], json!(0.2));
    }
}
