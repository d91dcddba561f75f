//! # Generate Endpoint Model
//!
//! [`OllamaModel`] implements [`LanguageModel`] over the `/api/generate` HTTP contract:
//!
//! ```text
//! POST {base_url}/api/generate
//! { "model": "<name>", "prompt": "<text>", "stream": false, ...options }
//!
//! 200 OK
//! { "response": "<completion>", ... }
//! ```
//!
//! Transport failures and non-success statuses map to [`MarkerError::LlmUnavailable`]; a
//! success status with a body lacking `response` maps to [`MarkerError::InvalidResponse`].

use crate::error::MarkerError;
use crate::llm::model::{GenerateOptions, LanguageModel};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for the generate endpoint.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(flatten)]
    options: &'a Map<String, Value>,
}

/// Response from the generate endpoint; extra fields are ignored.
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for a model served behind `/api/generate`.
#[derive(Debug, Clone)]
pub struct OllamaModel {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaModel {
    pub fn new(base_url: &str, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LanguageModel for OllamaModel {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, MarkerError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: options.as_map(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| MarkerError::LlmUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarkerError::LlmUnavailable(format!(
                "endpoint answered with status {status}"
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| MarkerError::LlmUnavailable(e.to_string()))?;

        serde_json::from_str::<GenerateResponse>(&response_text)
            .map(|body| body.response)
            .map_err(|e| MarkerError::InvalidResponse(format!("error decoding response body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let model = OllamaModel::new("http://localhost:11434/", "llama3");
        assert_eq!(model.endpoint(), "http://localhost:11434/api/generate");
    }

    #[tokio::test]
    async fn sends_contract_body_and_reads_response() {
        let app = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "llama3");
                assert_eq!(body["stream"], false);
                assert_eq!(body["temperature"], 0.1);
                Json(json!({
                    "model": "llama3",
                    "response": format!("echo: {}", body["prompt"].as_str().unwrap_or_default()),
                    "done": true
                }))
            }),
        );
        let base = serve(app).await;

        let model = OllamaModel::new(&base, "llama3");
        let options = GenerateOptions::new().with("temperature", 0.1);
        let text = model.generate("SELECT 1", &options).await.unwrap();
        assert_eq!(text, "echo: SELECT 1");
    }

    #[tokio::test]
    async fn error_status_is_unavailable() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "model loading") }),
        );
        let base = serve(app).await;

        let err = OllamaModel::new(&base, "llama3")
            .generate("prompt", &GenerateOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MarkerError::LlmUnavailable(_)));
    }

    #[tokio::test]
    async fn body_without_response_is_invalid() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { Json(json!({ "error": "unexpected" })) }),
        );
        let base = serve(app).await;

        let err = OllamaModel::new(&base, "llama3")
            .generate("prompt", &GenerateOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MarkerError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = OllamaModel::new(&format!("http://{addr}"), "llama3")
            .generate("prompt", &GenerateOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MarkerError::LlmUnavailable(_)));
    }
}
