//! # arthur-adapter-gemini
//!
//! [`LanguageModel`] backed by the Gemini `generateContent` REST endpoint.
//!
//! ## Dependency rule
//! Depends on `arthur-app` (for port traits) and `arthur-domain` (for domain types).

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use arthur_app::ports::{LanguageModel, ModelRequest};
use arthur_domain::error::InterpretationError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl GeminiConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

/// Errors raised while setting up or calling the Gemini API.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("gemini api key is empty")]
    MissingApiKey,

    #[error("http client error")]
    Http(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
}

impl<'a> From<ModelRequest<'a>> for GenerateRequest<'a> {
    fn from(request: ModelRequest<'a>) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: request.system_instruction,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part {
                    text: request.utterance,
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|part| part.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Gemini REST client.
#[derive(Debug, Clone)]
pub struct GeminiModel {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiModel {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError`] when the API key is blank or the HTTP client
    /// cannot be created.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key,
        })
    }

    async fn call(&self, request: ModelRequest<'_>) -> Result<String, InterpretationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest::from(request))
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(InterpretationError::Unauthorized);
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "gemini request rejected");
            return Err(InterpretationError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response.json().await.map_err(map_transport)?;
        body.text().ok_or(InterpretationError::EmptyResponse)
    }
}

fn map_transport(err: reqwest::Error) -> InterpretationError {
    if err.is_timeout() {
        InterpretationError::Timeout
    } else {
        // The url carries the api key.
        InterpretationError::Request(Box::new(GeminiError::Http(err.without_url())))
    }
}

impl LanguageModel for GeminiModel {
    fn generate(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<String, InterpretationError>> + Send {
        self.call(request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(String, String, serde_json::Value)>>>,
    }

    async fn spawn_server(status: StatusCode, reply: serde_json::Value) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/v1beta/models/{call}",
                post(
                    move |State(captured): State<Captured>,
                          Path(call): Path<String>,
                          Query(query): Query<std::collections::HashMap<String, String>>,
                          Json(body): Json<serde_json::Value>| {
                        let reply = reply.clone();
                        async move {
                            let key = query.get("key").cloned().unwrap_or_default();
                            captured.requests.lock().await.push((call, key, body));
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), captured)
    }

    fn model(base_url: String) -> GeminiModel {
        let mut config = GeminiConfig::new("secret");
        config.base_url = base_url;
        GeminiModel::new(config).unwrap()
    }

    fn request() -> ModelRequest<'static> {
        ModelRequest {
            system_instruction: "You are Arthur",
            utterance: "lock the door",
        }
    }

    #[tokio::test]
    async fn should_return_first_candidate_text() {
        let (url, captured) = spawn_server(
            StatusCode::OK,
            serde_json::json!({
                "candidates": [{"content": {"parts": [
                    {"text": "```json\n{\"devices_controlled\":[\"lock\"],"},
                    {"text": "\"action\":[\"lock\"]}\n```\nThe door is locked."}
                ]}}]
            }),
        )
        .await;

        let text = model(url).generate(request()).await.unwrap();

        assert!(text.starts_with("```json"));
        assert!(text.ends_with("The door is locked."));
        let requests = captured.requests.lock().await;
        let (call, key, body) = &requests[0];
        assert_eq!(call, "gemini-1.5-flash:generateContent");
        assert_eq!(key, "secret");
        assert_eq!(
            body["system_instruction"]["parts"][0]["text"],
            "You are Arthur"
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "lock the door");
    }

    #[tokio::test]
    async fn should_map_forbidden_to_unauthorized() {
        let (url, _) = spawn_server(StatusCode::FORBIDDEN, serde_json::json!({})).await;
        let result = model(url).generate(request()).await;
        assert!(matches!(result, Err(InterpretationError::Unauthorized)));
    }

    #[tokio::test]
    async fn should_map_server_error_to_status() {
        let (url, _) = spawn_server(StatusCode::SERVICE_UNAVAILABLE, serde_json::json!({})).await;
        let result = model(url).generate(request()).await;
        assert!(matches!(result, Err(InterpretationError::Status(503))));
    }

    #[tokio::test]
    async fn should_report_empty_response_without_candidates() {
        let (url, _) = spawn_server(StatusCode::OK, serde_json::json!({"candidates": []})).await;
        let result = model(url).generate(request()).await;
        assert!(matches!(result, Err(InterpretationError::EmptyResponse)));
    }

    #[tokio::test]
    async fn should_map_unreachable_host_to_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = model(format!("http://{addr}")).generate(request()).await;

        let err = result.unwrap_err();
        assert!(matches!(err, InterpretationError::Request(_)));
        let message = arthur_domain::error::report(&err);
        assert!(!message.contains("secret"), "{message}");
        assert!(!message.contains("key="), "{message}");
    }

    #[test]
    fn should_default_to_flash_model() {
        let config: GeminiConfig = serde_json::from_str("{\"api_key\": \"k\"}").unwrap();
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn should_reject_blank_api_key() {
        let result = GeminiModel::new(GeminiConfig::new("  "));
        assert!(matches!(result, Err(GeminiError::MissingApiKey)));
    }
}
