//! OpenAI-compatible chat backend
//!
//! Talks to any `/chat/completions` endpoint that supports JSON response
//! mode. The pipeline needs exactly one call shape: system + user prompt
//! in, a single JSON object out.

use serde::Deserialize;
use serde_json::Value;

use crate::error::BackendError;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Default API base
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// One JSON-mode chat call
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub model: String,
    /// Passed through verbatim when set; the backend default applies otherwise
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Request without an explicit temperature
    #[must_use]
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Parsed backend reply
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// The JSON object the model produced
    pub value: Value,
    /// Model id recorded on generated artifacts (the requested one)
    pub model: String,
}

/// Generation backend contract
///
/// The engine holds this as an injected capability so tests can
/// substitute fakes; nothing in the pipeline talks HTTP directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one JSON-mode chat request and parse the reply object
    async fn chat_json(&self, request: ChatRequest) -> Result<ChatReply, BackendError>;
}

/// [`ChatBackend`] over an OpenAI-compatible HTTP API
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiBackend {
    /// Backend for the given base URL and key (trailing slashes trimmed)
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build from [`API_KEY_ENV`] and [`BASE_URL_ENV`]
    ///
    /// # Errors
    /// Returns [`BackendError::Config`] when the API key is not set.
    pub fn from_env() -> Result<Self, BackendError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| BackendError::Config(format!("{API_KEY_ENV} is not set")))?;
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(base_url, api_key))
    }

    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl ChatBackend for OpenAiBackend {
    async fn chat_json(&self, request: ChatRequest) -> Result<ChatReply, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "response_format": {"type": "json_object"},
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        tracing::debug!(model = %request.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "chat completion rejected");
            return Err(BackendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(BackendError::MissingContent)?;

        let value: Value = serde_json::from_str(&content).map_err(BackendError::NonJson)?;
        if !value.is_object() {
            return Err(BackendError::NotAnObject);
        }

        Ok(ChatReply {
            value,
            model: request.model,
        })
    }
}

// Wire shape of the completion endpoint; only the fields we read.
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_fields() {
        let request = ChatRequest::new("system", "user", "gpt-4o").with_temperature(0.2);
        assert_eq!(request.system, "system");
        assert_eq!(request.user, "user");
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let backend = OpenAiBackend::new("https://api.example.com/v1///", "key");
        assert_eq!(backend.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn completion_wire_shape_parses() {
        let completion: ChatCompletion = serde_json::from_str(
            r#"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"{\"ok\":true}"}}]}"#,
        )
        .unwrap();
        assert_eq!(completion.choices.len(), 1);
        assert_eq!(
            completion.choices[0].message.content.as_deref(),
            Some("{\"ok\":true}")
        );
    }

    #[test]
    fn completion_tolerates_missing_choices() {
        let completion: ChatCompletion = serde_json::from_str(r#"{"id":"c1"}"#).unwrap();
        assert!(completion.choices.is_empty());
    }

    #[tokio::test]
    async fn mock_backend_serves_scripted_reply() {
        let mut mock = MockChatBackend::new();
        mock.expect_chat_json().returning(|request| {
            Ok(ChatReply {
                value: serde_json::json!({"echo": request.user}),
                model: request.model,
            })
        });

        let reply = mock
            .chat_json(ChatRequest::new("s", "hello", "gpt-4o"))
            .await
            .unwrap();
        assert_eq!(reply.value["echo"], "hello");
        assert_eq!(reply.model, "gpt-4o");
    }
}
