//! OpenAiApiAgent - Chat Completions client answering uncertain turns.
//!
//! Sends one request per call (system instruction + visitor message) and
//! reads the reply from `choices[0].message.content`. Never retries.

use async_trait::async_trait;
use rayhai_core::config::{OpenAiSecret, RemoteConfig};
use rayhai_core::remote::{RemoteRequest, RemoteResponder};
use rayhai_core::{RayhaiError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote responder that talks to an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAiApiAgent {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiApiAgent {
    /// Creates an agent with the given key and the default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, &RemoteConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: &RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into().trim().to_string(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Builds an agent from a stored secret; its model name, when set,
    /// overrides the configured one.
    pub fn from_secret(secret: &OpenAiSecret, config: &RemoteConfig) -> Self {
        let agent = Self::with_config(secret.api_key.clone(), config);
        match &secret.model_name {
            Some(model) if !model.trim().is_empty() => agent.with_model(model.trim()),
            _ => agent,
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &RemoteRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_instruction.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user_text.clone(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                RayhaiError::remote(None, format!("OpenAI API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            RayhaiError::remote(None, format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl RemoteResponder for OpenAiApiAgent {
    async fn respond(&self, request: &RemoteRequest) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(RayhaiError::config("OpenAI API key is empty"));
        }
        let body = self.build_request(request);
        tracing::debug!("[OpenAI] Sending request to {} ({})", self.endpoint, self.model);
        self.send_request(&body).await
    }

    fn name(&self) -> String {
        format!("openai/{}", self.model)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| RayhaiError::remote(None, "OpenAI API returned no content in the response"))
}

fn map_http_error(status: StatusCode, body: String) -> RayhaiError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    RayhaiError::remote(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayhai_core::persona::fallback_profile;

    fn parse(json: &str) -> ChatCompletionResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let agent = OpenAiApiAgent::new("sk-test");
        let request = RemoteRequest::new(&fallback_profile(), "Tu fais quoi ce week-end ?");
        let body = serde_json::to_value(agent.build_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.25);
        assert_eq!(body["max_tokens"], 700);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Tu fais quoi ce week-end ?");
    }

    #[test]
    fn test_extract_first_choice() {
        let response = parse(r#"{ "choices": [ { "message": { "content": "  Salut !  " } } ] }"#);
        assert_eq!(extract_text_response(response).unwrap(), "Salut !");
    }

    #[test]
    fn test_extract_rejects_empty_or_missing_content() {
        for json in [
            r#"{ "choices": [] }"#,
            r#"{}"#,
            r#"{ "choices": [ { "message": { "content": null } } ] }"#,
            r#"{ "choices": [ { "message": { "content": "   " } } ] }"#,
        ] {
            assert!(extract_text_response(parse(json)).unwrap_err().is_remote());
        }
    }

    #[test]
    fn test_map_http_error_reads_api_message() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } }"#
                .to_string(),
        );
        match err {
            RayhaiError::Remote {
                status_code,
                message,
            } => {
                assert_eq!(status_code, Some(401));
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn test_secret_model_overrides_config() {
        let secret = OpenAiSecret {
            api_key: "sk-test".to_string(),
            model_name: Some("gpt-4o".to_string()),
        };
        let agent = OpenAiApiAgent::from_secret(&secret, &RemoteConfig::default());
        assert_eq!(agent.model(), "gpt-4o");
        assert_eq!(agent.name(), "openai/gpt-4o");
    }

    #[tokio::test]
    async fn test_empty_key_fails_without_request() {
        let agent = OpenAiApiAgent::new("   ");
        let request = RemoteRequest::new(&fallback_profile(), "bonjour");
        assert!(agent.respond(&request).await.is_err());
    }
}
