//! `OpenAI`-compatible chat completions backend

use super::{CompletionOptions, ResponseClient, ServiceError, DEFAULT_FRAGMENT_DELAY};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Connection settings for an `OpenAI`-style endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
    pub timeout: Duration,
    pub fragment_delay: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: Duration::from_secs(300),
            fragment_delay: DEFAULT_FRAGMENT_DELAY,
        }
    }
}

/// `OpenAI`-compatible service implementation
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn translate_request(&self, message: &str, options: &CompletionOptions) -> OpenAiRequest {
        OpenAiRequest {
            model: self.config.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: Some(self.config.system_prompt.clone()),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: Some(message.to_string()),
                },
            ],
            temperature: options.temperature(),
            max_tokens: options.max_tokens(),
        }
    }

    fn normalize_response(resp: OpenAiResponse) -> Result<String, ServiceError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::backend("No choices in response"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl ResponseClient for OpenAiClient {
    async fn complete(
        &self,
        message: &str,
        options: &CompletionOptions,
    ) -> Result<String, ServiceError> {
        let request = self.translate_request(message, options);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ServiceError::network(format!("Connection failed: {e}"))
                } else {
                    ServiceError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<OpenAiErrorResponse>(&body) {
                let message = error_resp.error.message;
                return Err(match status.as_u16() {
                    401 | 403 => ServiceError::auth(format!("Authentication failed: {message}")),
                    429 => ServiceError::rate_limit(format!("Rate limit exceeded: {message}")),
                    400 => ServiceError::invalid_request(format!("Invalid request: {message}")),
                    500..=599 => ServiceError::backend(format!("Server error: {message}")),
                    _ => ServiceError::unknown(format!("HTTP {status}: {message}")),
                });
            }
            return Err(ServiceError::unknown(format!("HTTP {status} error: {body}")));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            ServiceError::backend(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(openai_response)
    }

    fn fragment_delay(&self) -> Duration {
        self.config.fragment_delay
    }

    fn backend_id(&self) -> &str {
        &self.config.model
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
}
