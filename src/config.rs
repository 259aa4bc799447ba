//! Service configuration
//!
//! Read once from `SATAYOO_*` environment variables at startup. Numeric
//! values that fail to parse fall back to their defaults.

use crate::analytics::{AnalyticsError, AnalyticsSink, HttpAnalytics, LogAnalytics};
use crate::chat::ChatText;
use crate::llm::{
    CompletionOptions, LoggingClient, MockClient, OpenAiClient, OpenAiConfig, ResponseClient,
    ServiceError, DEFAULT_FRAGMENT_DELAY, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, MOCK_LATENCY,
};
use crate::runtime::IDLE_TIMEOUT;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown backend '{0}'; expected 'mock' or 'openai'")]
    UnknownBackend(String),
    #[error("SATAYOO_AI_API_KEY is required for the openai backend")]
    MissingApiKey,
    #[error("Failed to build response client: {0}")]
    Client(#[from] ServiceError),
    #[error("Failed to build analytics sink: {0}")]
    Analytics(#[from] AnalyticsError),
}

/// Which response backend serves replies
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Mock {
        latency: Duration,
        fragment_delay: Duration,
    },
    OpenAi(OpenAiConfig),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub backend: BackendConfig,
    pub options: CompletionOptions,
    pub analytics_endpoint: Option<String>,
    pub text: ChatText,
    /// Unused sessions are dropped after this long
    pub session_idle_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&var, "SATAYOO_PORT", DEFAULT_PORT);
        let fragment_delay = var("SATAYOO_FRAGMENT_DELAY_MS")
            .and_then(|v| v.parse().ok())
            .map_or(DEFAULT_FRAGMENT_DELAY, Duration::from_millis);

        let backend = match var("SATAYOO_BACKEND").as_deref().unwrap_or("mock") {
            "mock" => BackendConfig::Mock {
                latency: var("SATAYOO_MOCK_LATENCY_MS")
                    .and_then(|v| v.parse().ok())
                    .map_or(MOCK_LATENCY, Duration::from_millis),
                fragment_delay,
            },
            "openai" => {
                let api_key = var("SATAYOO_AI_API_KEY")
                    .filter(|k| !k.is_empty())
                    .ok_or(ConfigError::MissingApiKey)?;
                let mut config = OpenAiConfig::new(api_key);
                if let Some(endpoint) = var("SATAYOO_AI_API_ENDPOINT") {
                    config.endpoint = endpoint;
                }
                if let Some(model) = var("SATAYOO_AI_MODEL") {
                    config.model = model;
                }
                if let Some(prompt) = var("SATAYOO_SYSTEM_PROMPT") {
                    config.system_prompt = prompt;
                }
                config.fragment_delay = fragment_delay;
                BackendConfig::OpenAi(config)
            }
            other => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let options = CompletionOptions {
            temperature: Some(parse_or(&var, "SATAYOO_TEMPERATURE", DEFAULT_TEMPERATURE)),
            max_tokens: Some(parse_or(&var, "SATAYOO_MAX_TOKENS", DEFAULT_MAX_TOKENS)),
        };

        let defaults = ChatText::default();
        let text = ChatText {
            greeting: var("SATAYOO_GREETING").unwrap_or(defaults.greeting),
            empty_reply: var("SATAYOO_EMPTY_REPLY_TEXT").unwrap_or(defaults.empty_reply),
            service_failure: var("SATAYOO_ERROR_TEXT").unwrap_or(defaults.service_failure),
        };

        Ok(Self {
            port,
            backend,
            options,
            analytics_endpoint: var("SATAYOO_ANALYTICS_ENDPOINT").filter(|e| !e.is_empty()),
            text,
            session_idle_timeout: var("SATAYOO_SESSION_IDLE_SECS")
                .and_then(|v| v.parse().ok())
                .map_or(IDLE_TIMEOUT, Duration::from_secs),
        })
    }

    /// Build the configured backend, wrapped with logging
    pub fn response_client(&self) -> Result<Arc<dyn ResponseClient>, ConfigError> {
        let inner: Arc<dyn ResponseClient> = match &self.backend {
            BackendConfig::Mock {
                latency,
                fragment_delay,
            } => Arc::new(
                MockClient::new()
                    .with_latency(*latency)
                    .with_fragment_delay(*fragment_delay),
            ),
            BackendConfig::OpenAi(config) => Arc::new(OpenAiClient::new(config.clone())?),
        };
        Ok(Arc::new(LoggingClient::new(inner)))
    }

    pub fn analytics_sink(&self) -> Result<Arc<dyn AnalyticsSink>, ConfigError> {
        Ok(match &self.analytics_endpoint {
            Some(endpoint) => Arc::new(HttpAnalytics::new(endpoint.clone())?),
            None => Arc::new(LogAnalytics),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    var(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
