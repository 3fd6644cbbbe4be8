//! OpenRouter Provider Implementation
//!
//! Talks to any OpenAI-compatible chat-completions endpoint, OpenRouter by
//! default. Requests are blocking; the batch loop is sequential.
//!
//! # Features
//!
//! - Bearer authentication and JSON-object response format
//! - Configurable endpoint, model, sampling, and timeout
//! - Optional bounded retry with exponential backoff
//!
//! # Examples
//!
//! ```no_run
//! use paperlens_llm::{OpenRouterProvider, ProviderConfig};
//!
//! let provider = OpenRouterProvider::new(ProviderConfig::default(), "sk-or-...").unwrap();
//! ```

use crate::config::ProviderConfig;
use crate::LlmError;
use paperlens_domain::{Completion, CompletionRequest, LlmProvider, TokenUsage};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Chat-completions client with bearer auth
pub struct OpenRouterProvider {
    config: ProviderConfig,
    api_key: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl OpenRouterProvider {
    /// Create a provider from configuration and an API key
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the configuration is invalid, the key is
    /// empty, or the HTTP client cannot be built.
    pub fn new(config: ProviderConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config(format!(
                "API key is empty (set {})",
                config.api_key_env
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Create a provider reading the key from `config.api_key_env`
    pub fn from_env(config: ProviderConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| LlmError::Config(format!("{} is not set", config.api_key_env)))?;
        Self::new(config, api_key)
    }

    /// Provider configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn send_once(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| LlmError::Communication(format!("Failed to read body: {}", e)))?;

        if let Some(error) = classify_status(status, &text, &self.config.model) {
            return Err(error);
        }

        debug!(bytes = text.len(), "Received chat completion");
        parse_chat_response(&text)
    }
}

/// Map a non-success HTTP status onto an error, `None` for success
pub fn classify_status(status: StatusCode, body: &str, model: &str) -> Option<LlmError> {
    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        _ => LlmError::Communication(format!("HTTP {}: {}", status.as_u16(), snippet(body))),
    })
}

/// Extract the completion text and usage from a response envelope
///
/// # Examples
///
/// ```
/// use paperlens_llm::openrouter::parse_chat_response;
///
/// let body = r#"{"choices":[{"message":{"content":"{}"}}],"usage":{"prompt_tokens":10,"completion_tokens":2}}"#;
/// let completion = parse_chat_response(body).unwrap();
/// assert_eq!(completion.text, "{}");
/// assert_eq!(completion.usage.input_tokens, 10);
/// ```
pub fn parse_chat_response(body: &str) -> Result<Completion, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))?;

    let usage = response
        .usage
        .map(|usage| TokenUsage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        })
        .unwrap_or_default();

    Ok(Completion { text, usage })
}

/// Backoff before retry number `attempt` (1-based): 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt.saturating_sub(1)))
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

impl LlmProvider for OpenRouterProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn complete(&self, request: &CompletionRequest) -> Result<Completion, Self::Error> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.send_once(request) {
                Ok(completion) => return Ok(completion),
                Err(error) if error.is_retryable() && attempts < self.config.max_attempts => {
                    let delay = backoff_delay(attempts);
                    warn!(attempt = attempts, ?delay, "Request failed, retrying: {}", error);
                    std::thread::sleep(delay);
                }
                Err(error) => return Err(error),
            }
        }
    }
}
