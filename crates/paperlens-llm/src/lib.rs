//! paperlens LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `paperlens-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenRouterProvider`: OpenAI-compatible chat-completions endpoint
//! - `Throttled`: Wrapper enforcing a fixed delay after every request
//!
//! # Examples
//!
//! ```
//! use paperlens_llm::MockProvider;
//! use paperlens_domain::{CompletionRequest, LlmProvider};
//!
//! let provider = MockProvider::new("{}");
//! let request = CompletionRequest {
//!     system: "system".to_string(),
//!     user: "user".to_string(),
//!     temperature: 0.1,
//!     max_tokens: 100,
//! };
//! assert_eq!(provider.complete(&request).unwrap().text, "{}");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod openrouter;
pub mod throttle;

use paperlens_domain::{
    ClassifiedError, Completion, CompletionRequest, FailureKind, LlmProvider, TokenUsage,
};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use config::ProviderConfig;
pub use openrouter::OpenRouterProvider;
pub use throttle::Throttled;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network, timeout, or non-success HTTP status
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response envelope could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP 429 from the endpoint
    #[error("Rate limit exceeded (HTTP 429); consider increasing the request delay")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider could not be constructed from its configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether a retry within the same run may help
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

impl ClassifiedError for LlmError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            LlmError::RateLimitExceeded => FailureKind::RateLimited,
            LlmError::Communication(_)
            | LlmError::InvalidResponse(_)
            | LlmError::ModelNotAvailable(_) => FailureKind::RequestFailed,
            LlmError::Config(_) => FailureKind::UnexpectedError,
        }
    }
}

/// Scripted reply of the mock provider
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(LlmError),
}

#[derive(Debug, Default)]
struct MockState {
    scripts: Vec<(String, MockReply)>,
    requests: Vec<CompletionRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. Scripts
/// are matched against the user message by substring, first match wins;
/// unmatched requests get the default response.
///
/// # Examples
///
/// ```
/// use paperlens_llm::{LlmError, MockProvider};
/// use paperlens_domain::{CompletionRequest, LlmProvider};
///
/// let mut provider = MockProvider::new("default");
/// provider.add_response("paper-a.pdf", "answer a");
/// provider.add_error("paper-b.pdf", LlmError::RateLimitExceeded);
///
/// let request = |user: &str| CompletionRequest {
///     system: String::new(),
///     user: user.to_string(),
///     temperature: 0.1,
///     max_tokens: 10,
/// };
/// assert_eq!(provider.complete(&request("Filename: paper-a.pdf")).unwrap().text, "answer a");
/// assert!(provider.complete(&request("Filename: paper-b.pdf")).is_err());
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    model: String,
    usage: TokenUsage,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            model: "mock-model".to_string(),
            usage: TokenUsage::default(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Set the model identifier reported by the mock
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the token usage reported with every successful reply
    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.usage = TokenUsage {
            input_tokens,
            output_tokens,
        };
        self
    }

    /// Reply with `response` when the user message contains `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.lock()
            .scripts
            .push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail with `error` when the user message contains `needle`
    pub fn add_error(&mut self, needle: impl Into<String>, error: LlmError) {
        self.lock()
            .scripts
            .push((needle.into(), MockReply::Error(error)));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// User messages of every request received so far
    pub fn user_messages(&self) -> Vec<String> {
        self.lock()
            .requests
            .iter()
            .map(|request| request.user.clone())
            .collect()
    }

    /// Reset the call history
    pub fn reset_call_count(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    fn complete(&self, request: &CompletionRequest) -> Result<Completion, Self::Error> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let reply = state
            .scripts
            .iter()
            .find(|(needle, _)| request.user.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Error(error)) => Err(error),
            Some(MockReply::Text(text)) => Ok(Completion {
                text,
                usage: self.usage,
            }),
            None => Ok(Completion {
                text: self.default_response.clone(),
                usage: self.usage,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user: &str) -> CompletionRequest {
        CompletionRequest {
            system: "sys".to_string(),
            user: user.to_string(),
            temperature: 0.1,
            max_tokens: 10,
        }
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&request("any prompt"));
        assert_eq!(result.unwrap().text, "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete(&request("say hello")).unwrap().text, "world");
        assert_eq!(provider.complete(&request("foo!")).unwrap().text, "bar");
        assert_eq!(
            provider.complete(&request("unknown")).unwrap().text,
            "Default mock response"
        );
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.complete(&request("prompt1")).unwrap();
        provider.complete(&request("prompt2")).unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.user_messages(), vec!["prompt1", "prompt2"]);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad", LlmError::Communication("boom".to_string()));

        let result = provider.complete(&request("bad prompt"));
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[test]
    fn test_mock_provider_usage_and_model() {
        let provider = MockProvider::new("x").with_usage(120, 30).with_model("m1");
        let completion = provider.complete(&request("p")).unwrap();
        assert_eq!(completion.usage.input_tokens, 120);
        assert_eq!(completion.usage.output_tokens, 30);
        assert_eq!(provider.model_name(), "m1");
    }

    #[test]
    fn test_mock_provider_clone_shares_history() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&request("test")).unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_error_classification() {
        assert_eq!(LlmError::RateLimitExceeded.failure_kind(), FailureKind::RateLimited);
        assert_eq!(
            LlmError::Communication("timeout".into()).failure_kind(),
            FailureKind::RequestFailed
        );
        assert_eq!(
            LlmError::InvalidResponse("no choices".into()).failure_kind(),
            FailureKind::RequestFailed
        );
        assert!(LlmError::RateLimitExceeded.is_retryable());
        assert!(!LlmError::InvalidResponse("x".into()).is_retryable());
    }
}
