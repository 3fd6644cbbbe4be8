//! Fixed-delay pacing for any provider

use paperlens_domain::{Completion, CompletionRequest, LlmProvider};
use std::time::Duration;

/// Provider wrapper that sleeps a fixed delay after every request
///
/// The delay applies whether the request succeeded or failed, keeping the
/// request rate under the endpoint's limit.
///
/// # Examples
///
/// ```
/// use paperlens_llm::{MockProvider, Throttled};
/// use std::time::Duration;
///
/// let provider = Throttled::new(MockProvider::new("{}"), Duration::ZERO);
/// assert_eq!(provider.delay(), Duration::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct Throttled<P> {
    inner: P,
    delay: Duration,
}

impl<P> Throttled<P> {
    /// Wrap `inner` with a post-request delay
    pub fn new(inner: P, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Borrow the wrapped provider
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: LlmProvider> LlmProvider for Throttled<P> {
    type Error = P::Error;

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn complete(&self, request: &CompletionRequest) -> Result<Completion, Self::Error> {
        let result = self.inner.complete(request);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        result
    }
}
