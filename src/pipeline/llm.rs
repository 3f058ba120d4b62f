//! LLM interaction: build the chat request and call the provider.
//!
//! Thin on purpose: prompt wording lives in [`crate::prompts`], and the
//! decision of what counts as a usable answer lives in the item processor.
//! There is no retry here; a failed call fails that document.

use crate::error::ItemError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Produces a summary from a system instruction and a user message.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Return the model's text, or [`ItemError::Api`] when the call fails.
    async fn summarize(&self, system_prompt: &str, user_message: &str)
        -> Result<String, ItemError>;
}

/// [`Summarizer`] backed by an edgequake-llm provider.
///
/// Each request is one system message followed by one user message.
pub struct LlmSummarizer {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: Option<usize>,
}

impl LlmSummarizer {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: Option<usize>) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    fn options(&self) -> CompletionOptions {
        build_options(self.temperature, self.max_tokens)
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, ItemError> {
        let start = Instant::now();
        let messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_message),
        ];
        let options = self.options();

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| ItemError::Api {
                detail: e.to_string(),
            })?;

        debug!(
            "{} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }
}

/// Build `CompletionOptions` from the summariser settings.
fn build_options(temperature: f32, max_tokens: Option<usize>) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let opts = build_options(0.3, None);
        assert_eq!(opts.temperature, Some(0.3));
        assert_eq!(opts.max_tokens, None);
    }

    #[test]
    fn build_options_with_limit() {
        let opts = build_options(0.0, Some(2048));
        assert_eq!(opts.temperature, Some(0.0));
        assert_eq!(opts.max_tokens, Some(2048));
    }
}
