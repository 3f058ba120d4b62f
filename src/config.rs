//! Configuration types for PDF summarisation.
//!
//! All library behaviour is controlled through [`SummaryConfig`], built via
//! its [`SummaryConfigBuilder`]. Paths are not part of the config; they are
//! arguments to the entry points in [`crate::summarize`], so one config can
//! drive several directories.
//!
//! The builder lets callers set only what they care about and rely on the
//! documented defaults for the rest. [`SummaryConfigBuilder::build`] is the
//! single place where settings are validated.

use crate::error::PdfSumError;
use crate::pipeline::preprocess::DEFAULT_MAX_INPUT_TOKENS;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Default number of documents processed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Model used when an OpenAI key is detected and no model is configured.
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// Configuration for a summarisation run.
///
/// Built via [`SummaryConfig::builder()`] or using [`SummaryConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdfsum::SummaryConfig;
///
/// let config = SummaryConfig::builder()
///     .concurrency(3)
///     .model("gpt-4.1-mini")
///     .max_input_tokens(8_000)
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, 3);
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// Maximum number of documents in flight at once. Must be ≥ 1. Default: 5.
    ///
    /// Each in-flight document holds one open LLM request. Lower this if the
    /// provider answers with rate-limit errors (`429`).
    pub concurrency: usize,

    /// LLM model identifier, e.g. "gpt-4-turbo-preview", "claude-sonnet-4-20250514".
    /// If None, uses [`DEFAULT_MODEL`] for OpenAI or the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: 0.3.
    ///
    /// Low randomness keeps summaries of the same document stable across runs.
    pub temperature: f32,

    /// Maximum tokens the model may generate per summary. Default: None
    /// (provider default).
    pub max_tokens: Option<usize>,

    /// Budget for the extracted text, in estimated tokens. Default: 12 000.
    ///
    /// See [`crate::pipeline::preprocess`] for the 4-characters-per-token
    /// approximation.
    pub max_input_tokens: usize,

    /// Custom system prompt. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Custom instruction placed before the document text. If None, uses
    /// [`crate::prompts::SUMMARY_PROMPT`].
    pub summary_prompt: Option<String>,

    /// Run [`crate::pipeline::postprocess::clean_markdown`] on the model
    /// output before writing it. Default: false (write the response verbatim).
    pub clean_output: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives batch and per-document events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.3,
            max_tokens: None,
            max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
            system_prompt: None,
            summary_prompt: None,
            clean_output: false,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("concurrency", &self.concurrency)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_input_tokens", &self.max_input_tokens)
            .field("clean_output", &self.clean_output)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }

    /// The system prompt in effect for this config.
    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(crate::prompts::DEFAULT_SYSTEM_PROMPT)
    }

    /// The instruction template in effect for this config.
    pub fn summary_prompt(&self) -> &str {
        self.summary_prompt
            .as_deref()
            .unwrap_or(crate::prompts::SUMMARY_PROMPT)
    }
}

/// Builder for [`SummaryConfig`].
#[derive(Debug)]
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    /// Set the concurrency cap. Zero is rejected by [`Self::build`].
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn max_input_tokens(mut self, n: usize) -> Self {
        self.config.max_input_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn summary_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.summary_prompt = Some(prompt.into());
        self
    }

    pub fn clean_output(mut self, v: bool) -> Self {
        self.config.clean_output = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, PdfSumError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(PdfSumError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.max_input_tokens == 0 {
            return Err(PdfSumError::InvalidConfig(
                "Input token budget must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
