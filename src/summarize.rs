//! Top-level entry points.
//!
//! [`summarize_directory`] and [`summarize_file`] wire the production
//! collaborators (pdfium + the configured LLM provider) and run the batch.
//! The `*_with` variants take any [`TextExtractor`] / [`Summarizer`], which is
//! how tests and embedders swap the backends out.
//!
//! Setup problems (unreadable input directory, output directory that cannot
//! be created, missing provider, missing pdfium) are fatal and returned as
//! `Err`. Per-document problems never are; they show up as failures inside
//! the returned [`BatchResult`].

use crate::batch::BatchRunner;
use crate::config::{SummaryConfig, DEFAULT_MODEL};
use crate::error::PdfSumError;
use crate::output::{BatchResult, Outcome, WorkItem};
use crate::pipeline::extract::{PdfiumExtractor, TextExtractor};
use crate::pipeline::llm::{LlmSummarizer, Summarizer};
use crate::pipeline::{scan, write};
use crate::processor::ItemProcessor;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Summarise every PDF in `input_dir` into `output_dir`.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdfsum::{summarize_directory, SummaryConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SummaryConfig::builder().concurrency(4).build()?;
/// let result = summarize_directory("./pdfs", "./output", &config).await?;
/// println!("{}/{} summarised", result.success_count(), result.len());
/// # Ok(())
/// # }
/// ```
pub async fn summarize_directory(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<BatchResult, PdfSumError> {
    let (extractor, summarizer) = production_collaborators(config).await?;
    summarize_directory_with(input_dir, output_dir, config, extractor, summarizer).await
}

/// [`summarize_directory`] with caller-supplied collaborators.
pub async fn summarize_directory_with(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &SummaryConfig,
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
) -> Result<BatchResult, PdfSumError> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();
    info!("PDF directory: {}", input_dir.display());
    info!("Output directory: {}", output_dir.display());

    let processor = ItemProcessor::new(extractor, summarizer, config.clone());
    let runner = BatchRunner::from_config(processor)?;

    write::ensure_output_dir(output_dir).await?;
    let inputs = scan::list_pdfs(input_dir).await?;
    if inputs.is_empty() {
        info!("No PDF files found in {}", input_dir.display());
        return Ok(BatchResult::default());
    }
    info!("Found {} PDF files to process", inputs.len());

    let items = inputs
        .into_iter()
        .map(|input| WorkItem::new(input, output_dir))
        .collect();
    Ok(runner.run(items).await)
}

/// Summarise a single PDF into `output_dir`.
///
/// Fails with [`PdfSumError::FileNotFound`] when `input` does not exist;
/// any later problem is reported in the returned [`Outcome`].
pub async fn summarize_file(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<Outcome, PdfSumError> {
    ensure_exists(input.as_ref()).await?;
    let (extractor, summarizer) = production_collaborators(config).await?;
    summarize_file_with(input, output_dir, config, extractor, summarizer).await
}

/// [`summarize_file`] with caller-supplied collaborators.
pub async fn summarize_file_with(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &SummaryConfig,
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
) -> Result<Outcome, PdfSumError> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();
    ensure_exists(input).await?;
    write::ensure_output_dir(output_dir).await?;

    let processor = ItemProcessor::new(extractor, summarizer, config.clone());
    Ok(processor.process(&WorkItem::new(input, output_dir)).await)
}

async fn ensure_exists(path: &Path) -> Result<(), PdfSumError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(PdfSumError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn production_collaborators(
    config: &SummaryConfig,
) -> Result<(Arc<dyn TextExtractor>, Arc<dyn Summarizer>), PdfSumError> {
    let provider = resolve_provider(config)?;
    let summarizer = LlmSummarizer::new(provider, config.temperature, config.max_tokens);

    let password = config.password.clone();
    let extractor = tokio::task::spawn_blocking(move || {
        PdfiumExtractor::new().map(|e| e.with_password(password))
    })
    .await
    .map_err(|e| PdfSumError::Internal(format!("pdfium bind task panicked: {e}")))??;

    Ok((Arc::new(extractor), Arc::new(summarizer)))
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, PdfSumError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        PdfSumError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific:
///
/// 1. **Pre-built provider** (`config.provider`), used as-is.
/// 2. **Named provider** (`config.provider_name`) with `config.model`
///    or [`DEFAULT_MODEL`].
/// 3. **Environment pair** `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`.
/// 4. **OpenAI key** `OPENAI_API_KEY` with `config.model` or [`DEFAULT_MODEL`].
/// 5. **Auto-detection** via [`ProviderFactory::from_env`].
///
/// A missing credential surfaces as [`PdfSumError::ProviderNotConfigured`].
pub fn resolve_provider(config: &SummaryConfig) -> Result<Arc<dyn LLMProvider>, PdfSumError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);

    if let Some(ref name) = config.provider_name {
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(env_model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !env_model.is_empty() {
            return create_provider(&prov, &env_model);
        }
    }

    if std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty()) {
        return create_provider("openai", model);
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| PdfSumError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
