//! Single-document processing: extract → bound → summarise → write.
//!
//! [`ItemProcessor::process`] never returns an error. Whatever goes wrong at
//! any stage becomes an [`Outcome::Failure`] carrying that stage's message,
//! so one bad document cannot abort its siblings in the batch.

use crate::config::SummaryConfig;
use crate::error::ItemError;
use crate::output::{Outcome, WorkItem};
use crate::pipeline::extract::TextExtractor;
use crate::pipeline::llm::Summarizer;
use crate::pipeline::{postprocess, preprocess, write};
use crate::prompts;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs one [`WorkItem`] end to end.
///
/// Cheap to clone: collaborators and config are shared behind `Arc`s, so the
/// batch runner hands a clone to every task.
#[derive(Clone)]
pub struct ItemProcessor {
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
    config: Arc<SummaryConfig>,
}

impl ItemProcessor {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn Summarizer>,
        config: SummaryConfig,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Process one document and report the result as data.
    pub async fn process(&self, item: &WorkItem) -> Outcome {
        let identifier = item.identifier();
        let start = Instant::now();
        info!("Processing: {}", identifier);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_item_start(&identifier);
        }

        match self.run_stages(item).await {
            Ok(output_path) => {
                info!(
                    "Summarised {} → {} in {}ms",
                    identifier,
                    output_path.display(),
                    start.elapsed().as_millis()
                );
                if let Some(ref cb) = self.config.progress_callback {
                    cb.on_item_complete(&identifier, &output_path);
                }
                Outcome::Success {
                    identifier,
                    output_path,
                }
            }
            Err(e) => {
                let error = e.to_string();
                warn!("Error summarising {}: {}", identifier, error);
                if let Some(ref cb) = self.config.progress_callback {
                    cb.on_item_error(&identifier, &error);
                }
                Outcome::Failure { identifier, error }
            }
        }
    }

    async fn run_stages(&self, item: &WorkItem) -> Result<PathBuf, ItemError> {
        let text = self.extractor.extract(item.input()).await?;
        debug!("{}: extracted {} chars", item.identifier(), text.len());

        let bounded = preprocess::bound_text(&text, self.config.max_input_tokens);
        let user_message = prompts::user_message(self.config.summary_prompt(), &bounded);

        let summary = self
            .summarizer
            .summarize(self.config.system_prompt(), &user_message)
            .await?;
        if summary.trim().is_empty() {
            return Err(ItemError::EmptyResponse);
        }

        let content = if self.config.clean_output {
            postprocess::clean_markdown(&summary)
        } else {
            summary
        };

        write::write_summary(item.output_dir(), item.input(), &content).await
    }
}
