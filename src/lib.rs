//! # edgequake-pdfsum
//!
//! Batch-summarise PDF documents into Markdown with Large Language Models.
//!
//! Point it at a directory of PDFs and it writes one `<name>_summary.md` per
//! document, running several documents at once under a fixed concurrency
//! cap. A document that fails (corrupt file, API error, full disk) is
//! reported in the result and never stops the others.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Scan     list *.pdf (case-insensitive)
//!  ├─ 2. Gate     at most N documents in flight
//!  │   ├─ Extract   pdfium text extraction (spawn_blocking)
//!  │   ├─ Bound     keep the first 12 000 × 4 characters
//!  │   ├─ Summarise one chat call: system prompt + instructions + text
//!  │   └─ Write     <stem>_summary.md, overwriting
//!  └─ 3. Report   one Outcome per input, in input order
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfsum::{summarize_directory, SummaryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = SummaryConfig::default();
//!     let result = summarize_directory("./pdfs", "./output", &config).await?;
//!     for outcome in &result {
//!         println!("{:?}", outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsum` binary (clap + anyhow + tracing-subscriber + indicatif + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod gate;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod progress;
pub mod prompts;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::BatchRunner;
pub use config::{SummaryConfig, SummaryConfigBuilder};
pub use error::{ItemError, PdfSumError};
pub use gate::{AdmissionGate, GatePermit};
pub use output::{BatchResult, Outcome, WorkItem};
pub use pipeline::extract::{PdfiumExtractor, TextExtractor};
pub use pipeline::llm::{LlmSummarizer, Summarizer};
pub use processor::ItemProcessor;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use summarize::{
    resolve_provider, summarize_directory, summarize_directory_with, summarize_file,
    summarize_file_with,
};
