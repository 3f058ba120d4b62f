//! Error types for the edgequake-pdfsum library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PdfSumError`]: **Fatal**: the run cannot start at all (input
//!   directory unreadable, output directory cannot be created, provider not
//!   configured, invalid concurrency). Returned as `Err(PdfSumError)` from the
//!   top-level `summarize*` functions and from runner construction.
//!
//! * [`ItemError`]: **Non-fatal**: one document failed (corrupt PDF, API
//!   error, write failure) but every other document is unaffected. Captured
//!   as an [`crate::output::Outcome::Failure`] by the item processor and never
//!   propagated upward.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdfsum library.
///
/// Per-document failures use [`ItemError`] and end up inside
/// [`crate::output::BatchResult`] rather than here.
#[derive(Debug, Error)]
pub enum PdfSumError {
    // ── I/O errors ────────────────────────────────────────────────────────
    /// The input directory could not be listed.
    #[error("Failed to read input directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory (or one of its ancestors) could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single-file run was asked to process a file that does not exist.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or runner validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction needs the pdfium shared library. You can:\n\
  • Place libpdfium next to the pdfsum executable or in the working directory.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Install pdfium system-wide so the dynamic loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PdfSumError {
    /// The underlying I/O error kind, when this is a filesystem failure.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            PdfSumError::ReadDir { source, .. } | PdfSumError::CreateDir { source, .. } => {
                Some(source.kind())
            }
            _ => None,
        }
    }
}

/// A non-fatal error for a single document.
///
/// The item processor converts it into an
/// [`crate::output::Outcome::Failure`] whose message is this error's
/// `Display` output. The batch keeps going.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ItemError {
    /// The file could not be read or pdfium could not parse it.
    #[error("Text extraction failed for '{path}': {detail}")]
    Extraction { path: PathBuf, detail: String },

    /// The summarisation call failed (auth, rate limit, network, bad response).
    #[error("LLM API error: {detail}")]
    Api { detail: String },

    /// The summarisation call succeeded but returned no usable text.
    #[error("LLM returned an empty summary")]
    EmptyResponse,

    /// The summary could not be written to disk.
    #[error("Failed to write summary '{path}': {detail}")]
    Write { path: PathBuf, detail: String },

    /// The processing task ended without producing an outcome.
    #[error("Processing task aborted: {detail}")]
    Aborted { detail: String },
}
