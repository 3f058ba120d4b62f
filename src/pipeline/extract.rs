//! Text extraction: turn a PDF file into plain text.
//!
//! The item processor only sees the [`TextExtractor`] trait, so tests and
//! callers with their own parser can plug in a different backend.
//! [`PdfiumExtractor`] is the production implementation.
//!
//! ## Why spawn_blocking?
//!
//! pdfium is a C++ library with internal global state and no async API.
//! Parsing runs on tokio's blocking pool so the worker threads driving the
//! other documents' network calls never stall behind a large PDF.

use crate::error::{ItemError, PdfSumError};
use async_trait::async_trait;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extracts plain text from one input document.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Return the document's text, or [`ItemError::Extraction`] when the file
    /// cannot be read or parsed.
    async fn extract(&self, path: &Path) -> Result<String, ItemError>;
}

/// Environment variable pointing at an existing pdfium library (file or
/// directory containing it).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// pdfium-backed [`TextExtractor`].
///
/// Holds only the resolved library location. Each extraction binds pdfium on
/// the blocking thread that uses it, so no pdfium handle crosses threads.
/// Construction binds once and drops the binding, so a missing pdfium is
/// reported before any document is attempted.
#[derive(Debug, Clone)]
pub struct PdfiumExtractor {
    /// `None` means the system library search path.
    library: Option<PathBuf>,
    password: Option<String>,
}

impl PdfiumExtractor {
    /// Locate pdfium in the usual places, first match wins:
    ///
    /// 1. `PDFIUM_LIB_PATH`
    /// 2. next to the running executable
    /// 3. the current working directory
    /// 4. the system library search path
    pub fn new() -> Result<Self, PdfSumError> {
        let library = match std::env::var_os(PDFIUM_LIB_PATH_ENV) {
            Some(path) => Some(library_file(Path::new(&path))),
            None => find_local_library(),
        };
        Self::validated(library)
    }

    /// Use pdfium from an explicit library file or directory.
    pub fn from_library(path: &Path) -> Result<Self, PdfSumError> {
        Self::validated(Some(library_file(path)))
    }

    fn validated(library: Option<PathBuf>) -> Result<Self, PdfSumError> {
        bind(library.as_deref())?;
        if let Some(ref lib) = library {
            debug!("Using pdfium from {}", lib.display());
        }
        Ok(Self {
            library,
            password: None,
        })
    }

    /// Password used for every encrypted document.
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// The library file in use, or `None` for the system search path.
    pub fn library(&self) -> Option<&Path> {
        self.library.as_deref()
    }
}

#[async_trait]
impl TextExtractor for PdfiumExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ItemError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ItemError::Extraction {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        let library = self.library.clone();
        let password = self.password.clone();
        let owned_path = path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            extract_blocking(
                library.as_deref(),
                &bytes,
                password.as_deref(),
                &owned_path,
            )
        })
        .await
        .map_err(|e| ItemError::Extraction {
            path: path.to_path_buf(),
            detail: format!("extraction task panicked: {e}"),
        })?
    }
}

/// Blocking implementation of text extraction.
fn extract_blocking(
    library: Option<&Path>,
    bytes: &[u8],
    password: Option<&str>,
    path: &Path,
) -> Result<String, ItemError> {
    let extraction_err = |detail: String| ItemError::Extraction {
        path: path.to_path_buf(),
        detail,
    };

    let pdfium = bind(library).map_err(|e| extraction_err(e.to_string()))?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| extraction_err(format!("{:?}", e)))?;

    let mut pages_text = Vec::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| extraction_err(format!("page {}: {:?}", idx + 1, e)))?;
        pages_text.push(text.all());
    }

    debug!(
        "Extracted {} pages from {}",
        pages_text.len(),
        path.display()
    );
    Ok(pages_text.join("\n\n"))
}

/// A directory means the platform library name inside it.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

fn find_local_library() -> Option<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    exe_dir
        .into_iter()
        .chain(std::iter::once(PathBuf::from("./")))
        .map(|dir| Pdfium::pdfium_platform_library_name_at_path(&dir))
        .find(|lib| lib.exists())
}

fn bind(library: Option<&Path>) -> Result<Pdfium, PdfSumError> {
    let bindings = match library {
        Some(lib) => Pdfium::bind_to_library(lib).map_err(|e| {
            PdfSumError::PdfiumBindingFailed(format!("{}: {:?}", lib.display(), e))
        })?,
        None => Pdfium::bind_to_system_library()
            .map_err(|e| PdfSumError::PdfiumBindingFailed(format!("{:?}", e)))?,
    };
    Ok(Pdfium::new(bindings))
}
