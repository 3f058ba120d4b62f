//! Input discovery: list the documents eligible for summarisation.

use crate::error::PdfSumError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension (without the dot) of the files picked up by [`list_pdfs`].
pub const PDF_EXTENSION: &str = "pdf";

/// List every PDF file directly inside `dir`.
///
/// The extension check is case-insensitive, so `report.PDF` qualifies.
pub async fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, PdfSumError> {
    list_files_with_extension(dir, PDF_EXTENSION).await
}

/// List the regular files directly inside `dir` whose extension equals
/// `extension`, ignoring ASCII case.
///
/// Subdirectories and non-matching files are skipped. The result is sorted
/// by path. Any failure to read the directory is returned as
/// [`PdfSumError::ReadDir`] with the original `io::Error` as its source.
pub async fn list_files_with_extension(
    dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, PdfSumError> {
    let read_err = |source: std::io::Error| PdfSumError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let path = entry.path();
        if !has_extension(&path, extension) {
            continue;
        }
        // Follows symlinks, so a link to a PDF counts and a link to a
        // directory does not.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => debug!("Skipping non-file entry {}", path.display()),
            Err(e) => debug!("Skipping unreadable entry {}: {}", path.display(), e),
        }
    }

    files.sort();
    debug!("Found {} .{} files in {}", files.len(), extension, dir.display());
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
