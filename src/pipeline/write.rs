//! Output: derive the summary path and persist the Markdown.
//!
//! The write goes to a uniquely named temp file in the output directory that
//! is then renamed over the target, so the summary file is replaced as a
//! whole on every run.

use crate::error::{ItemError, PdfSumError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Appended to the input's file stem.
pub const SUMMARY_SUFFIX: &str = "_summary";

/// Extension of every summary file.
pub const SUMMARY_EXTENSION: &str = "md";

/// Where the summary for `input` lives inside `output_dir`.
///
/// `report.pdf` → `<output_dir>/report_summary.md`.
pub fn summary_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{SUMMARY_SUFFIX}.{SUMMARY_EXTENSION}"))
}

/// Write `content` as the summary for `input`, replacing any previous file.
///
/// Returns the path written.
pub async fn write_summary(
    output_dir: &Path,
    input: &Path,
    content: &str,
) -> Result<PathBuf, ItemError> {
    let path = summary_path(output_dir, input);
    let dir = output_dir.to_path_buf();
    let target = path.clone();
    let content = content.to_owned();

    let written = tokio::task::spawn_blocking(move || replace_file(&dir, &target, &content))
        .await
        .map_err(io::Error::other)
        .and_then(|r| r);
    if let Err(e) = written {
        return Err(ItemError::Write {
            path,
            detail: e.to_string(),
        });
    }

    debug!("Wrote summary to {}", path.display());
    Ok(path)
}

/// Write into a uniquely named temp file in `dir`, then move it over `target`.
///
/// Two inputs that differ only by extension case map to the same target;
/// each still gets its own temp file. A temp file that could not be
/// persisted is removed on drop.
fn replace_file(dir: &Path, target: &Path, content: &str) -> io::Result<()> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".summary-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Create `dir` and any missing ancestors. Succeeds if it already exists.
pub async fn ensure_output_dir(dir: &Path) -> Result<(), PdfSumError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| PdfSumError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_path_strips_extension() {
        assert_eq!(
            summary_path(Path::new("/out"), Path::new("report.pdf")),
            PathBuf::from("/out/report_summary.md")
        );
        assert_eq!(
            summary_path(Path::new("/out"), Path::new("/in/Annual.Report.PDF")),
            PathBuf::from("/out/Annual.Report_summary.md")
        );
    }

    #[tokio::test]
    async fn second_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let input = Path::new("report.pdf");

        let first = write_summary(dir.path(), input, "first version, rather long")
            .await
            .unwrap();
        let second = write_summary(dir.path(), input, "second").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temp files left behind");
    }

    #[tokio::test]
    async fn concurrent_writes_to_same_target_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..16 {
            let out = dir.path().to_path_buf();
            let input = if i % 2 == 0 { "x.pdf" } else { "x.PDF" };
            tasks.spawn(async move {
                write_summary(&out, Path::new(input), &format!("version {i}")).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let path = joined.unwrap().unwrap();
            assert_eq!(path, dir.path().join("x_summary.md"));
        }
        let content = std::fs::read_to_string(dir.path().join("x_summary.md")).unwrap();
        assert!(content.starts_with("version "));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = write_summary(&missing, Path::new("a.pdf"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ItemError::Write { .. }));
    }

    #[tokio::test]
    async fn ensure_output_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        ensure_output_dir(&nested).await.unwrap();
        ensure_output_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn ensure_output_dir_over_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, b"x").unwrap();
        let err = ensure_output_dir(&file).await.unwrap_err();
        assert!(matches!(err, PdfSumError::CreateDir { .. }));
    }
}
