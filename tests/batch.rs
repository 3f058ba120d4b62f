//! Batch integration tests.
//!
//! pdfium and the LLM are replaced by in-process collaborators, so these run
//! offline and fast. Anything that needs a live provider lives in
//! `tests/e2e.rs`.

use async_trait::async_trait;
use edgequake_pdfsum::{
    summarize_directory_with, summarize_file_with, BatchRunner, ItemError, ItemProcessor,
    Outcome, PdfSumError, Summarizer, SummaryConfig, TextExtractor, WorkItem,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Test collaborators ───────────────────────────────────────────────────────

/// Returns the file name as the document text; fails for names containing "corrupt".
struct NameExtractor;

#[async_trait]
impl TextExtractor for NameExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ItemError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.contains("corrupt") {
            return Err(ItemError::Extraction {
                path: path.to_path_buf(),
                detail: "Invalid header".into(),
            });
        }
        Ok(format!("contents of {name}"))
    }
}

/// Sleeps a little per call and records how many calls overlap.
#[derive(Default)]
struct CountingSummarizer {
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl CountingSummarizer {
    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for CountingSummarizer {
    async fn summarize(&self, _system: &str, user: &str) -> Result<String, ItemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(20)).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        if user.contains("api-down") {
            return Err(ItemError::Api {
                detail: "503 Service Unavailable".into(),
            });
        }
        Ok(format!("# Summary\n\n{}", user.lines().last().unwrap_or_default()))
    }
}

fn config(concurrency: usize) -> SummaryConfig {
    SummaryConfig::builder()
        .concurrency(concurrency)
        .build()
        .unwrap()
}

fn write_files(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"%PDF-1.4 test").unwrap();
    }
}

// ── Batch runner ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn outcomes_follow_input_order_for_any_capacity() {
    let out = tempfile::tempdir().unwrap();
    let names: Vec<String> = (0..7).map(|i| format!("doc{i}.pdf")).collect();

    for capacity in [1, 2, 3, 7, 20] {
        let summarizer = Arc::new(CountingSummarizer::default());
        let processor = ItemProcessor::new(
            Arc::new(NameExtractor),
            summarizer.clone(),
            config(capacity),
        );
        let runner = BatchRunner::new(processor, capacity).unwrap();
        let items = names
            .iter()
            .map(|n| WorkItem::new(format!("/in/{n}"), out.path()))
            .collect();

        let result = runner.run(items).await;

        let ids: Vec<&str> = result.iter().map(|o| o.identifier()).collect();
        assert_eq!(ids, names, "capacity {capacity}");
        assert_eq!(result.success_count(), names.len());
        assert_eq!(summarizer.calls(), names.len());
    }
}

#[tokio::test]
async fn concurrency_never_exceeds_capacity() {
    let out = tempfile::tempdir().unwrap();

    for capacity in [1, 2, 4] {
        let summarizer = Arc::new(CountingSummarizer::default());
        let processor = ItemProcessor::new(
            Arc::new(NameExtractor),
            summarizer.clone(),
            config(capacity),
        );
        let runner = BatchRunner::new(processor, capacity).unwrap();
        let items = (0..12)
            .map(|i| WorkItem::new(format!("/in/f{i}.pdf"), out.path()))
            .collect();

        let result = runner.run(items).await;

        assert_eq!(result.len(), 12);
        // Twelve items sleeping in the summariser keep every slot busy, so
        // the gate must be both respected and filled.
        assert_eq!(
            summarizer.peak(),
            capacity,
            "peak {} for capacity {}",
            summarizer.peak(),
            capacity
        );
    }
}

#[tokio::test]
async fn capacity_of_one_is_sequential() {
    let out = tempfile::tempdir().unwrap();
    let summarizer = Arc::new(CountingSummarizer::default());
    let processor = ItemProcessor::new(Arc::new(NameExtractor), summarizer.clone(), config(1));
    let runner = BatchRunner::new(processor, 1).unwrap();
    let items = (0..4)
        .map(|i| WorkItem::new(format!("/in/s{i}.pdf"), out.path()))
        .collect();

    runner.run(items).await;
    assert_eq!(summarizer.peak(), 1);
}

#[tokio::test]
async fn failures_are_isolated() {
    let out = tempfile::tempdir().unwrap();
    let summarizer = Arc::new(CountingSummarizer::default());
    let processor = ItemProcessor::new(Arc::new(NameExtractor), summarizer.clone(), config(3));
    let runner = BatchRunner::new(processor, 3).unwrap();
    let items = ["a.pdf", "corrupt.pdf", "api-down.pdf", "d.pdf"]
        .iter()
        .map(|n| WorkItem::new(format!("/in/{n}"), out.path()))
        .collect();

    let result = runner.run(items).await;

    assert_eq!(result.len(), 4);
    assert!(result.outcomes[0].is_success());
    assert!(result.outcomes[1].error().unwrap().contains("Invalid header"));
    assert!(result.outcomes[2].error().unwrap().contains("503"));
    assert!(result.outcomes[3].is_success());
    // The corrupt file never reached the API.
    assert_eq!(summarizer.calls(), 3);
    assert!(out.path().join("a_summary.md").exists());
    assert!(out.path().join("d_summary.md").exists());
    assert!(!out.path().join("corrupt_summary.md").exists());
}

#[tokio::test]
async fn inputs_differing_only_in_extension_case_both_succeed() {
    let out = tempfile::tempdir().unwrap();
    let processor = ItemProcessor::new(
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
        config(8),
    );
    let runner = BatchRunner::new(processor, 8).unwrap();
    let items = (0..4)
        .flat_map(|_| ["x.pdf", "x.PDF"])
        .map(|n| WorkItem::new(format!("/in/{n}"), out.path()))
        .collect();

    let result = runner.run(items).await;

    assert_eq!(result.len(), 8);
    for outcome in &result {
        assert!(outcome.is_success(), "{outcome:?}");
    }
    let entries: Vec<String> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, ["x_summary.md"]);
}

#[test]
fn zero_capacity_is_a_config_error() {
    let processor = ItemProcessor::new(
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
        SummaryConfig::default(),
    );
    let err = BatchRunner::new(processor, 0).err().unwrap();
    assert!(matches!(err, PdfSumError::InvalidConfig(_)));

    let err = SummaryConfig::builder().concurrency(0).build().unwrap_err();
    assert!(matches!(err, PdfSumError::InvalidConfig(_)));
}

// ── Directory entry point ────────────────────────────────────────────────────

#[tokio::test]
async fn directory_run_summarises_only_pdfs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(input.path(), &["a.pdf", "b.PDF", "c.pdf", "notes.txt"]);

    let result = summarize_directory_with(
        input.path(),
        output.path(),
        &config(2),
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
    )
    .await
    .unwrap();

    let ids: Vec<&str> = result.iter().map(|o| o.identifier()).collect();
    assert_eq!(ids, ["a.pdf", "b.PDF", "c.pdf"]);
    assert_eq!(result.success_count(), 3);

    let written = std::fs::read_to_string(output.path().join("a_summary.md")).unwrap();
    assert_eq!(written, "# Summary\n\ncontents of a.pdf");
    assert!(output.path().join("b_summary.md").exists());
    assert!(!output.path().join("notes_summary.md").exists());
}

#[tokio::test]
async fn directory_run_reports_partial_failure() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(input.path(), &["one.pdf", "two-corrupt.pdf", "three.pdf"]);

    let result = summarize_directory_with(
        input.path(),
        output.path(),
        &config(5),
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
    )
    .await
    .unwrap();

    assert_eq!(result.success_count(), 2);
    assert_eq!(result.failure_count(), 1);
    let failed: Vec<&str> = result.failed().map(|o| o.identifier()).collect();
    assert_eq!(failed, ["two-corrupt.pdf"]);

    let summaries = std::fs::read_dir(output.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with("_summary.md"))
        .count();
    assert_eq!(summaries, 2);
}

#[tokio::test]
async fn directory_run_creates_output_dir_and_handles_empty_input() {
    let input = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("nested/out");

    let result = summarize_directory_with(
        input.path(),
        &output,
        &config(2),
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
    )
    .await
    .unwrap();

    assert!(result.is_empty());
    assert!(output.is_dir());
}

#[tokio::test]
async fn missing_input_dir_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let err = summarize_directory_with(
        root.path().join("absent"),
        root.path().join("out"),
        &config(2),
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PdfSumError::ReadDir { .. }), "got {err:?}");
}

#[tokio::test]
async fn rerun_overwrites_previous_summaries() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(input.path(), &["a.pdf"]);
    std::fs::write(output.path().join("a_summary.md"), "stale and much longer content").unwrap();

    summarize_directory_with(
        input.path(),
        output.path(),
        &config(1),
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
    )
    .await
    .unwrap();

    let written = std::fs::read_to_string(output.path().join("a_summary.md")).unwrap();
    assert_eq!(written, "# Summary\n\ncontents of a.pdf");
}

// ── Single-file entry point ──────────────────────────────────────────────────

#[tokio::test]
async fn single_file_success() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_files(input.path(), &["paper.pdf"]);

    let outcome = summarize_file_with(
        input.path().join("paper.pdf"),
        output.path(),
        &config(1),
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
    )
    .await
    .unwrap();

    assert_eq!(
        outcome,
        Outcome::Success {
            identifier: "paper.pdf".into(),
            output_path: output.path().join("paper_summary.md"),
        }
    );
}

#[tokio::test]
async fn single_missing_file_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let err = summarize_file_with(
        root.path().join("ghost.pdf"),
        root.path(),
        &config(1),
        Arc::new(NameExtractor),
        Arc::new(CountingSummarizer::default()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PdfSumError::FileNotFound { .. }));
}
