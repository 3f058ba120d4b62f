//! Result types: work items, per-item outcomes, and the aggregated batch.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One unit of work: an input document and the shared output directory.
///
/// Immutable once created; the runner hands each item to exactly one
/// processor invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    input: PathBuf,
    output_dir: PathBuf,
}

impl WorkItem {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Path of the input document.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Directory the summary is written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Human-readable identifier used in reports: the input's file name.
    pub fn identifier(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// Result of processing one [`WorkItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Summary written to `output_path`.
    Success {
        identifier: String,
        output_path: PathBuf,
    },
    /// Processing stopped at the first failing stage; `error` is its message.
    Failure { identifier: String, error: String },
}

impl Outcome {
    pub fn identifier(&self) -> &str {
        match self {
            Outcome::Success { identifier, .. } | Outcome::Failure { identifier, .. } => {
                identifier
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn output_path(&self) -> Option<&Path> {
        match self {
            Outcome::Success { output_path, .. } => Some(output_path),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }
}

/// Outcomes of a batch run, one per submitted item, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub outcomes: Vec<Outcome>,
}

impl BatchResult {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self { outcomes }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Outcome> {
        self.outcomes.iter()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

impl IntoIterator for BatchResult {
    type Item = Outcome;
    type IntoIter = std::vec::IntoIter<Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a Outcome;
    type IntoIter = std::slice::Iter<'a, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
