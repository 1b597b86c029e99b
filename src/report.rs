//! Outcome of a single organize run.
//!
//! The report keeps one entry per file in scan order, so printing it twice
//! yields the same text. The exit status is derived from it.

use crate::file_organizer::{Operation, RunMode};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Exit status of a run with no per-file failures.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status when at least one file could not be moved.
pub const EXIT_FILE_FAILURES: u8 = 1;
/// Exit status when the run could not start (bad root or config).
pub const EXIT_PREFLIGHT_FAILURE: u8 = 2;

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was moved, or would be in a dry run.
    Moved(Operation),
    /// The file could not be planned or moved.
    Failed { path: PathBuf, reason: String },
}

/// Collected results of an organize run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: RunMode,
    pub root: PathBuf,
    pub recursive: bool,
    pub outcomes: Vec<FileOutcome>,
}

impl RunReport {
    pub fn new(mode: RunMode, root: &Path, recursive: bool) -> Self {
        Self {
            mode,
            root: root.to_path_buf(),
            recursive,
            outcomes: Vec::new(),
        }
    }

    pub fn record_move(&mut self, operation: Operation) {
        self.outcomes.push(FileOutcome::Moved(operation));
    }

    pub fn record_failure(&mut self, path: PathBuf, reason: impl Into<String>) {
        self.outcomes.push(FileOutcome::Failed {
            path,
            reason: reason.into(),
        });
    }

    /// Planned or executed moves, in scan order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Moved(op) => Some(op),
            FileOutcome::Failed { .. } => None,
        })
    }

    pub fn success_count(&self) -> usize {
        self.operations().count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn exit_status(&self) -> u8 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_FILE_FAILURES
        }
    }

    /// Number of files per destination folder, sorted by folder name.
    pub fn folder_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for op in self.operations() {
            *counts.entry(op.folder.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// One-line description of the run used as the report header.
    pub fn header_line(&self) -> String {
        let mode = match self.mode {
            RunMode::DryRun => "DRY-RUN",
            RunMode::Apply => "APPLY",
        };
        format!(
            "{} on: {} (recursive={})",
            mode,
            self.root.display(),
            self.recursive
        )
    }

    /// Plain-text line for one outcome, with paths relative to the root.
    pub fn outcome_line(&self, outcome: &FileOutcome) -> String {
        match outcome {
            FileOutcome::Moved(op) => {
                let from = self.relative(&op.original_path);
                let to = self.relative(&op.new_path);
                match self.mode {
                    RunMode::DryRun => format!("[DRY] Would move: {from} -> {to}"),
                    RunMode::Apply => format!("Moved: {from} -> {to}"),
                }
            }
            FileOutcome::Failed { path, reason } => {
                format!("Failed: {}: {}", self.relative(path), reason)
            }
        }
    }

    /// Trailing count line.
    pub fn totals_line(&self) -> String {
        let verb = match self.mode {
            RunMode::DryRun => "planned",
            RunMode::Apply => "moved",
        };
        format!(
            "{} {}, {} failed",
            self.success_count(),
            verb,
            self.failure_count()
        )
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
