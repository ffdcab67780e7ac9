//! Batch statistics.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::convert::{ConversionOutcome, ConversionReport};
use crate::error::{Error, Result};
use crate::resolve::ImageFailure;

/// Checks worth doing when a package could not be opened.
const PACKAGE_HINTS: &[&str] = &[
    "a valid .docx file (not .doc)",
    "not password protected",
    "not corrupted",
];

/// A document written with warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDocument {
    /// Source document
    pub source: PathBuf,
    /// Unresolved references plus failed image writes
    pub warning_count: usize,
}

/// A document that produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDocument {
    /// Source document
    pub source: PathBuf,
    /// Error message
    pub reason: String,
    /// Error category, when known
    pub kind: Option<String>,
}

impl FailedDocument {
    /// Things to check for this kind of failure; empty when there is
    /// nothing useful to suggest.
    pub fn hints(&self) -> &'static [&'static str] {
        match self.kind.as_deref() {
            Some("unsupported-format") | Some("corrupt-document") => PACKAGE_HINTS,
            _ => &[],
        }
    }
}

/// Images written for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCount {
    /// Source document
    pub source: PathBuf,
    /// Image files written
    pub images: usize,
}

/// Totals for a whole run, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Documents attempted
    pub total_files: usize,

    /// Documents converted without warnings
    pub succeeded: Vec<PathBuf>,

    /// Documents converted with warnings
    pub partial: Vec<PartialDocument>,

    /// Documents that failed
    pub failed: Vec<FailedDocument>,

    /// Files seen but not treated as documents
    pub skipped: Vec<PathBuf>,

    /// Per-document image counts (documents with at least one image)
    pub images_per_file: Vec<ImageCount>,

    /// Image files written across the run
    pub total_images: usize,

    /// Images that could not be written
    pub failed_images: Vec<ImageFailure>,
}

impl BatchSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one report into the totals.
    pub fn record(&mut self, report: &ConversionReport) {
        self.total_files += 1;

        match &report.outcome {
            ConversionOutcome::Success => self.succeeded.push(report.source.clone()),
            ConversionOutcome::PartialSuccess { warning_count } => {
                self.partial.push(PartialDocument {
                    source: report.source.clone(),
                    warning_count: *warning_count,
                })
            }
            ConversionOutcome::Failure { reason } => self.failed.push(FailedDocument {
                source: report.source.clone(),
                reason: reason.clone(),
                kind: report.failure_kind.map(str::to_string),
            }),
        }

        if report.images_written > 0 {
            self.images_per_file.push(ImageCount {
                source: report.source.clone(),
                images: report.images_written,
            });
            self.total_images += report.images_written;
        }
        self.failed_images
            .extend(report.image_failures.iter().cloned());
    }

    /// Record files the planner did not treat as documents.
    pub fn add_skipped<I: IntoIterator<Item = PathBuf>>(&mut self, paths: I) {
        self.skipped.extend(paths);
    }

    /// Documents whose Markdown was written.
    pub fn converted_count(&self) -> usize {
        self.succeeded.len() + self.partial.len()
    }

    /// Documents that failed.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Whether any document or image failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || !self.failed_images.is_empty()
    }

    /// Process exit code: 1 when any document or image failed.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }
}
