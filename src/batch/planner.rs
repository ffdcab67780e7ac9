//! Source tree walking and job planning.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::convert::ConversionJob;
use crate::error::{Error, Result};

/// Extensions picked up by default. Legacy `.doc` files are planned so
/// they surface as failures instead of disappearing.
pub const DEFAULT_EXTENSIONS: &[&str] = &["docx", "doc"];

/// Prefix Office uses for owner lock files next to open documents.
const LOCK_FILE_PREFIX: &str = "~$";

/// Jobs discovered under a source path.
#[derive(Debug, Clone, Default)]
pub struct JobPlan {
    /// Documents to convert, in walk order
    pub jobs: Vec<ConversionJob>,

    /// Files seen but not converted
    pub skipped: Vec<PathBuf>,

    /// Documents whose output another job already writes
    pub conflicts: Vec<OutputConflict>,
}

impl JobPlan {
    /// Number of documents found, conflicting ones included.
    pub fn len(&self) -> usize {
        self.jobs.len() + self.conflicts.len()
    }

    /// Check if no documents were found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A document left out of the plan because an earlier job writes the
/// same Markdown file (e.g. `report.docx` next to `report.doc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConflict {
    /// The job that would have overwritten the output
    pub job: ConversionJob,
    /// Source of the job that keeps the output
    pub claimed_by: PathBuf,
}

impl OutputConflict {
    /// The error reported for the left-out document.
    pub fn error(&self) -> Error {
        Error::OutputConflict {
            path: self.job.markdown_path(),
            claimed_by: self.claimed_by.clone(),
        }
    }
}

/// Maps a source file or tree onto an output tree.
///
/// For a directory source every matching file becomes a job whose output
/// directory mirrors the file's parent relative to the source root. Two
/// files whose outputs coincide (same directory, same stem, compared
/// without case) keep the first in walk order; the rest become conflicts.
/// The planner creates no directories.
#[derive(Debug, Clone)]
pub struct JobPlanner {
    source: PathBuf,
    target: PathBuf,
    extensions: Vec<String>,
}

impl JobPlanner {
    /// Plan conversions from `source` into `target`.
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the set of document extensions (case-insensitive, no dot).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Whether `path` names a document this planner converts.
    pub fn is_document(&self, path: &Path) -> bool {
        let is_lock_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOCK_FILE_PREFIX));
        if is_lock_file {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Walk the source and build the plan.
    pub fn plan(&self) -> Result<JobPlan> {
        let metadata = std::fs::metadata(&self.source).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("cannot read source {}: {}", self.source.display(), e),
            ))
        })?;

        let mut plan = JobPlan::default();
        if metadata.is_file() {
            if self.is_document(&self.source) {
                plan.jobs
                    .push(ConversionJob::new(&self.source, &self.target));
            } else {
                log::warn!("skipping {}: not a Word document", self.source.display());
                plan.skipped.push(self.source.clone());
            }
            return Ok(plan);
        }

        let mut claimed: HashMap<String, PathBuf> = HashMap::new();
        for entry in WalkDir::new(&self.source).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("cannot read directory entry: {}", e);
                    if let Some(path) = e.path() {
                        plan.skipped.push(path.to_path_buf());
                    }
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.is_document(path) {
                log::debug!("skipping {}", path.display());
                plan.skipped.push(path.to_path_buf());
                continue;
            }

            let job = ConversionJob::new(path, self.output_dir_for(path));
            let key = job.markdown_path().to_string_lossy().to_lowercase();
            match claimed.get(&key) {
                Some(first) => {
                    log::warn!(
                        "{} and {} both convert to {}, keeping the first",
                        first.display(),
                        path.display(),
                        job.markdown_path().display()
                    );
                    plan.conflicts.push(OutputConflict {
                        claimed_by: first.clone(),
                        job,
                    });
                }
                None => {
                    claimed.insert(key, path.to_path_buf());
                    plan.jobs.push(job);
                }
            }
        }

        log::info!(
            "found {} document(s) under {} ({} other file(s) skipped)",
            plan.jobs.len(),
            self.source.display(),
            plan.skipped.len()
        );
        Ok(plan)
    }

    fn output_dir_for(&self, path: &Path) -> PathBuf {
        let relative = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.source).ok())
            .unwrap_or_else(|| Path::new(""));
        self.target.join(relative)
    }
}
