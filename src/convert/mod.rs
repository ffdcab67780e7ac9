//! Document conversion: one source document in, one Markdown file (plus
//! its images) out.
//!
//! A [`DocumentConverter`] turns document bytes into Markdown while writing
//! images next to it. [`DocumentConverter::convert_job`] wraps the whole
//! pipeline for one [`ConversionJob`] and never fails: every error becomes a
//! [`ConversionOutcome::Failure`] so one bad document cannot stop a batch.
//!
//! # Example
//!
//! ```no_run
//! use docdown::convert::{ConversionJob, ConvertOptions, DocumentConverter, DocxConverter};
//!
//! let converter = DocxConverter::new();
//! let job = ConversionJob::new("in/report.docx", "out");
//! let report = converter.convert_job(&job, &ConvertOptions::default());
//! println!("{}: {}", report.source.display(), report.outcome);
//! ```

mod docx;

pub use docx::DocxConverter;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::ParseOptions;
use crate::render::{ExtractionStats, RenderOptions, RenderResult};
use crate::resolve::{ImageFailure, ResolvedImages, IMAGES_DIR_NAME};

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Extraction options
    pub parse: ParseOptions,

    /// Rendering options
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Map the `Title` style to a level 1 heading.
    pub fn with_title_as_heading(mut self, enabled: bool) -> Self {
        self.parse = self.parse.with_title_as_heading(enabled);
        self
    }

    /// Cap heading levels in the output.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.render = self.render.with_max_heading(level);
        self
    }

    /// Skip unreadable optional package parts instead of failing.
    pub fn lenient(mut self) -> Self {
        self.parse = self.parse.lenient();
        self
    }

    /// Use image descriptions from the document as alt text.
    pub fn with_image_descriptions(mut self, enabled: bool) -> Self {
        self.render = self.render.with_image_descriptions(enabled);
        self
    }
}

/// One document to convert: where it is and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Source document
    pub source: PathBuf,

    /// Directory receiving `{stem}.md` and `images/`
    pub output_dir: PathBuf,
}

impl ConversionJob {
    /// Create a job.
    pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Base name used for the Markdown file and image names.
    pub fn base_name(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }

    /// Path of the Markdown output.
    pub fn markdown_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.md", self.base_name()))
    }

    /// Directory images are written to.
    pub fn images_dir(&self) -> PathBuf {
        self.output_dir.join(IMAGES_DIR_NAME)
    }
}

/// Per-document result signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// Markdown written, nothing missing
    Success,

    /// Markdown written, but some images are missing from it
    PartialSuccess {
        /// Unresolved image references plus images that failed to write
        warning_count: usize,
    },

    /// No Markdown written
    Failure {
        /// Why the document could not be converted
        reason: String,
    },
}

impl ConversionOutcome {
    /// Outcome for a written document with `warning_count` warnings.
    pub fn from_warnings(warning_count: usize) -> Self {
        if warning_count == 0 {
            ConversionOutcome::Success
        } else {
            ConversionOutcome::PartialSuccess { warning_count }
        }
    }

    /// Whether the Markdown file was written.
    pub fn is_written(&self) -> bool {
        !self.is_failure()
    }

    /// Whether the document failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, ConversionOutcome::Failure { .. })
    }

    /// Number of warnings (zero for success and failure).
    pub fn warning_count(&self) -> usize {
        match self {
            ConversionOutcome::PartialSuccess { warning_count } => *warning_count,
            _ => 0,
        }
    }
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionOutcome::Success => write!(f, "converted"),
            ConversionOutcome::PartialSuccess { warning_count } => {
                write!(f, "converted with {} warning(s)", warning_count)
            }
            ConversionOutcome::Failure { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Result of converting document bytes, before anything is written for
/// the Markdown itself.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Rendered Markdown with its warnings and statistics
    pub rendered: RenderResult,

    /// Images written and images that failed
    pub images: ResolvedImages,
}

impl Conversion {
    /// Image references with no image in the package.
    ///
    /// References to an image that exists but failed to write are counted
    /// once, as that image's failure.
    pub fn missing_references(&self) -> usize {
        self.rendered
            .unresolved_images
            .iter()
            .filter(|id| !self.images.is_failed(id))
            .count()
    }

    /// Missing references plus failed image writes.
    pub fn warning_count(&self) -> usize {
        self.missing_references() + self.images.warning_count()
    }
}

/// Everything known about one finished job.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Source document
    pub source: PathBuf,

    /// Markdown file, when one was written
    pub output: Option<PathBuf>,

    /// Result signal
    pub outcome: ConversionOutcome,

    /// Category of the error behind a failure (see [`Error::kind`])
    pub failure_kind: Option<&'static str>,

    /// Number of image files written
    pub images_written: usize,

    /// Images that could not be written
    pub image_failures: Vec<ImageFailure>,

    /// Rendering statistics, when the Markdown was produced
    pub stats: Option<ExtractionStats>,
}

impl ConversionReport {
    /// Report for a document whose Markdown was written to `output`.
    pub fn written(source: impl Into<PathBuf>, output: PathBuf, conversion: Conversion) -> Self {
        Self {
            source: source.into(),
            output: Some(output),
            outcome: ConversionOutcome::from_warnings(conversion.warning_count()),
            failure_kind: None,
            images_written: conversion.images.written_count(),
            image_failures: conversion.images.failures,
            stats: Some(conversion.rendered.stats),
        }
    }

    /// Report for a document that failed with `err`.
    pub fn failed(source: impl Into<PathBuf>, err: &Error) -> Self {
        Self {
            source: source.into(),
            output: None,
            outcome: ConversionOutcome::Failure {
                reason: err.to_string(),
            },
            failure_kind: Some(err.kind()),
            images_written: 0,
            image_failures: Vec::new(),
            stats: None,
        }
    }
}

/// Trait for document converters.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["docx"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert document bytes to Markdown, writing images into
    /// `images_dir` with names derived from `base_name`.
    fn convert_bytes(
        &self,
        bytes: &[u8],
        images_dir: &Path,
        base_name: &str,
        options: &ConvertOptions,
    ) -> Result<Conversion>;

    /// Convert the file at `job.source` and write `{stem}.md` into
    /// `job.output_dir`, which must already exist.
    fn convert(&self, job: &ConversionJob, options: &ConvertOptions) -> Result<(PathBuf, Conversion)> {
        let bytes = fs::read(&job.source)?;
        let conversion =
            self.convert_bytes(&bytes, &job.images_dir(), &job.base_name(), options)?;

        let output = job.markdown_path();
        fs::write(&output, &conversion.rendered.content)
            .map_err(|e| Error::write(output.clone(), e))?;

        Ok((output, conversion))
    }

    /// Run one job to completion. Errors never escape; they become a
    /// [`ConversionOutcome::Failure`].
    fn convert_job(&self, job: &ConversionJob, options: &ConvertOptions) -> ConversionReport {
        match self.convert(job, options) {
            Ok((output, conversion)) => {
                log::info!(
                    "converted {} to {}",
                    job.source.display(),
                    output.display()
                );
                ConversionReport::written(&job.source, output, conversion)
            }
            Err(err) => {
                log::error!("failed to convert {}: {}", job.source.display(), err);
                ConversionReport::failed(&job.source, &err)
            }
        }
    }

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document converters.
///
/// The registry maps file extensions to converters.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with default converters (docx).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxConverter::new()));
        registry
    }

    /// Register a converter for all its supported extensions.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters.insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name.insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.converters.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Get the converter for a path's extension.
    pub fn for_path(&self, path: &Path) -> Result<Arc<dyn DocumentConverter>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat("file has no extension".into()))?;

        self.get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(format!("no converter for .{} files", ext)))
    }

    /// Run a job with the converter for its source's extension.
    pub fn convert_job(&self, job: &ConversionJob, options: &ConvertOptions) -> ConversionReport {
        match self.for_path(&job.source) {
            Ok(converter) => converter.convert_job(job, options),
            Err(err) => {
                log::error!("failed to convert {}: {}", job.source.display(), err);
                ConversionReport::failed(&job.source, &err)
            }
        }
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
