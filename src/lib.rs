//! # docdown
//!
//! Word (.docx) to Markdown conversion for single files and whole
//! directory trees.
//!
//! A document goes through three stages: extraction into an ordered list
//! of blocks plus embedded images, image resolution (images written to an
//! `images/` folder next to the Markdown), and rendering.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docdown::Docdown;
//!
//! fn main() -> docdown::Result<()> {
//!     let summary = Docdown::new()
//!         .with_title_as_heading(true)
//!         .convert("docs/", "markdown/")?;
//!
//!     println!("{} converted, {} failed", summary.converted_count(), summary.failed_count());
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Features
//!
//! - **Headings**: `Heading N` paragraph styles become `#` headings
//! - **Images**: DrawingML and VML images are written as files and linked
//! - **Trees**: directory hierarchies are mirrored in the output
//! - **Isolation**: a broken document is reported and skipped, never fatal
//! - **Parallel processing**: optional Rayon fan-out across documents

pub mod batch;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolve;

// Re-export commonly used types
pub use batch::{BatchRunner, BatchSummary, JobPlan, JobPlanner, JobSink, LogSink};
pub use convert::{
    ConversionJob, ConversionOutcome, ConversionReport, ConvertOptions, ConverterRegistry,
    DocumentConverter, DocxConverter,
};
pub use detect::{detect_container_from_bytes, detect_container_from_path, is_docx, ContainerKind};
pub use error::{Error, Result};
pub use model::{Block, Document, HeadingLevel, ImagePathMap, ImageResource};
pub use parser::{DocxParser, ErrorMode, ParseOptions, ParsedDocument};
pub use render::{JsonFormat, RenderOptions, RenderResult};
pub use resolve::{ImageResolver, ResolvedImages};

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Extract blocks and image resources from document bytes.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("report.docx").unwrap();
/// let (document, images) = docdown::extract(&data).unwrap().into_parts();
/// println!("{} blocks, {} images", document.len(), images.len());
/// ```
pub fn extract(data: &[u8]) -> Result<ParsedDocument> {
    DocxParser::from_bytes(data)?.parse()
}

/// Parse a .docx file and return its block structure.
///
/// # Example
///
/// ```no_run
/// use docdown::parse_file;
///
/// let doc = parse_file("report.docx").unwrap();
/// println!("Headings: {}", doc.heading_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    Ok(DocxParser::open(path)?.parse()?.document)
}

/// Parse a .docx file with custom options.
///
/// # Example
///
/// ```no_run
/// use docdown::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().with_title_as_heading(true);
/// let doc = parse_file_with_options("report.docx", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    Ok(DocxParser::open_with_options(path, options)?.parse()?.document)
}

/// Parse a .docx from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    Ok(DocxParser::from_bytes(data)?.parse()?.document)
}

/// Parse a .docx from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    Ok(DocxParser::from_bytes_with_options(data, options)?
        .parse()?
        .document)
}

/// Parse a .docx from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    Ok(DocxParser::from_reader(reader)?.parse()?.document)
}

/// Extract plain text from a .docx file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(parse_file(path)?.plain_text())
}

/// Convert a .docx file's block structure to JSON.
///
/// # Example
///
/// ```no_run
/// use docdown::{to_json, JsonFormat};
///
/// let json = to_json("report.docx", JsonFormat::Pretty).unwrap();
/// std::fs::write("report.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Convert one document into `output_dir` (`{stem}.md` plus `images/`).
///
/// # Example
///
/// ```no_run
/// let report = docdown::convert_file("report.docx", "out");
/// println!("{}", report.outcome);
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, output_dir: Q) -> ConversionReport {
    Docdown::new().convert_file(source, output_dir)
}

/// Builder for converting documents and directory trees.
///
/// # Example
///
/// ```no_run
/// use docdown::{Docdown, LogSink};
///
/// let summary = Docdown::new()
///     .lenient()
///     .with_max_heading(3)
///     .parallel(true)
///     .run("in", "out", &mut LogSink)?;
/// # Ok::<(), docdown::Error>(())
/// ```
pub struct Docdown {
    options: ConvertOptions,
    parallel: bool,
}

impl Docdown {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            parallel: false,
        }
    }

    /// Skip unreadable optional package parts instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Map the `Title` style to a level 1 heading.
    pub fn with_title_as_heading(mut self, enabled: bool) -> Self {
        self.options = self.options.with_title_as_heading(enabled);
        self
    }

    /// Map an additional paragraph style name to a heading level.
    pub fn with_heading_style(mut self, name: impl AsRef<str>, level: u8) -> Self {
        self.options.parse = self.options.parse.with_heading_style(name, level);
        self
    }

    /// Cap heading levels in the output.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.options = self.options.with_max_heading(level);
        self
    }

    /// Use each image's description as its alt text.
    pub fn with_image_descriptions(mut self, enabled: bool) -> Self {
        self.options = self.options.with_image_descriptions(enabled);
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.options.parse = self.options.parse.with_images(extract);
        self
    }

    /// Convert documents on the Rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Conversion options in effect.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    fn runner(&self) -> BatchRunner {
        BatchRunner::new(Arc::new(DocxConverter::new()))
            .with_options(self.options.clone())
            .parallel(self.parallel)
    }

    /// Convert one document into `output_dir`, creating it if needed.
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        output_dir: Q,
    ) -> ConversionReport {
        let job = ConversionJob::new(source.as_ref(), output_dir.as_ref());
        self.runner().run_job(&job)
    }

    /// Convert a file or tree, reporting each document to `sink`.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        target: Q,
        sink: &mut dyn JobSink,
    ) -> Result<BatchSummary> {
        let plan = JobPlanner::new(source.as_ref(), target.as_ref()).plan()?;
        Ok(self.runner().run(&plan, sink))
    }

    /// Convert a file or tree, logging each document.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        target: Q,
    ) -> Result<BatchSummary> {
        self.run(source, target, &mut LogSink)
    }
}

impl Default for Docdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docdown_builder() {
        let builder = Docdown::new()
            .lenient()
            .with_title_as_heading(true)
            .with_max_heading(4)
            .with_image_descriptions(true)
            .parallel(true);

        assert_eq!(builder.options.parse.error_mode, ErrorMode::Lenient);
        assert!(builder.options.parse.heading_styles.level_for("Title").is_some());
        assert_eq!(builder.options.render.max_heading_level, 4);
        assert!(builder.options.render.image_descriptions);
        assert!(builder.parallel);
    }

    #[test]
    fn test_docdown_builder_default() {
        let builder = Docdown::default();
        assert_eq!(builder.options.parse.error_mode, ErrorMode::Strict);
        assert!(builder.options.parse.extract_images);
        assert!(!builder.parallel);
    }

    #[test]
    fn test_docdown_builder_custom_style() {
        let builder = Docdown::new().with_heading_style("Chapter", 1).with_images(false);
        assert_eq!(
            builder.options.parse.heading_styles.level_for("Chapter"),
            Some(HeadingLevel::new(1))
        );
        assert!(!builder.options.parse.extract_images);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_parse_bytes_empty_data() {
        let result = parse_bytes(&[]);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_parse_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(matches!(parse_bytes(&data), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_parse_bytes_truncated_zip() {
        let data = b"PK\x03\x04truncated";
        assert!(parse_bytes(data).is_err());
    }

    #[test]
    fn test_extract_legacy_doc() {
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00];
        match extract(&data) {
            Err(Error::UnsupportedFormat(msg)) => assert!(msg.contains(".doc")),
            other => panic!("expected unsupported format, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_convert_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let report = convert_file(dir.path().join("missing.docx"), dir.path());
        assert!(report.outcome.is_failure());
        assert_eq!(report.failure_kind, Some("io"));
    }

    #[test]
    fn test_run_missing_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Docdown::new().convert(dir.path().join("missing"), dir.path().join("out"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
