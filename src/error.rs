//! Error types for docdown library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docdown operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a package of the supported document type.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A required part of the package is missing or unparsable.
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    /// An output file or directory could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Path that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Another source in the same run already produces this output.
    #[error("Output {} is already produced by {}", path.display(), claimed_by.display())]
    OutputConflict {
        /// Markdown file both sources map to
        path: PathBuf,
        /// Source that keeps the output
        claimed_by: PathBuf,
    },

    /// Error during rendering or serialization of output.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a write error for `path`.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    /// Short, stable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::UnsupportedFormat(_) => "unsupported-format",
            Error::CorruptDocument(_) => "corrupt-document",
            Error::Write { .. } => "write",
            Error::OutputConflict { .. } => "output-conflict",
            Error::Render(_) => "render",
            Error::Other(_) => "other",
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => {
                Error::CorruptDocument("required part not found in package".into())
            }
            _ => Error::UnsupportedFormat(format!("not a readable package: {}", err)),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::CorruptDocument(format!("malformed XML: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(err.to_string())
    }
}
