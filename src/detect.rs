//! Document container detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Container kind recognized from the leading bytes of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Zip archive, the container of Office Open XML packages (.docx)
    Zip,
    /// OLE2 compound file, the container of legacy binary Word files (.doc)
    LegacyCompound,
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerKind::Zip => write!(f, "zip package"),
            ContainerKind::LegacyCompound => write!(f, "legacy compound file"),
        }
    }
}

/// Local file header signature of a zip archive: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Empty zip archive (end of central directory only): PK\x05\x06
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
/// OLE2 compound file signature
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Detect the container kind of a file.
///
/// # Example
/// ```no_run
/// use docdown::detect::detect_container_from_path;
///
/// let kind = detect_container_from_path("report.docx").unwrap();
/// println!("container: {}", kind);
/// ```
pub fn detect_container_from_path<P: AsRef<Path>>(path: P) -> Result<ContainerKind> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(OLE_MAGIC.len());
    file.by_ref()
        .take(OLE_MAGIC.len() as u64)
        .read_to_end(&mut header)?;
    detect_container_from_bytes(&header)
}

/// Detect the container kind from the leading bytes of a file.
///
/// # Returns
/// * `Ok(ContainerKind)` for a zip archive or a legacy compound file
/// * `Err(Error::UnsupportedFormat)` for empty or unrecognized data
pub fn detect_container_from_bytes(data: &[u8]) -> Result<ContainerKind> {
    if data.is_empty() {
        return Err(Error::UnsupportedFormat("file is empty".into()));
    }

    if data.starts_with(ZIP_MAGIC) || data.starts_with(ZIP_EMPTY_MAGIC) {
        return Ok(ContainerKind::Zip);
    }

    if data.starts_with(OLE_MAGIC) {
        return Ok(ContainerKind::LegacyCompound);
    }

    Err(Error::UnsupportedFormat(
        "not a zip package (missing PK signature)".into(),
    ))
}

/// Check that data looks like a package this crate can convert.
///
/// Legacy compound files are rejected with an explanatory message.
pub fn ensure_supported(data: &[u8]) -> Result<()> {
    match detect_container_from_bytes(data)? {
        ContainerKind::Zip => Ok(()),
        ContainerKind::LegacyCompound => Err(Error::UnsupportedFormat(
            "legacy binary Word document (.doc) is not supported; save it as .docx".into(),
        )),
    }
}

/// Check if a file starts with a zip signature.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_container_from_path(path), Ok(ContainerKind::Zip))
}

/// Check if bytes start with a zip signature.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    matches!(detect_container_from_bytes(data), Ok(ContainerKind::Zip))
}
