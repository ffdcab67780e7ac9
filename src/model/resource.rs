//! Embedded image resources.

use serde::{Deserialize, Serialize};

/// An image embedded in the document package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResource {
    /// Relationship id used by inline references (e.g. "rId7")
    pub id: String,

    /// Raw binary data
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Content type declared by the package (e.g. "image/png")
    pub content_type: Option<String>,

    /// Part name inside the package (e.g. "word/media/image1.png")
    pub part_name: String,
}

impl ImageResource {
    /// Create a new image resource.
    pub fn new(id: impl Into<String>, part_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            data,
            content_type: None,
            part_name: part_name.into(),
        }
    }

    /// Set the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Get the size of the resource data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Content type, preferring the declared one over sniffed magic bytes.
    pub fn mime_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .or_else(|| Self::detect_mime_type(&self.data))
    }

    /// File extension for the output file.
    ///
    /// Resolution order: declared content type, magic bytes, part name
    /// extension, then `bin`.
    pub fn extension(&self) -> String {
        if let Some(ext) = self.content_type.as_deref().and_then(extension_for_mime) {
            return ext.to_string();
        }
        if let Some(ext) = Self::detect_mime_type(&self.data).and_then(extension_for_mime) {
            return ext.to_string();
        }
        part_extension(&self.part_name).unwrap_or_else(|| "bin".to_string())
    }

    /// Detect MIME type from data magic bytes.
    pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.len() < 4 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("image/gif");
        }

        // TIFF: 49 49 2A 00 (little-endian) or 4D 4D 00 2A (big-endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("image/tiff");
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Some("image/bmp");
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some("image/webp");
        }

        // EMF: record type 1 followed by " EMF" signature at offset 40
        if data.len() >= 44 && data.starts_with(&[0x01, 0x00, 0x00, 0x00]) && &data[40..44] == b" EMF"
        {
            return Some("image/x-emf");
        }

        // WMF placeable header: D7 CD C6 9A
        if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
            return Some("image/x-wmf");
        }

        None
    }
}

/// Map a content type to a file extension.
fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let ext = match mime.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/tiff" => "tiff",
        "image/bmp" | "image/x-bmp" => "bmp",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/x-emf" | "image/emf" => "emf",
        "image/x-wmf" | "image/wmf" => "wmf",
        "image/vnd.microsoft.icon" | "image/x-icon" => "ico",
        _ => return None,
    };
    Some(ext)
}

/// Lowercase extension of a part name, if it has a sensible one.
fn part_extension(part_name: &str) -> Option<String> {
    let file_name = part_name.rsplit('/').next()?;
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
