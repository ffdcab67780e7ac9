//! Word document converter implementation.

use std::path::Path;

use crate::error::Result;
use crate::parser::DocxParser;
use crate::render::render_with_options;
use crate::resolve::ImageResolver;

use super::{Conversion, ConvertOptions, DocumentConverter};

/// Word (.docx) document converter.
///
/// Runs extraction, image resolution and rendering in that order.
#[derive(Debug, Clone, Default)]
pub struct DocxConverter {
    _private: (),
}

impl DocxConverter {
    /// Create a new docx converter.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for DocxConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn convert_bytes(
        &self,
        bytes: &[u8],
        images_dir: &Path,
        base_name: &str,
        options: &ConvertOptions,
    ) -> Result<Conversion> {
        let parsed = DocxParser::from_bytes_with_options(bytes, options.parse.clone())?.parse()?;
        let (document, resources) = parsed.into_parts();
        log::debug!(
            "{}: {} blocks, {} image resources",
            base_name,
            document.len(),
            resources.len()
        );

        let images = ImageResolver::new(images_dir, base_name).resolve(resources)?;
        let rendered = render_with_options(&document.blocks, &images.map, &options.render);

        let conversion = Conversion { rendered, images };
        let missing = conversion.missing_references();
        if missing > 0 {
            log::warn!(
                "{}: {} image reference(s) could not be resolved",
                base_name,
                missing
            );
        }

        Ok(conversion)
    }
}
