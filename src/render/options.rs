//! Rendering options and configuration.

use crate::model::HeadingLevel;

/// Options for rendering a block sequence as Markdown.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum heading level (1-6); deeper headings are capped
    pub max_heading_level: u8,

    /// Text placed inside `![...]` for images without a description
    pub image_alt_text: String,

    /// Use each image's own description as its alt text when it has one
    pub image_descriptions: bool,

    /// Collect extraction statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, HeadingLevel::MAX);
        self
    }

    /// Set the alt text used for images.
    pub fn with_image_alt_text(mut self, alt: impl Into<String>) -> Self {
        // Alt text lives inside brackets on one line.
        self.image_alt_text = alt.into().replace(['\r', '\n'], " ").trim().to_string();
        self
    }

    /// Use image descriptions from the document as alt text.
    pub fn with_image_descriptions(mut self, enabled: bool) -> Self {
        self.image_descriptions = enabled;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_heading_level: HeadingLevel::MAX,
            image_alt_text: String::new(),
            image_descriptions: false,
            collect_stats: true,
        }
    }
}
