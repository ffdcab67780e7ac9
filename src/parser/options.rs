//! Parsing options and configuration.

use super::HeadingStyles;

/// Options for extracting documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode for optional package parts
    pub error_mode: ErrorMode,

    /// Whether to collect embedded image resources
    pub extract_images: bool,

    /// Style name to heading level lookup
    pub heading_styles: HeadingStyles,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable optional parts).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable image extraction.
    pub fn with_images(mut self, extract: bool) -> Self {
        self.extract_images = extract;
        self
    }

    /// Map the `Title` style to a level 1 heading.
    pub fn with_title_as_heading(mut self, enabled: bool) -> Self {
        if enabled {
            self.heading_styles = self.heading_styles.with_title();
        }
        self
    }

    /// Map an additional style name to a heading level.
    pub fn with_heading_style(mut self, name: impl AsRef<str>, level: u8) -> Self {
        self.heading_styles = self.heading_styles.with_style(name, level);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            extract_images: true,
            heading_styles: HeadingStyles::new(),
        }
    }
}

/// Error handling mode during parsing.
///
/// Only optional parts (styles, relationships) are affected; a missing or
/// unparsable main document part is always an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any malformed part
    #[default]
    Strict,
    /// Skip malformed optional parts and continue
    Lenient,
}
