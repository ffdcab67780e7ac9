//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Resource ids of image blocks that had no path in the map, one entry
    /// per block
    pub unresolved_images: Vec<String>,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, unresolved_images: Vec<String>, stats: ExtractionStats) -> Self {
        Self {
            content,
            unresolved_images,
            stats,
        }
    }

    /// Whether every image reference was resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved_images.is_empty()
    }
}

/// Statistics collected during rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of headings rendered
    pub heading_count: u32,

    /// Number of non-empty paragraphs rendered
    pub paragraph_count: u32,

    /// Number of empty paragraphs (blank lines)
    pub empty_paragraph_count: u32,

    /// Number of images rendered as links
    pub image_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment paragraph count, tracking empty ones separately.
    pub fn add_paragraph(&mut self, empty: bool) {
        if empty {
            self.empty_paragraph_count += 1;
        } else {
            self.paragraph_count += 1;
        }
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
