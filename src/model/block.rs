//! Block-level types.

use serde::{Deserialize, Serialize};

/// A heading level between 1 and 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Deepest level Markdown supports.
    pub const MAX: u8 = 6;

    /// Create a heading level, clamping into 1..=6.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, Self::MAX))
    }

    /// Create a heading level from a wider integer (e.g. parsed style digits).
    pub fn from_u32(level: u32) -> Self {
        Self::new(level.min(u32::from(Self::MAX)) as u8)
    }

    /// Numeric level.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Cap the level at `max` (itself clamped into 1..=6).
    pub fn capped(self, max: u8) -> Self {
        Self::new(self.0.min(max))
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A structural unit of the document, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// Paragraph whose style maps to a heading level
    Heading {
        /// Heading level (1-6)
        level: HeadingLevel,
        /// Plain text of the heading
        text: String,
    },

    /// Plain paragraph; empty text is kept to preserve spacing
    Paragraph {
        /// Plain text content
        text: String,
    },

    /// Reference to an embedded image resource
    Image {
        /// Relationship id of the image inside the package (e.g. "rId7")
        resource_id: String,
        /// Author-supplied description (`wp:docPr/@descr`), single line
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl Block {
    /// Create a heading block.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level: HeadingLevel::new(level),
            text: text.into(),
        }
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// Create an image block.
    pub fn image(resource_id: impl Into<String>) -> Self {
        Block::Image {
            resource_id: resource_id.into(),
            description: None,
        }
    }

    /// Create an image block carrying a description.
    ///
    /// Line breaks become spaces and surrounding whitespace is dropped; a
    /// description that ends up empty is not kept.
    pub fn described_image(resource_id: impl Into<String>, description: &str) -> Self {
        let description = description.replace(['\r', '\n'], " ").trim().to_string();
        Block::Image {
            resource_id: resource_id.into(),
            description: (!description.is_empty()).then_some(description),
        }
    }

    /// Text of the block, if it carries any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading { text, .. } | Block::Paragraph { text } => Some(text),
            Block::Image { .. } => None,
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this is an image reference.
    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image { .. })
    }
}
