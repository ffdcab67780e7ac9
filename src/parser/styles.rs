//! Paragraph style names and the heading-level lookup.

use std::collections::HashMap;
use std::sync::OnceLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::error::Result;
use crate::model::HeadingLevel;

use super::xml::{attr, strip_bom};

/// Part name of the style definitions.
pub const STYLES_PART: &str = "word/styles.xml";

/// Paragraph style ids mapped to their display names, from `word/styles.xml`.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    names: HashMap<String, String>,
}

impl StyleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `word/styles.xml`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut table = StyleTable::new();
        let mut reader = Reader::from_reader(strip_bom(data));
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut current: Option<String> = None;
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.local_name().as_ref() == b"style" => {
                    let is_paragraph = attr(&e, b"type").map_or(true, |t| t == "paragraph");
                    current = if is_paragraph {
                        attr(&e, b"styleId")
                    } else {
                        None
                    };
                }
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"name" => {
                    if let (Some(id), Some(name)) = (current.as_ref(), attr(&e, b"val")) {
                        table.names.insert(id.clone(), name);
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"style" => {
                    current = None;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(table)
    }

    /// Register a style name (used when building tables by hand).
    pub fn insert(&mut self, style_id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(style_id.into(), name.into());
    }

    /// Display name of a style id.
    pub fn name_of(&self, style_id: &str) -> Option<&str> {
        self.names.get(style_id).map(String::as_str)
    }

    /// Display name of a style id, falling back to the id itself.
    pub fn resolve<'a>(&'a self, style_id: &'a str) -> &'a str {
        self.name_of(style_id).unwrap_or(style_id)
    }

    /// Number of paragraph styles.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^\s*heading\s*(\d+)\s*$").unwrap())
}

/// Lookup from paragraph style name to heading level.
///
/// Built-in `Heading N` names (any case, with or without the space) map to
/// level N, clamped to 1..=6. Additional names can be registered; `Title`
/// is registered at level 1 only when asked for.
#[derive(Debug, Clone, Default)]
pub struct HeadingStyles {
    extra: HashMap<String, HeadingLevel>,
}

impl HeadingStyles {
    /// Lookup with only the built-in `Heading N` names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also map `Title` to level 1.
    pub fn with_title(self) -> Self {
        self.with_style("Title", 1)
    }

    /// Map an additional style name to a level.
    pub fn with_style(mut self, name: impl AsRef<str>, level: u8) -> Self {
        self.extra
            .insert(name.as_ref().trim().to_lowercase(), HeadingLevel::new(level));
        self
    }

    /// Heading level for a style name, or `None` for a plain paragraph.
    pub fn level_for(&self, style_name: &str) -> Option<HeadingLevel> {
        if let Some(level) = self.extra.get(&style_name.trim().to_lowercase()) {
            return Some(*level);
        }

        let caps = heading_pattern().captures(style_name)?;
        let digits = caps.get(1)?.as_str();
        match digits.parse::<u32>() {
            Ok(0) => None,
            Ok(n) => Some(HeadingLevel::from_u32(n)),
            // More digits than fit in u32 is still a very deep heading.
            Err(_) => Some(HeadingLevel::new(HeadingLevel::MAX)),
        }
    }
}
