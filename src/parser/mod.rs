//! Word document package parsing.

mod docx_parser;
mod options;
pub mod package;
mod styles;
mod xml;

pub use docx_parser::{DocxParser, ParsedDocument};
pub use options::{ErrorMode, ParseOptions};
pub use package::{ContentTypes, Package, Relationship, Relationships};
pub use styles::{HeadingStyles, StyleTable};
