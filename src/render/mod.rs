//! Rendering of extracted documents to Markdown and JSON.

mod json;
mod markdown;
mod options;
mod result;

pub use json::{to_json, JsonFormat};
pub use markdown::{render, render_with_options, to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
pub use result::{ExtractionStats, RenderResult};
