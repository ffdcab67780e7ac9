//! Markdown rendering for extracted documents.

use crate::model::{Block, Document, HeadingLevel, ImagePathMap};

use super::{ExtractionStats, RenderOptions, RenderResult};

/// Render blocks to Markdown with default options.
pub fn render(blocks: &[Block], images: &ImagePathMap) -> RenderResult {
    MarkdownRenderer::new(RenderOptions::default()).render(blocks, images)
}

/// Render blocks to Markdown.
pub fn render_with_options(
    blocks: &[Block],
    images: &ImagePathMap,
    options: &RenderOptions,
) -> RenderResult {
    MarkdownRenderer::new(options.clone()).render(blocks, images)
}

/// Convert a document to Markdown text.
pub fn to_markdown(doc: &Document, images: &ImagePathMap, options: &RenderOptions) -> String {
    render_with_options(&doc.blocks, images, options).content
}

/// Markdown renderer.
///
/// Every block ends with a blank line, except empty paragraphs which emit a
/// single newline. Text is written verbatim; no Markdown escaping happens.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: ExtractionStats,
    unresolved: Vec<String>,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: ExtractionStats::new(),
            unresolved: Vec::new(),
        }
    }

    /// Render blocks in order, resolving images through `images`.
    pub fn render(mut self, blocks: &[Block], images: &ImagePathMap) -> RenderResult {
        let mut output = String::new();
        for block in blocks {
            self.render_block(&mut output, block, images);
        }

        if self.options.collect_stats {
            self.stats.count_text(&output);
        }

        RenderResult::new(output, self.unresolved, self.stats)
    }

    fn render_block(&mut self, output: &mut String, block: &Block, images: &ImagePathMap) {
        match block {
            Block::Heading { level, text } => self.render_heading(output, *level, text),
            Block::Paragraph { text } => self.render_paragraph(output, text),
            Block::Image {
                resource_id,
                description,
            } => self.render_image(output, resource_id, description.as_deref(), images),
        }
    }

    fn render_heading(&mut self, output: &mut String, level: HeadingLevel, text: &str) {
        if self.options.collect_stats {
            self.stats.add_heading();
        }
        let level = level.capped(self.options.max_heading_level);
        output.push_str(&"#".repeat(level.get() as usize));
        output.push(' ');
        output.push_str(text);
        output.push_str("\n\n");
    }

    fn render_paragraph(&mut self, output: &mut String, text: &str) {
        if self.options.collect_stats {
            self.stats.add_paragraph(text.is_empty());
        }
        if text.is_empty() {
            output.push('\n');
            return;
        }
        output.push_str(text);
        output.push_str("\n\n");
    }

    fn render_image(
        &mut self,
        output: &mut String,
        resource_id: &str,
        description: Option<&str>,
        images: &ImagePathMap,
    ) {
        let Some(path) = images.get(resource_id) else {
            log::warn!("no image file for reference {}, leaving a blank line", resource_id);
            self.unresolved.push(resource_id.to_string());
            output.push('\n');
            return;
        };

        if self.options.collect_stats {
            self.stats.add_image();
        }
        let alt = description
            .filter(|_| self.options.image_descriptions)
            .unwrap_or(&self.options.image_alt_text);
        output.push_str("![");
        output.push_str(alt);
        output.push_str("](");
        output.push_str(&link_destination(path));
        output.push_str(")\n\n");
    }
}

/// Wrap a link destination in angle brackets when it would otherwise end
/// the link early (spaces or parentheses in a document name).
fn link_destination(path: &str) -> String {
    if path.chars().any(|c| c.is_whitespace() || c == '(' || c == ')') {
        format!("<{}>", path)
    } else {
        path.to_string()
    }
}
