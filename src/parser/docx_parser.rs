//! Word document extractor over quick-xml events.

use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{Block, Document, ImageResource};

use super::options::{ErrorMode, ParseOptions};
use super::package::{Package, Relationships};
use super::styles::{HeadingStyles, StyleTable, STYLES_PART};
use super::xml::{attr, prefixed_attr, strip_bom};

const STYLES_REL: &str = "/styles";

/// Result of extracting a document package.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Blocks in source order
    pub document: Document,

    /// Every internal image in the package, in relationship order,
    /// whether or not a block references it
    pub resources: Vec<ImageResource>,
}

impl ParsedDocument {
    /// Split into the document and its resources.
    pub fn into_parts(self) -> (Document, Vec<ImageResource>) {
        (self.document, self.resources)
    }
}

/// Word (.docx) document parser.
pub struct DocxParser {
    package: Package,
    options: ParseOptions,
}

impl DocxParser {
    /// Open a .docx file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a .docx file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_vec_with_options(data, options)
    }

    /// Parse a .docx from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a .docx from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        Self::from_vec_with_options(data.to_vec(), options)
    }

    /// Parse a .docx from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a .docx from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_vec_with_options(data, options)
    }

    fn from_vec_with_options(data: Vec<u8>, options: ParseOptions) -> Result<Self> {
        let package = Package::from_bytes(data)?;
        Ok(Self { package, options })
    }

    /// Extract blocks and image resources.
    pub fn parse(mut self) -> Result<ParsedDocument> {
        let main_part = self.package.main_document_part()?;
        log::debug!("main document part: {}", main_part);

        let relationships = match self.package.relationships(&main_part) {
            Ok(rels) => rels,
            Err(e) => self.recover("relationships", e)?,
        };

        let styles = match self.load_styles(&relationships) {
            Ok(styles) => styles,
            Err(e) => self.recover("styles", e)?,
        };

        let xml = self.package.read_part(&main_part)?.ok_or_else(|| {
            Error::CorruptDocument(format!("missing main document part {}", main_part))
        })?;

        let blocks = BodyWalker::new(&styles, &self.options.heading_styles)
            .walk(&xml)
            .map_err(|e| match e {
                Error::CorruptDocument(msg) => {
                    Error::CorruptDocument(format!("{}: {}", main_part, msg))
                }
                other => other,
            })?;

        let resources = if self.options.extract_images {
            self.collect_images(&relationships)
        } else {
            Vec::new()
        };

        log::debug!(
            "extracted {} blocks and {} image resources",
            blocks.len(),
            resources.len()
        );

        Ok(ParsedDocument {
            document: Document::from_blocks(blocks),
            resources,
        })
    }

    /// In lenient mode, replace a failed optional part with its default.
    fn recover<T: Default>(&self, what: &str, err: Error) -> Result<T> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(err),
            ErrorMode::Lenient => {
                log::warn!("ignoring unreadable {}: {}", what, err);
                Ok(T::default())
            }
        }
    }

    fn load_styles(&mut self, relationships: &Relationships) -> Result<StyleTable> {
        let part = relationships
            .iter()
            .find(|rel| !rel.external && rel.rel_type.ends_with(STYLES_REL))
            .map(|rel| rel.target.clone())
            .unwrap_or_else(|| STYLES_PART.to_string());

        match self.package.read_part(&part)? {
            Some(data) => StyleTable::parse(&data),
            None => {
                log::debug!("no style definitions in package");
                Ok(StyleTable::new())
            }
        }
    }

    fn collect_images(&mut self, relationships: &Relationships) -> Vec<ImageResource> {
        let mut resources = Vec::new();

        for rel in relationships.images() {
            match self.package.read_part(&rel.target) {
                Ok(Some(data)) if !data.is_empty() => {
                    let mut resource = ImageResource::new(&rel.id, &rel.target, data);
                    if let Some(ct) = self.package.content_types().content_type_of(&rel.target) {
                        resource = resource.with_content_type(ct);
                    }
                    resources.push(resource);
                }
                Ok(Some(_)) => {
                    log::warn!("image {} ({}) is empty, skipping", rel.id, rel.target);
                }
                Ok(None) => {
                    log::warn!(
                        "image {} points at missing part {}, skipping",
                        rel.id,
                        rel.target
                    );
                }
                Err(e) => {
                    log::warn!("cannot read image {} ({}): {}", rel.id, rel.target, e);
                }
            }
        }

        resources
    }
}

/// A paragraph being accumulated while its element is open.
#[derive(Debug, Default)]
struct ParagraphBuilder {
    style_id: Option<String>,
    text: String,
    /// Image references with the description of their drawing
    images: Vec<(String, Option<String>)>,
    /// `wp:docPr/@descr` of the drawing currently open
    drawing_description: Option<String>,
    /// Blocks of paragraphs nested in this one (text boxes)
    nested: Vec<Block>,
    run_depth: usize,
    in_text: bool,
}

/// Walks the body of the main document part and emits blocks.
///
/// Paragraphs may nest (text boxes hold their own paragraphs), so open
/// paragraphs are kept on a stack. A nested paragraph's blocks are held
/// until its anchoring paragraph closes and follow that paragraph's own
/// blocks. `mc:Fallback` subtrees repeat their `mc:Choice` sibling and are
/// skipped.
struct BodyWalker<'a> {
    styles: &'a StyleTable,
    headings: &'a HeadingStyles,
    blocks: Vec<Block>,
    open: Vec<ParagraphBuilder>,
    skip_depth: usize,
}

impl<'a> BodyWalker<'a> {
    fn new(styles: &'a StyleTable, headings: &'a HeadingStyles) -> Self {
        Self {
            styles,
            headings,
            blocks: Vec::new(),
            open: Vec::new(),
            skip_depth: 0,
        }
    }

    fn walk(mut self, xml: &[u8]) -> Result<Vec<Block>> {
        let mut reader = Reader::from_reader(strip_bom(xml));
        // Whitespace inside w:t is content (xml:space="preserve").
        reader.trim_text(false);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => self.handle_start(&e),
                Event::Empty(e) => self.handle_empty(&e),
                Event::Text(e) => {
                    if self.skip_depth == 0 {
                        if let Some(p) = self.open.last_mut().filter(|p| p.in_text) {
                            let text = e.unescape()?;
                            p.text.push_str(&text);
                        }
                    }
                }
                Event::CData(e) => {
                    if self.skip_depth == 0 {
                        if let Some(p) = self.open.last_mut().filter(|p| p.in_text) {
                            p.text.push_str(&String::from_utf8_lossy(&e));
                        }
                    }
                }
                Event::End(e) => self.handle_end(e.local_name().as_ref()),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        // Only reachable with unclosed paragraphs at end of input.
        while let Some(p) = self.open.pop() {
            self.finish(p);
        }

        Ok(self.blocks)
    }

    fn handle_start(&mut self, e: &BytesStart<'_>) {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return;
        }

        match e.local_name().as_ref() {
            b"Fallback" => self.skip_depth = 1,
            b"p" => self.open.push(ParagraphBuilder::default()),
            b"r" => {
                if let Some(p) = self.open.last_mut() {
                    p.run_depth += 1;
                }
            }
            b"t" => {
                if let Some(p) = self.open.last_mut().filter(|p| p.run_depth > 0) {
                    p.in_text = true;
                }
            }
            _ => self.handle_leaf(e),
        }
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>) {
        if self.skip_depth > 0 {
            return;
        }

        match e.local_name().as_ref() {
            b"p" => {
                let p = ParagraphBuilder::default();
                self.finish(p);
            }
            _ => self.handle_leaf(e),
        }
    }

    /// Elements whose meaning does not depend on having children.
    fn handle_leaf(&mut self, e: &BytesStart<'_>) {
        let Some(p) = self.open.last_mut() else {
            return;
        };

        match e.local_name().as_ref() {
            b"pStyle" => {
                if let Some(id) = attr(e, b"val") {
                    p.style_id = Some(id);
                }
            }
            b"tab" if p.run_depth > 0 => p.text.push('\t'),
            b"br" | b"cr" if p.run_depth > 0 => {
                let kind = attr(e, b"type");
                // Page and column breaks are layout, not text.
                if !matches!(kind.as_deref(), Some("page") | Some("column")) {
                    p.text.push('\n');
                }
            }
            b"noBreakHyphen" if p.run_depth > 0 => p.text.push('-'),
            b"docPr" => p.drawing_description = attr(e, b"descr"),
            b"blip" => {
                if let Some(id) = prefixed_attr(e, b"embed") {
                    p.images.push((id, p.drawing_description.clone()));
                }
            }
            b"imagedata" => {
                if let Some(id) = prefixed_attr(e, b"id") {
                    p.images.push((id, None));
                }
            }
            _ => {}
        }
    }

    fn handle_end(&mut self, local_name: &[u8]) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }

        match local_name {
            b"p" => {
                if let Some(p) = self.open.pop() {
                    self.finish(p);
                }
            }
            b"r" => {
                if let Some(p) = self.open.last_mut() {
                    p.run_depth = p.run_depth.saturating_sub(1);
                }
            }
            b"t" => {
                if let Some(p) = self.open.last_mut() {
                    p.in_text = false;
                }
            }
            b"inline" | b"anchor" => {
                if let Some(p) = self.open.last_mut() {
                    p.drawing_description = None;
                }
            }
            _ => {}
        }
    }

    /// Emit the blocks for a closed paragraph.
    ///
    /// Text comes first, then one image block per reference in encounter
    /// order, then the blocks of any nested paragraphs. A paragraph holding
    /// only images emits only the images.
    fn finish(&mut self, p: ParagraphBuilder) {
        let mut blocks = Vec::with_capacity(1 + p.images.len() + p.nested.len());
        let has_text = !p.text.trim().is_empty();

        if has_text {
            let level = p.style_id.as_deref().and_then(|id| {
                self.headings
                    .level_for(self.styles.resolve(id))
                    .or_else(|| self.headings.level_for(id))
            });
            blocks.push(match level {
                // A heading is one Markdown line.
                Some(level) => Block::Heading {
                    level,
                    text: p.text.replace('\n', " "),
                },
                None => Block::Paragraph { text: p.text },
            });
        } else if p.images.is_empty() && p.nested.is_empty() {
            blocks.push(Block::paragraph(""));
        }

        blocks.extend(p.images.into_iter().map(|(resource_id, description)| {
            match description {
                Some(description) => Block::described_image(resource_id, &description),
                None => Block::image(resource_id),
            }
        }));
        blocks.extend(p.nested);

        match self.open.last_mut() {
            Some(parent) => parent.nested.extend(blocks),
            None => self.blocks.extend(blocks),
        }
    }
}
