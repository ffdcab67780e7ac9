//! In-memory .docx fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const IMAGE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading4"><w:name w:val="heading 4"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading5"><w:name w:val="heading 5"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading6"><w:name w:val="heading 6"/></w:style>
  <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
  <w:style w:type="paragraph" w:styleId="Subtitle"><w:name w:val="Subtitle"/></w:style>
</w:styles>"#;

/// Builds a minimal but well-formed Word package.
#[derive(Debug, Default, Clone)]
pub struct DocxBuilder {
    body: String,
    relationships: Vec<(String, String, String)>,
    media: Vec<(String, Vec<u8>)>,
    without_styles: bool,
    without_content_types: bool,
    main_target: Option<String>,
    main_content_type: Option<String>,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(mut self, style_id: &str, text: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            style_id,
            escape(text)
        ));
        self
    }

    pub fn heading(self, level: u8, text: &str) -> Self {
        self.styled(&format!("Heading{}", level), text)
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            escape(text)
        ));
        self
    }

    pub fn empty_paragraph(mut self) -> Self {
        self.body.push_str("<w:p/>");
        self
    }

    /// Paragraph holding only a drawing that references `rid`.
    pub fn image_ref(mut self, rid: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:drawing><wp:inline><wp:docPr id="1" name="Picture"/><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
            rid
        ));
        self
    }

    /// Paragraph holding a drawing with a `descr` (alt text) on its `wp:docPr`.
    pub fn described_image_ref(mut self, rid: &str, descr: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:drawing><wp:inline><wp:docPr id="2" name="Picture" descr="{}"/><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
            escape(descr).replace('"', "&quot;").replace('\n', "&#10;"),
            rid
        ));
        self
    }

    /// Add an image part and its relationship without referencing it.
    pub fn image_part(mut self, rid: &str, file_name: &str, data: &[u8]) -> Self {
        self.relationships.push((
            rid.to_string(),
            IMAGE_REL.to_string(),
            format!("media/{}", file_name),
        ));
        self.media
            .push((format!("word/media/{}", file_name), data.to_vec()));
        self
    }

    /// Add an image part and a paragraph showing it.
    pub fn image(self, rid: &str, file_name: &str, data: &[u8]) -> Self {
        self.image_part(rid, file_name, data).image_ref(rid)
    }

    pub fn raw_body(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    pub fn without_styles(mut self) -> Self {
        self.without_styles = true;
        self
    }

    pub fn without_content_types(mut self) -> Self {
        self.without_content_types = true;
        self
    }

    /// Point the package's officeDocument relationship at `target`.
    /// The document XML is still stored as `word/document.xml`.
    pub fn main_part_target(mut self, target: &str) -> Self {
        self.main_target = Some(target.to_string());
        self
    }

    /// Declare `content_type` as the override for `word/document.xml`.
    pub fn main_content_type(mut self, content_type: &str) -> Self {
        self.main_content_type = Some(content_type.to_string());
        self
    }

    fn content_types_xml(&self) -> String {
        let main_type = self.main_content_type.as_deref().unwrap_or(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        );
        CONTENT_TYPES_XML.replace("{main}", main_type)
    }

    fn package_rels(&self) -> String {
        let target = self.main_target.as_deref().unwrap_or("word/document.xml");
        PACKAGE_RELS_XML.replace("{target}", target)
    }

    fn document_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            W_NS, R_NS, self.body
        )
    }

    fn document_rels(&self) -> String {
        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        if !self.without_styles {
            rels.push_str(&format!(
                r#"<Relationship Id="rIdStyles" Type="{}" Target="styles.xml"/>"#,
                STYLES_REL
            ));
        }
        for (id, rel_type, target) in &self.relationships {
            rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id, rel_type, target
            ));
        }
        rels.push_str("</Relationships>");
        rels
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut put = |name: &str, data: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        };

        if !self.without_content_types {
            put("[Content_Types].xml", self.content_types_xml().as_bytes());
        }
        put("_rels/.rels", self.package_rels().as_bytes());
        put("word/document.xml", self.document_xml().as_bytes());
        put("word/_rels/document.xml.rels", self.document_rels().as_bytes());
        if !self.without_styles {
            put("word/styles.xml", STYLES_XML.as_bytes());
        }
        for (name, data) in &self.media {
            put(name, data);
        }

        zip.finish().unwrap().into_inner()
    }

    pub fn write_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, self.build()).unwrap();
    }
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Default Extension="jpeg" ContentType="image/jpeg"/>
  <Override PartName="/word/document.xml" ContentType="{main}"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="{target}"/>
</Relationships>"#;
