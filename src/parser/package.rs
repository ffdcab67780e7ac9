//! Access to the Open Packaging Conventions container of a .docx file.
//!
//! A package is a zip archive holding XML parts, a content-type manifest
//! (`[Content_Types].xml`) and relationship parts (`_rels/*.rels`) that
//! link parts to one another.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::detect::ensure_supported;
use crate::error::{Error, Result};

use super::xml::{attr, strip_bom};

/// Part name of the content-type manifest.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
/// Conventional location of the main document part.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";
/// Package-level relationships part.
const PACKAGE_RELS_PART: &str = "_rels/.rels";

/// Upper bound on the buffer reserved up front for one part.
const MAX_PREALLOC: u64 = 1 << 20;

const OFFICE_DOCUMENT_REL: &str = "/officeDocument";
const IMAGE_REL: &str = "/image";

/// Content types a wordprocessing main part may declare.
const WORDPROCESSING_MAIN_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml",
    "application/vnd.ms-word.document.macroEnabled.main+xml",
    "application/vnd.ms-word.template.macroEnabledTemplate.main+xml",
];

/// An opened document package.
pub struct Package {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    content_types: ContentTypes,
}

impl Package {
    /// Open a package from its raw bytes.
    ///
    /// Fails with `UnsupportedFormat` when the bytes are not a zip archive
    /// and with `CorruptDocument` when the content-type manifest is missing.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        ensure_supported(&data)?;

        let archive = ZipArchive::new(Cursor::new(data)).map_err(|e| match e {
            ZipError::Io(io) => {
                Error::UnsupportedFormat(format!("not a readable zip package: {}", io))
            }
            other => Error::from(other),
        })?;

        let mut package = Self {
            archive,
            content_types: ContentTypes::default(),
        };

        let manifest = package.read_part(CONTENT_TYPES_PART)?.ok_or_else(|| {
            Error::CorruptDocument(format!("missing content manifest {}", CONTENT_TYPES_PART))
        })?;
        package.content_types = ContentTypes::parse(&manifest)?;

        Ok(package)
    }

    /// Check if a part exists.
    pub fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read a part's bytes, or `None` if the part does not exist.
    pub fn read_part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(Error::CorruptDocument(format!(
                    "cannot read part {}: {}",
                    name, e
                )))
            }
        };

        let mut data = Vec::with_capacity(prealloc_len(file.size()));
        file.read_to_end(&mut data).map_err(|e| {
            Error::CorruptDocument(format!("cannot decompress part {}: {}", name, e))
        })?;
        Ok(Some(data))
    }

    /// The content-type manifest.
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Relationships whose source is `source_part`.
    ///
    /// A missing relationships part yields an empty set.
    pub fn relationships(&mut self, source_part: &str) -> Result<Relationships> {
        let rels_part = rels_part_for(source_part);
        match self.read_part(&rels_part)? {
            Some(data) => Relationships::parse(&data, part_dir(source_part)),
            None => Ok(Relationships::default()),
        }
    }

    /// Locate the main document part and check it is a wordprocessing part.
    ///
    /// The package relationships are consulted first; packages without
    /// them fall back to `word/document.xml`.
    pub fn main_document_part(&mut self) -> Result<String> {
        let package_rels = self.relationships("")?;
        let part = package_rels
            .iter()
            .find(|rel| !rel.external && rel.rel_type.ends_with(OFFICE_DOCUMENT_REL))
            .map(|rel| rel.target.clone())
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());

        if !self.has_part(&part) {
            return Err(Error::CorruptDocument(format!(
                "missing main document part {}",
                part
            )));
        }

        // Only an explicit override names the kind of package; a bare
        // `xml` default says nothing about it.
        if let Some(content_type) = self.content_types.override_of(&part) {
            if !WORDPROCESSING_MAIN_TYPES.contains(&content_type) {
                return Err(Error::UnsupportedFormat(format!(
                    "package main part {} is {}, not a word-processing document",
                    part, content_type
                )));
            }
        }

        Ok(part)
    }
}

/// Parsed `[Content_Types].xml`.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Default content type by lowercase extension
    defaults: HashMap<String, String>,
    /// Override content type by lowercase part name (no leading slash)
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Parse the manifest XML.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut types = ContentTypes::default();
        let mut reader = Reader::from_reader(strip_bom(data));
        reader.trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"Default" => {
                        if let (Some(ext), Some(ct)) =
                            (attr(&e, b"Extension"), attr(&e, b"ContentType"))
                        {
                            types.defaults.insert(ext.to_ascii_lowercase(), ct);
                        }
                    }
                    b"Override" => {
                        if let (Some(part), Some(ct)) =
                            (attr(&e, b"PartName"), attr(&e, b"ContentType"))
                        {
                            types
                                .overrides
                                .insert(normalize_part_name(&part).to_ascii_lowercase(), ct);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Content type explicitly declared for a part.
    pub fn override_of(&self, part_name: &str) -> Option<&str> {
        let key = normalize_part_name(part_name).to_ascii_lowercase();
        self.overrides.get(&key).map(String::as_str)
    }

    /// Content type of a part: override first, then default by extension.
    pub fn content_type_of(&self, part_name: &str) -> Option<&str> {
        let key = normalize_part_name(part_name).to_ascii_lowercase();
        if let Some(ct) = self.overrides.get(&key) {
            return Some(ct);
        }
        let ext = key.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults.get(ext).map(String::as_str)
    }
}

/// A single relationship from a source part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id (e.g. "rId7")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target part name resolved against the source part (or the raw URI
    /// for external targets)
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

impl Relationship {
    /// Check if this relationship points at an image part.
    pub fn is_image(&self) -> bool {
        self.rel_type.ends_with(IMAGE_REL)
    }
}

/// Relationships of one source part, in file order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    /// Parse a relationships part; targets are resolved against `base_dir`.
    pub fn parse(data: &[u8], base_dir: &str) -> Result<Self> {
        let mut items = Vec::new();
        let mut reader = Reader::from_reader(strip_bom(data));
        reader.trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                    match parse_relationship(&e, base_dir) {
                        Some(rel) => items.push(rel),
                        None => log::debug!("skipping incomplete relationship entry"),
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { items })
    }

    /// Look up a relationship by id.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|rel| rel.id == id)
    }

    /// Iterate relationships in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// Internal image relationships, in file order.
    pub fn images(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter().filter(|rel| rel.is_image() && !rel.external)
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn parse_relationship(e: &BytesStart<'_>, base_dir: &str) -> Option<Relationship> {
    let id = attr(e, b"Id")?;
    let rel_type = attr(e, b"Type")?;
    let target = attr(e, b"Target")?;
    let external = attr(e, b"TargetMode")
        .map(|mode| mode.eq_ignore_ascii_case("External"))
        .unwrap_or(false);
    let target = if external {
        target
    } else {
        resolve_target(base_dir, &target)
    };
    Some(Relationship {
        id,
        rel_type,
        target,
        external,
    })
}

/// Part name without a leading slash.
fn normalize_part_name(name: &str) -> &str {
    name.trim_start_matches('/')
}

/// Directory of a part ("word/document.xml" -> "word").
fn part_dir(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Relationships part for a source part ("" is the package itself).
fn rels_part_for(source_part: &str) -> String {
    if source_part.is_empty() {
        return PACKAGE_RELS_PART.to_string();
    }
    let dir = part_dir(source_part);
    let file = source_part.rsplit('/').next().unwrap_or(source_part);
    if dir.is_empty() {
        format!("_rels/{}.rels", file)
    } else {
        format!("{}/_rels/{}.rels", dir, file)
    }
}

/// Resolve a relationship target against the source part's directory.
fn resolve_target(base_dir: &str, target: &str) -> String {
    let (mut segments, relative) = match target.strip_prefix('/') {
        Some(absolute) => (Vec::new(), absolute),
        None => (
            base_dir
                .split('/')
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>(),
            target,
        ),
    };

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Buffer to reserve for a part whose archive entry declares `declared`
/// bytes. The declared size is not trusted beyond `MAX_PREALLOC`.
fn prealloc_len(declared: u64) -> usize {
    declared.min(MAX_PREALLOC) as usize
}
