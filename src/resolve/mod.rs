//! Image resolution: persist embedded images and map resource ids to
//! the relative paths the Markdown should link to.
//!
//! # Example
//!
//! ```no_run
//! use docdown::resolve::ImageResolver;
//! use docdown::DocxParser;
//!
//! fn main() -> docdown::Result<()> {
//!     let parsed = DocxParser::open("report.docx")?.parse()?;
//!     let resolved = ImageResolver::new("out/images", "report").resolve(parsed.resources)?;
//!     for (id, path) in resolved.map.iter() {
//!         println!("{} -> {}", id, path);
//!     }
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ImagePathMap, ImageResource};

/// Name of the per-document images folder.
pub const IMAGES_DIR_NAME: &str = "images";

/// An image that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFailure {
    /// Resource id of the image
    pub resource_id: String,
    /// File the image was meant to be written to
    pub path: PathBuf,
    /// Why the write failed
    pub reason: String,
}

/// Outcome of resolving a document's images.
#[derive(Debug, Clone, Default)]
pub struct ResolvedImages {
    /// Resource id to link path, for every image that was written
    pub map: ImagePathMap,
    /// Files written, in resource order
    pub written: Vec<PathBuf>,
    /// Images skipped because their file could not be written
    pub failures: Vec<ImageFailure>,
}

impl ResolvedImages {
    /// Number of images written.
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    /// Number of non-fatal image failures.
    pub fn warning_count(&self) -> usize {
        self.failures.len()
    }

    /// Whether the image with `resource_id` failed to write.
    pub fn is_failed(&self, resource_id: &str) -> bool {
        self.failures.iter().any(|f| f.resource_id == resource_id)
    }
}

/// Writes image resources for one document.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    images_dir: PathBuf,
    base_name: String,
    link_prefix: String,
}

impl ImageResolver {
    /// Create a resolver writing into `images_dir` with names derived from
    /// `base_name` (the document's file stem).
    pub fn new(images_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            images_dir: images_dir.into(),
            base_name: base_name.into(),
            link_prefix: format!("{}/", IMAGES_DIR_NAME),
        }
    }

    /// Set the prefix placed before file names in link paths.
    pub fn with_link_prefix(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into().replace('\\', "/");
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.link_prefix = prefix;
        self
    }

    /// Directory images are written to.
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Output file name of the `n`-th (1-based) resource.
    pub fn file_name(&self, n: usize, resource: &ImageResource) -> String {
        format!("{}_image_{}.{}", self.base_name, n, resource.extension())
    }

    /// Write every resource and build the path map.
    ///
    /// The images directory is created only when there is at least one
    /// resource; failing to create it is an error. A resource whose file
    /// cannot be written is logged and recorded in `failures`, and the
    /// remaining resources are still written. Sequence numbers follow
    /// resource order, including failed ones.
    pub fn resolve(&self, resources: Vec<ImageResource>) -> Result<ResolvedImages> {
        let mut resolved = ResolvedImages::default();
        if resources.is_empty() {
            return Ok(resolved);
        }

        fs::create_dir_all(&self.images_dir)
            .map_err(|e| Error::write(self.images_dir.clone(), e))?;

        for (index, resource) in resources.into_iter().enumerate() {
            let file_name = self.file_name(index + 1, &resource);
            let path = self.images_dir.join(&file_name);

            match fs::write(&path, &resource.data) {
                Ok(()) => {
                    log::debug!("saved image {} as {}", resource.id, path.display());
                    resolved
                        .map
                        .insert(resource.id, format!("{}{}", self.link_prefix, file_name));
                    resolved.written.push(path);
                }
                Err(e) => {
                    log::error!(
                        "failed to write image {} to {}: {}",
                        resource.id,
                        path.display(),
                        e
                    );
                    resolved.failures.push(ImageFailure {
                        resource_id: resource.id,
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if resolved.written_count() > 0 {
            log::info!(
                "extracted {} images from {}",
                resolved.written_count(),
                self.base_name
            );
        }

        Ok(resolved)
    }
}

/// Write `resources` under `images_dir` and return the path map.
pub fn resolve(
    resources: Vec<ImageResource>,
    images_dir: impl Into<PathBuf>,
    base_name: impl Into<String>,
) -> Result<ResolvedImages> {
    ImageResolver::new(images_dir, base_name).resolve(resources)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn png(id: &str) -> ImageResource {
        ImageResource::new(id, format!("word/media/{}.png", id), PNG.to_vec())
            .with_content_type("image/png")
    }

    #[test]
    fn test_no_resources_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join(IMAGES_DIR_NAME);

        let resolved = resolve(Vec::new(), &images, "doc").unwrap();
        assert!(resolved.map.is_empty());
        assert!(!images.exists());
    }

    #[test]
    fn test_names_and_map() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join(IMAGES_DIR_NAME);
        let jpeg = ImageResource::new("rId9", "word/media/photo.jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]);

        let resolved = resolve(vec![png("rId4"), jpeg], &images, "doc").unwrap();

        assert_eq!(resolved.map.get("rId4"), Some("images/doc_image_1.png"));
        assert_eq!(resolved.map.get("rId9"), Some("images/doc_image_2.jpg"));
        assert_eq!(fs::read(images.join("doc_image_1.png")).unwrap(), PNG);
        assert_eq!(resolved.written_count(), 2);
        assert_eq!(resolved.warning_count(), 0);
    }

    #[test]
    fn test_identical_content_gets_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join(IMAGES_DIR_NAME);

        let resolved = resolve(vec![png("rId1"), png("rId2"), png("rId3")], &images, "a").unwrap();

        let mut paths: Vec<_> = resolved.map.iter().map(|(_, p)| p.to_string()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_custom_link_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ImageResolver::new(dir.path().join("img"), "doc").with_link_prefix("./img");

        let resolved = resolver.resolve(vec![png("rId1")]).unwrap();
        assert_eq!(resolved.map.get("rId1"), Some("./img/doc_image_1.png"));
    }

    #[test]
    fn test_unwritable_images_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("images");
        fs::write(&blocker, b"a file where the directory should be").unwrap();

        let result = resolve(vec![png("rId1")], &blocker, "doc");
        assert!(matches!(result, Err(Error::Write { .. })));
    }

    #[test]
    fn test_single_failed_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join(IMAGES_DIR_NAME);
        // A directory occupying the first image's file name makes that write fail.
        fs::create_dir_all(images.join("doc_image_1.png")).unwrap();

        let resolved = resolve(vec![png("rId1"), png("rId2")], &images, "doc").unwrap();

        assert_eq!(resolved.warning_count(), 1);
        assert_eq!(resolved.failures[0].resource_id, "rId1");
        assert!(!resolved.map.contains("rId1"));
        assert_eq!(resolved.map.get("rId2"), Some("images/doc_image_2.png"));
    }
}
