//! Document model types for word-processor content representation.
//!
//! This module defines the intermediate representation (IR) that bridges
//! package extraction and Markdown rendering: an ordered list of blocks,
//! the image resources they reference, and the mapping from resource ids
//! to the files those resources were written to.

mod block;
mod document;
mod image_map;
mod resource;

pub use block::{Block, HeadingLevel};
pub use document::Document;
pub use image_map::ImagePathMap;
pub use resource::ImageResource;
