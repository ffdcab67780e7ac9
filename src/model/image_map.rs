//! Mapping from image resource ids to output-relative paths.

use serde::{Deserialize, Serialize};

/// Insertion-ordered map from resource id to the relative path the image
/// was written to (e.g. `images/doc_image_1.png`).
///
/// Built once per document by the image resolver and consumed by the
/// renderer. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePathMap {
    entries: Vec<(String, String)>,
}

impl ImagePathMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the path for `resource_id`.
    pub fn insert(&mut self, resource_id: impl Into<String>, path: impl Into<String>) {
        let resource_id = resource_id.into();
        let path = path.into();
        match self.entries.iter_mut().find(|(id, _)| *id == resource_id) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((resource_id, path)),
        }
    }

    /// Path for `resource_id`.
    pub fn get(&self, resource_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == resource_id)
            .map(|(_, path)| path.as_str())
    }

    /// Check if `resource_id` has a path.
    pub fn contains(&self, resource_id: &str) -> bool {
        self.get(resource_id).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(resource_id, path)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, path)| (id.as_str(), path.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ImagePathMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ImagePathMap::new();
        for (id, path) in iter {
            map.insert(id, path);
        }
        map
    }
}
