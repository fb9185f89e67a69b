//! Image build context discovery.

use crate::discovery::DiscoveryError;
use crate::naming::{normalize, ImageName};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// A container build context discovered in a working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image tag name, e.g. `knative-eventing-broker`.
    pub name: String,

    /// Identifier referencing the image in test step dependencies.
    pub dependency_id: String,

    /// Build context directory relative to the repository root.
    pub path: String,
}

impl Image {
    fn new(image_name: ImageName, path: String) -> Self {
        Self {
            name: image_name.name,
            dependency_id: image_name.dependency_id,
            path,
        }
    }

    /// Dockerfile path relative to the repository root.
    #[must_use]
    pub fn dockerfile_path(&self) -> String {
        format!("{}/Dockerfile", self.path)
    }
}

/// Discovers every build context nested under `tree/root`.
///
/// Each directory below `root` (at any depth) becomes an image named after
/// its basename. The result is sorted by name. A missing or empty root
/// yields no images.
///
/// # Errors
///
/// Returns [`DiscoveryError::WalkError`] if the directory tree cannot be read.
pub fn discover_images(
    tree: &Path,
    root: &str,
    prefix: &str,
    context: &str,
) -> Result<Vec<Image>, DiscoveryError> {
    let root_path = tree.join(root);
    if !root_path.is_dir() {
        debug!(root = %root_path.display(), "Image root not found");
        return Ok(Vec::new());
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(&root_path).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| DiscoveryError::WalkError {
            root: root_path.clone(),
            source: e,
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }

        let basename = entry.file_name().to_string_lossy();
        let relative = entry
            .path()
            .strip_prefix(tree)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        images.push(Image::new(normalize(prefix, context, &basename), relative));
    }

    images.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    debug!(root, count = images.len(), "Discovered images");
    Ok(images)
}

/// Fails if two images share a normalized name.
///
/// # Errors
///
/// Returns [`DiscoveryError::ImageCollision`] naming both build contexts.
pub fn ensure_unique_names<'a>(
    images: impl IntoIterator<Item = &'a Image>,
) -> Result<(), DiscoveryError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for image in images {
        if let Some(first) = seen.insert(&image.name, &image.path) {
            return Err(DiscoveryError::ImageCollision {
                name: image.name.clone(),
                first: first.to_string(),
                second: image.path.clone(),
            });
        }
    }
    Ok(())
}
