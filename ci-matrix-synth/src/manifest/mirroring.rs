//! Image mirroring mappings.

use crate::config::Settings;
use crate::discovery::Image;
use std::fmt;

/// Maps a promoted image to its mirrored destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEntry {
    /// Fully qualified promoted image reference.
    pub source: String,

    /// Fully qualified mirror reference.
    pub destination: String,
}

impl fmt::Display for MirrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.source, self.destination)
    }
}

/// Mirroring lines for one (promotion alias, repository) pair.
///
/// Entries keep insertion order; re-adding an existing entry is a no-op, so
/// both versions of a branch contribute each image once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroringMapping {
    promotion_alias: String,
    repo: String,
    entries: Vec<MirrorEntry>,
}

impl MirroringMapping {
    /// Creates an empty mapping.
    pub fn new(promotion_alias: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            promotion_alias: promotion_alias.into(),
            repo: repo.into(),
            entries: Vec::new(),
        }
    }

    /// Adds one entry per image, runtime images first.
    pub fn extend(&mut self, images: &[Image], settings: &Settings) {
        for image in images {
            let entry = mirror_entry(image, &self.promotion_alias, settings);
            if !self.entries.contains(&entry) {
                self.entries.push(entry);
            }
        }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[MirrorEntry] {
        &self.entries
    }

    /// File name of the mapping, e.g. `mapping_knative-v1.5_knative-eventing_quay`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("mapping_{}_{}_quay", self.promotion_alias, self.repo)
    }

    /// File contents, one newline-terminated line per entry.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{entry}\n"))
            .collect()
    }
}

/// Builds the mirroring entry of an image promoted under `promotion_alias`.
#[must_use]
pub fn mirror_entry(image: &Image, promotion_alias: &str, settings: &Settings) -> MirrorEntry {
    MirrorEntry {
        source: format!(
            "{}/{}/{}:{}",
            settings.registry, settings.registry_namespace, promotion_alias, image.name
        ),
        destination: format!(
            "{}/{}:{}",
            settings.mirror_registry, image.name, promotion_alias
        ),
    }
}
