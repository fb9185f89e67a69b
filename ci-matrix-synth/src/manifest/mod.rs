//! Manifest rendering and placement.
//!
//! This module turns a matrix cell plus its discovered targets and images
//! into a ci-operator configuration file, and collects the image mirroring
//! mappings of each promoted branch.

mod error;
mod mirroring;
pub mod model;
mod render;

pub use error::ManifestError;
pub use mirroring::{mirror_entry, MirrorEntry, MirroringMapping};
pub use render::{ManifestRenderer, GENERATED_HEADER};

use crate::matrix::MatrixCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory layout of the CI orchestration repository.
#[derive(Debug, Clone)]
pub struct ReleaseLayout {
    root: PathBuf,
}

impl ReleaseLayout {
    /// Creates a layout rooted at a checkout of the orchestration repository.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the orchestration repository checkout.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the ci-operator configurations of a repository.
    #[must_use]
    pub fn config_dir(&self, org: &str, repo: &str) -> PathBuf {
        self.root.join("ci-operator/config").join(org).join(repo)
    }

    /// Directory holding the generated Prow jobs of a repository.
    #[must_use]
    pub fn jobs_dir(&self, org: &str, repo: &str) -> PathBuf {
        self.root.join("ci-operator/jobs").join(org).join(repo)
    }

    /// Directory holding image mirroring mappings.
    #[must_use]
    pub fn mirroring_dir(&self) -> PathBuf {
        self.root.join("core-services/image-mirroring/knative")
    }

    /// Path of the manifest generated for `cell`.
    #[must_use]
    pub fn manifest_path(&self, cell: &MatrixCell) -> PathBuf {
        self.config_dir(&cell.org, &cell.repo)
            .join(manifest_file_name(cell))
    }

    /// Path of a mirroring mapping file.
    #[must_use]
    pub fn mapping_path(&self, mapping: &MirroringMapping) -> PathBuf {
        self.mirroring_dir().join(mapping.file_name())
    }
}

/// File name of the manifest for `cell`, e.g.
/// `openshift-knative-eventing-release-v1.5__411.yaml`.
#[must_use]
pub fn manifest_file_name(cell: &MatrixCell) -> String {
    format!(
        "{}-{}-{}__{}.yaml",
        cell.org,
        cell.repo,
        cell.branch,
        cell.variant()
    )
}

/// Writes `contents` to `path`, replacing any existing file atomically.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns [`ManifestError::IoError`] if the file cannot be written.
pub fn write_file(path: &Path, contents: &str) -> Result<(), ManifestError> {
    let io_error = |source: std::io::Error| ManifestError::IoError {
        path: path.display().to_string(),
        source,
    };

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(io_error)?;

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;

    debug!(path = %path.display(), "Wrote file");
    Ok(())
}

/// Removes the manifests previously generated for `branch` in `config_dir`.
///
/// Only files named `<org>-<repo>-<branch>__*.yaml` are removed, so
/// `release-v1.1` never matches the manifests of `release-v1.10`.
/// Returns the number of files removed; a missing directory removes nothing.
///
/// # Errors
///
/// Returns [`ManifestError::IoError`] if the directory cannot be read or a
/// file cannot be removed.
pub fn remove_stale_manifests(
    config_dir: &Path,
    org: &str,
    repo: &str,
    branch: &str,
) -> Result<usize, ManifestError> {
    let prefix = format!("{org}-{repo}-{branch}__");
    let entries = match std::fs::read_dir(config_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(ManifestError::IoError {
                path: config_dir.display().to_string(),
                source: e,
            })
        }
    };

    let mut stale = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ManifestError::IoError {
            path: config_dir.display().to_string(),
            source: e,
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&prefix) && name.ends_with(".yaml") && entry.path().is_file() {
            stale.push(entry.path());
        }
    }
    stale.sort();

    for path in &stale {
        std::fs::remove_file(path).map_err(|e| ManifestError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        debug!(path = %path.display(), "Removed stale manifest");
    }

    Ok(stale.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cell(branch: &str, version: &str) -> MatrixCell {
        MatrixCell {
            org: "openshift".to_string(),
            repo: "knative-eventing".to_string(),
            branch: branch.to_string(),
            version: version.to_string(),
            max_version: "4.11".to_string(),
            promotion_alias: "knative-v1.5".to_string(),
        }
    }

    #[test]
    fn manifest_paths() {
        let layout = ReleaseLayout::new("/release");
        assert_eq!(
            layout.manifest_path(&cell("release-v1.5", "4.11")),
            PathBuf::from(
                "/release/ci-operator/config/openshift/knative-eventing/openshift-knative-eventing-release-v1.5__411.yaml"
            )
        );

        let mapping = MirroringMapping::new("knative-v1.5", "knative-eventing");
        assert_eq!(
            layout.mapping_path(&mapping),
            PathBuf::from(
                "/release/core-services/image-mirroring/knative/mapping_knative-v1.5_knative-eventing_quay"
            )
        );
    }

    #[test]
    fn write_file_creates_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/file.yaml");

        write_file(&path, "first").unwrap();
        write_file(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn removes_only_matching_branch_manifests() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        for name in [
            "openshift-knative-eventing-release-v1.5__48.yaml",
            "openshift-knative-eventing-release-v1.5__411.yaml",
            "openshift-knative-eventing-release-v1.3__47.yaml",
            "release-v1.5-notes.txt",
        ] {
            fs::write(dir.join(name), "x").unwrap();
        }

        let removed =
            remove_stale_manifests(dir, "openshift", "knative-eventing", "release-v1.5").unwrap();

        assert_eq!(removed, 2);
        let mut left: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        left.sort();
        assert_eq!(
            left,
            [
                "openshift-knative-eventing-release-v1.3__47.yaml",
                "release-v1.5-notes.txt"
            ]
        );
    }

    #[test]
    fn branch_name_prefixes_do_not_match_other_branches() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        for name in [
            "openshift-knative-eventing-release-v1.1__411.yaml",
            "openshift-knative-eventing-release-v1.10__411.yaml",
            "openshift-knative-eventing-release-v1.1.2__411.yaml",
            "openshift-knative-eventing-client-release-v1.1__411.yaml",
        ] {
            fs::write(dir.join(name), "x").unwrap();
        }

        let removed =
            remove_stale_manifests(dir, "openshift", "knative-eventing", "release-v1.1").unwrap();

        assert_eq!(removed, 1);
        assert!(!dir
            .join("openshift-knative-eventing-release-v1.1__411.yaml")
            .exists());
        assert!(dir
            .join("openshift-knative-eventing-release-v1.10__411.yaml")
            .exists());
        assert!(dir
            .join("openshift-knative-eventing-release-v1.1.2__411.yaml")
            .exists());
        assert!(dir
            .join("openshift-knative-eventing-client-release-v1.1__411.yaml")
            .exists());
    }

    #[test]
    fn missing_config_dir_removes_nothing() {
        let temp = TempDir::new().unwrap();
        let removed = remove_stale_manifests(
            &temp.path().join("missing"),
            "openshift",
            "knative-eventing",
            "release-next",
        )
        .unwrap();
        assert_eq!(removed, 0);
    }
}
