//! Runner configuration.

use crate::publish::PublishConfig;
use std::path::{Path, PathBuf};

/// Configuration for a synthesis run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the synthesis configuration file.
    config_path: PathBuf,
    /// Directory repositories are cloned into, one `<org>/<repo>` tree each.
    workdir: PathBuf,
    /// Whether to clone fresh mirrors instead of reusing existing trees.
    clone: bool,
    /// Whether to run the orchestration repository's tooling and inject reporters.
    normalize: bool,
    /// Publishing options; `None` leaves the changes uncommitted.
    publish: Option<PublishConfig>,
}

impl RunnerConfig {
    /// Creates a configuration that clones, normalizes and does not publish.
    pub fn new(config_path: PathBuf, workdir: PathBuf) -> Self {
        Self {
            config_path,
            workdir,
            clone: true,
            normalize: true,
            publish: None,
        }
    }

    /// Sets whether repositories are cloned before generation.
    pub fn with_clone(mut self, clone: bool) -> Self {
        self.clone = clone;
        self
    }

    /// Sets whether normalization and reporter injection run.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enables publishing the generated changes.
    pub fn with_publish(mut self, publish: PublishConfig) -> Self {
        self.publish = Some(publish);
        self
    }

    /// Returns the configuration file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the working directory.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Returns whether repositories are cloned.
    pub fn clone_repositories(&self) -> bool {
        self.clone
    }

    /// Returns whether normalization runs.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Returns the publishing options.
    pub fn publish(&self) -> Option<&PublishConfig> {
        self.publish.as_ref()
    }

    /// Directory of the working tree for `full_name` (`org/repo`).
    pub fn tree_path(&self, full_name: &str) -> PathBuf {
        self.workdir.join(full_name)
    }
}
