//! Orchestrates a synthesis run.
//!
//! A run loads the configuration, prepares one working tree per repository
//! plus the orchestration repository, generates every repository's manifests
//! in declaration order, then optionally normalizes and publishes the result.
//! Everything runs sequentially and the first failure aborts the run.

mod config;
mod error;
mod generate;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use generate::generate_repository;

use crate::command::run_command;
use crate::config::{load_config, SynthConfig};
use crate::git::{clone_url, GitWorkingTree, WorkingTree};
use crate::manifest::{ManifestRenderer, ReleaseLayout};
use crate::publish::publish;
use crate::reporter::{inject_reporter, ReporterRenderer};
use crate::summary::RunSummary;
use std::path::Path;
use tracing::{debug, info, warn};

/// Branch checked out right after cloning a source repository.
const DEFAULT_BRANCH: &str = "main";

/// Orchestrates a full synthesis run.
pub struct Runner {
    config: RunnerConfig,
    synth: SynthConfig,
    renderer: ManifestRenderer,
    reporter: ReporterRenderer,
}

impl Runner {
    /// Builds a runner, loading and validating the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if the configuration is missing or invalid.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let synth = load_config(config.config_path())?;
        Ok(Self {
            renderer: ManifestRenderer::new(synth.settings.clone()),
            reporter: ReporterRenderer::new(),
            synth,
            config,
        })
    }

    /// The loaded configuration.
    pub fn synth_config(&self) -> &SynthConfig {
        &self.synth
    }

    /// Executes the full synthesis flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on the first failing step.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new();
        let settings = &self.synth.settings;

        if self.synth.repositories.is_empty() {
            warn!("No repositories configured");
        }

        let mut trees = Vec::with_capacity(self.synth.repositories.len());
        for spec in &self.synth.repositories {
            trees.push(self.prepare_tree(&spec.full_name(), DEFAULT_BRANCH).await?);
        }
        let release = self
            .prepare_tree(&settings.release_repository, &settings.release_branch)
            .await?;
        let layout = ReleaseLayout::new(release.path());

        for (spec, tree) in self.synth.repositories.iter().zip(trees.iter_mut()) {
            let result =
                generate_repository(spec, &self.synth, tree, &layout, &self.renderer).await?;
            summary.record_repository(&result);
        }

        if self.config.normalize() {
            summary.reporters_injected = self.normalize(&layout).await?;
        } else {
            info!("Skipping normalization");
        }

        if let Some(publish_config) = self.config.publish() {
            summary.publish = Some(publish(&release, settings, publish_config).await?);
        }

        Ok(summary)
    }

    /// Clones `full_name` into a fresh directory, or reuses the existing tree.
    async fn prepare_tree(
        &self,
        full_name: &str,
        branch: &str,
    ) -> Result<GitWorkingTree, RunnerError> {
        let path = self.config.tree_path(full_name);

        if !self.config.clone_repositories() {
            if !path.is_dir() {
                return Err(RunnerError::MissingWorkingTree {
                    path: path.display().to_string(),
                });
            }
            debug!(path = %path.display(), "Reusing working tree");
            return Ok(GitWorkingTree::open(path));
        }

        reset_dir(&path)?;
        let url = clone_url(&self.synth.github_url()?, full_name).map_err(|e| {
            RunnerError::CloneUrl {
                repository: full_name.to_string(),
                source: e,
            }
        })?;
        Ok(GitWorkingTree::clone_mirror(&url, &path, branch).await?)
    }

    /// Runs the orchestration tooling around reporter injection.
    ///
    /// Returns the number of periodic job files patched.
    async fn normalize(&self, layout: &ReleaseLayout) -> Result<usize, RunnerError> {
        info!("Generating jobs");
        run_command("make", &["jobs", "ci-operator-config"], layout.root()).await?;

        let mut injected = 0;
        for spec in &self.synth.repositories {
            let Some(channel) = spec.slack_channel() else {
                debug!(repository = %spec.full_name(), "No Slack channel, skipping reporter");
                continue;
            };
            injected += inject_reporter(
                &self.reporter,
                &layout.jobs_dir(spec.org(), spec.repo()),
                channel,
            )?;
        }

        info!("Reformatting generated configuration");
        run_command("make", &["ci-operator-config", "jobs"], layout.root()).await?;
        Ok(injected)
    }
}

/// Removes `path` if present and recreates it empty.
fn reset_dir(path: &Path) -> Result<(), RunnerError> {
    let io_error = |source: std::io::Error| RunnerError::IoError {
        path: path.display().to_string(),
        source,
    };

    match std::fs::remove_dir_all(path) {
        Ok(()) => debug!(path = %path.display(), "Removed previous working tree"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_error(e)),
    }
    std::fs::create_dir_all(path).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reset_dir_empties_existing_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("openshift/knative-eventing");
        fs::create_dir_all(dir.join("stale")).unwrap();
        fs::write(dir.join("Makefile"), "test:\n").unwrap();

        reset_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn reset_dir_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("openshift/release");
        reset_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn new_fails_on_missing_config() {
        let temp = TempDir::new().unwrap();
        let config = RunnerConfig::new(temp.path().join("missing.toml"), temp.path().into());
        assert!(matches!(
            Runner::new(config),
            Err(RunnerError::Config(crate::config::ConfigError::MissingFile { .. }))
        ));
    }

    #[tokio::test]
    async fn no_clone_requires_existing_trees() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("ci-matrix.toml");
        fs::write(
            &config_path,
            "[[branches]]\nname = \"release-v1.5\"\nmin = \"4.8\"\nmax = \"4.11\"\n",
        )
        .unwrap();

        let config = RunnerConfig::new(config_path, temp.path().join("work")).with_clone(false);
        let runner = Runner::new(config).unwrap();

        assert!(matches!(
            runner.run().await,
            Err(RunnerError::MissingWorkingTree { .. })
        ));
    }
}
