//! Configuration loading.
//!
//! This module parses the synthesis configuration file: organization-wide
//! [`Settings`], the default [`BranchVersionTable`] and the list of
//! [`RepositorySpec`]s. Values are validated once at load time and never
//! mutated afterwards.

mod branches;
mod error;
mod repository;
mod settings;

pub use branches::{BranchEntry, BranchVersionTable, VersionRange};
pub use error::ConfigError;
pub use repository::{
    BranchOptionsEntry, E2eEntry, ImagesEntry, ReporterEntry, RepositoryEntry, RepositorySpec,
    SlackEntry,
};
pub use settings::Settings;

use bstr::BStr;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// The configuration file as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
    branches: Vec<BranchEntry>,
    #[serde(default)]
    repositories: Vec<RepositoryEntry>,
}

/// Immutable configuration for a synthesis run.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Organization-wide settings.
    pub settings: Settings,

    /// Branches supported by every repository.
    pub branches: BranchVersionTable,

    /// Repositories to generate manifests for, in declaration order.
    pub repositories: Vec<RepositorySpec>,
}

impl SynthConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// `source` names the origin of `content` in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or fails validation.
    pub fn parse(content: &str, source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: source.to_string(),
            source: e,
        })?;

        validate_settings(&file.settings, source)?;

        if file.branches.is_empty() {
            return Err(ConfigError::ValidationError {
                path: source.to_string(),
                message: "at least one branch must be declared".to_string(),
            });
        }
        for branch in &file.branches {
            validate_branch(branch, source)?;
        }

        let mut seen = HashSet::new();
        let mut repositories = Vec::with_capacity(file.repositories.len());
        for entry in file.repositories {
            if !seen.insert(entry.name.clone()) {
                return Err(ConfigError::ValidationError {
                    path: source.to_string(),
                    message: format!("repository '{}' is declared twice", entry.name),
                });
            }
            let spec = RepositorySpec::from_entry(entry, source)?;
            debug!(repository = %spec.full_name(), "Loaded repository specification");
            repositories.push(spec);
        }

        Ok(Self {
            settings: file.settings,
            branches: BranchVersionTable::from(file.branches),
            repositories,
        })
    }

    /// Base URL repositories are cloned from.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the configured URL is invalid.
    pub fn github_url(&self) -> Result<Url, ConfigError> {
        parse_github_url(&self.settings.github_url, "settings")
    }
}

/// Loads the synthesis configuration from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if `path` does not exist, or any
/// parse/validation error reported by [`SynthConfig::parse`].
pub fn load_config(path: &Path) -> Result<SynthConfig, ConfigError> {
    info!(path = %path.display(), "Loading configuration");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = SynthConfig::parse(&content, &path.display().to_string())?;
    info!(
        repositories = config.repositories.len(),
        branches = config.branches.len(),
        "Loaded configuration"
    );
    Ok(config)
}

fn validate_settings(settings: &Settings, source: &str) -> Result<(), ConfigError> {
    parse_github_url(&settings.github_url, source)?;

    if !settings.release_repository.contains('/') {
        return Err(ConfigError::ValidationError {
            path: source.to_string(),
            message: format!(
                "release-repository '{}' must be in 'org/name' format",
                settings.release_repository
            ),
        });
    }

    validate_branch_name(&settings.release_branch, source)
}

fn parse_github_url(raw: &str, source: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::ValidationError {
        path: source.to_string(),
        message: format!("github-url '{raw}' is not a valid URL: {e}"),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::ValidationError {
            path: source.to_string(),
            message: format!("github-url '{raw}' cannot be used as a base URL"),
        });
    }
    Ok(url)
}

/// Validates a branch name and its version endpoints.
pub(crate) fn validate_branch(branch: &BranchEntry, source: &str) -> Result<(), ConfigError> {
    validate_branch_name(&branch.name, source)?;

    for version in [&branch.min, &branch.max] {
        if !is_platform_version(version) {
            return Err(ConfigError::ValidationError {
                path: source.to_string(),
                message: format!(
                    "branch '{}' has invalid platform version '{version}'",
                    branch.name
                ),
            });
        }
    }
    Ok(())
}

/// Branch names end up on git command lines and in file names.
fn validate_branch_name(name: &str, source: &str) -> Result<(), ConfigError> {
    gix_validate::reference::name_partial(BStr::new(name))
        .map(|_| ())
        .map_err(|e| ConfigError::ValidationError {
            path: source.to_string(),
            message: format!("branch '{name}' is not a valid git reference: {e}"),
        })
}

/// Dotted numeric versions such as "4.11".
fn is_platform_version(version: &str) -> bool {
    !version.is_empty()
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}
