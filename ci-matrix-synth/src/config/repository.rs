//! Repository specifications.

use crate::config::{BranchEntry, BranchVersionTable, ConfigError};
use regex::Regex;
use serde::Deserialize;

/// A `[[repositories]]` entry as written in the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepositoryEntry {
    /// Repository identifier in "org/name" format.
    pub name: String,

    /// End-to-end test selection.
    pub e2e: E2eEntry,

    /// Image naming options.
    #[serde(default)]
    pub images: ImagesEntry,

    /// Branch options.
    #[serde(default)]
    pub branch: BranchOptionsEntry,
}

/// `e2e` table of a repository entry.
#[derive(Debug, Clone, Deserialize)]
pub struct E2eEntry {
    /// Regular expressions selecting e2e Makefile targets.
    #[serde(rename = "match")]
    pub patterns: Vec<String>,

    /// Where periodic job results are reported.
    pub reporter: Option<ReporterEntry>,
}

/// `e2e.reporter` table of a repository entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ReporterEntry {
    /// Slack reporting options.
    pub slack: SlackEntry,
}

/// `e2e.reporter.slack` table of a repository entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackEntry {
    /// Channel receiving periodic job results (e.g. "#knative-eventing-ci").
    pub channel: String,
}

/// `images` table of a repository entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesEntry {
    /// Image name prefix, defaults to the repository short name.
    pub prefix: Option<String>,
}

/// `branch` table of a repository entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchOptionsEntry {
    /// Branches supported in addition to the default table.
    #[serde(default)]
    pub additional: Vec<BranchEntry>,
}

/// A validated repository specification.
///
/// Patterns are compiled once and anchored at the start of the target name.
#[derive(Debug, Clone)]
pub struct RepositorySpec {
    org: String,
    repo: String,
    patterns: Vec<Regex>,
    image_prefix: String,
    slack_channel: Option<String>,
    additional_branches: BranchVersionTable,
}

impl RepositorySpec {
    /// Validates a raw entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] when the identifier is not
    /// "org/name", a pattern fails to compile, or an additional branch is
    /// invalid.
    pub fn from_entry(entry: RepositoryEntry, source: &str) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: source.to_string(),
            message,
        };

        let (org, repo) = match entry.name.split_once('/') {
            Some((org, repo)) if !org.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                (org.to_string(), repo.to_string())
            }
            _ => {
                return Err(invalid(format!(
                    "repository '{}' must be in 'org/name' format",
                    entry.name
                )))
            }
        };

        if entry.e2e.patterns.is_empty() {
            return Err(invalid(format!(
                "repository '{}' has no e2e match patterns",
                entry.name
            )));
        }

        let patterns = entry
            .e2e
            .patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})")).map_err(|e| {
                    invalid(format!(
                        "repository '{}' has invalid e2e pattern '{pattern}': {e}",
                        entry.name
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let image_prefix = match entry.images.prefix {
            Some(prefix) if prefix.trim().is_empty() => {
                return Err(invalid(format!(
                    "repository '{}' has an empty image prefix",
                    entry.name
                )))
            }
            Some(prefix) => prefix,
            None => repo.clone(),
        };

        let slack_channel = entry
            .e2e
            .reporter
            .map(|reporter| reporter.slack.channel)
            .filter(|channel| !channel.trim().is_empty());

        for branch in &entry.branch.additional {
            super::validate_branch(branch, source)?;
        }
        let additional_branches = BranchVersionTable::from(entry.branch.additional);

        Ok(Self {
            org,
            repo,
            patterns,
            image_prefix,
            slack_channel,
            additional_branches,
        })
    }

    /// Organization (e.g. "openshift").
    #[must_use]
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Repository short name (e.g. "knative-eventing").
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Full identifier in "org/name" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    /// Prefix applied to every image name.
    #[must_use]
    pub fn image_prefix(&self) -> &str {
        &self.image_prefix
    }

    /// Slack channel for periodic job reports, if any.
    #[must_use]
    pub fn slack_channel(&self) -> Option<&str> {
        self.slack_channel.as_deref()
    }

    /// Branch overrides layered onto the default table.
    #[must_use]
    pub fn additional_branches(&self) -> &BranchVersionTable {
        &self.additional_branches
    }

    /// Whether `target` is selected as an e2e test.
    ///
    /// Patterns match from the first character; a trailing `$` in a pattern
    /// requires a full match.
    #[must_use]
    pub fn is_e2e_target(&self, target: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(target))
    }
}
