//! Publishing generated configuration to the orchestration repository.
//!
//! This module commits the regenerated files on a dedicated branch, pushes
//! it to a fork and optionally opens a pull request against the upstream
//! orchestration repository.

mod error;
mod status;

pub use error::PublishError;
pub use status::PublishStatus;

use crate::command::run_command;
use crate::config::Settings;
use crate::git::{GitWorkingTree, WorkingTree};
use octocrab::Octocrab;
use tracing::{info, info_span, Instrument};

/// Name of the git remote pointing at the fork.
const FORK_REMOTE: &str = "fork";

/// Where and how generated configuration is published.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Git URL of the fork receiving the branch.
    pub remote: String,

    /// Branch created in the orchestration repository.
    pub branch: String,

    /// Commit message and pull request title.
    pub message: String,

    /// Pull request options; `None` only pushes the branch.
    pub pull_request: Option<PullRequestConfig>,
}

impl PublishConfig {
    /// Creates a push-only configuration with the default branch and message.
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            branch: "sync-serverless-ci".to_string(),
            message: "Sync Serverless CI".to_string(),
            pull_request: None,
        }
    }

    /// Sets the branch pushed to the fork.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Enables opening a pull request after pushing.
    pub fn with_pull_request(mut self, pull_request: PullRequestConfig) -> Self {
        self.pull_request = Some(pull_request);
        self
    }
}

/// Credentials for opening the upstream pull request.
#[derive(Debug, Clone)]
pub struct PullRequestConfig {
    /// GitHub token used for the API call.
    pub token: String,

    /// Owner of the fork the branch was pushed to.
    pub fork_owner: String,
}

/// Commits, pushes and optionally opens a pull request.
///
/// The orchestration repository's `Makefile` is restored first because its
/// tooling may rewrite it.
///
/// # Errors
///
/// Returns [`PublishError`] if a git command or the GitHub API call fails.
pub async fn publish(
    release: &GitWorkingTree,
    settings: &Settings,
    config: &PublishConfig,
) -> Result<PublishStatus, PublishError> {
    let span = info_span!("publish", branch = %config.branch);

    async {
        release.git(&["restore", "Makefile"]).await?;

        if !has_changes(release).await? {
            info!("No changes to publish");
            return Ok(PublishStatus::Unchanged);
        }

        release.git(&["checkout", "-b", &config.branch]).await?;
        release.git(&["add", "."]).await?;
        release.git(&["commit", "-m", &config.message]).await?;
        release
            .git(&["remote", "add", FORK_REMOTE, &config.remote])
            .await?;
        release
            .git(&["push", FORK_REMOTE, &config.branch, "-f"])
            .await?;
        info!(remote = %config.remote, "Pushed branch");

        let Some(pull_request) = &config.pull_request else {
            return Ok(PublishStatus::Pushed {
                branch: config.branch.clone(),
            });
        };

        let (number, url) = open_pull_request(settings, config, pull_request).await?;
        info!(pr_number = number, "PR created successfully");
        Ok::<_, PublishError>(PublishStatus::PullRequestOpened { number, url })
    }
    .instrument(span)
    .await
}

/// Checks if there are uncommitted changes.
async fn has_changes(release: &GitWorkingTree) -> Result<bool, PublishError> {
    let output = run_command("git", &["status", "--porcelain"], release.path()).await?;
    Ok(!output.stdout.trim().is_empty())
}

/// Creates a PR via GitHub API.
async fn open_pull_request(
    settings: &Settings,
    config: &PublishConfig,
    pull_request: &PullRequestConfig,
) -> Result<(u64, String), PublishError> {
    let (owner, repo) = settings
        .release_repository
        .split_once('/')
        .ok_or_else(|| PublishError::InvalidRepository(settings.release_repository.clone()))?;

    let octocrab = Octocrab::builder()
        .personal_token(pull_request.token.clone())
        .build()?;

    let head = format!("{}:{}", pull_request.fork_owner, config.branch);
    let pr = octocrab
        .pulls(owner, repo)
        .create(&config.message, &head, &settings.release_branch)
        .body(&config.message)
        .send()
        .await?;

    let url = pr
        .html_url
        .as_ref()
        .map(|u| u.to_string())
        .unwrap_or_else(|| {
            format!(
                "https://github.com/{}/pull/{}",
                settings.release_repository, pr.number
            )
        });

    Ok((pr.number, url))
}
