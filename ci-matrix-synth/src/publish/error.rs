//! Publishing error types.

use thiserror::Error;

/// Errors that can occur while publishing generated configuration.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A git command failed.
    #[error(transparent)]
    Command(#[from] crate::command::CommandError),

    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The release repository identifier is not "org/name".
    #[error("Invalid release repository '{0}'")]
    InvalidRepository(String),
}
