//! Runner error types.

/// Errors that abort a synthesis run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Test target or image discovery errors.
    #[error(transparent)]
    Discovery(#[from] crate::discovery::DiscoveryError),

    /// Manifest encoding or writing errors.
    #[error(transparent)]
    Manifest(#[from] crate::manifest::ManifestError),

    /// External command failures.
    #[error(transparent)]
    Command(#[from] crate::command::CommandError),

    /// Reporter injection errors.
    #[error(transparent)]
    Reporter(#[from] crate::reporter::ReporterError),

    /// Publishing errors.
    #[error(transparent)]
    Publish(#[from] crate::publish::PublishError),

    /// Invalid clone URL for a repository.
    #[error("Invalid clone URL for '{repository}': {source}")]
    CloneUrl {
        repository: String,
        #[source]
        source: url::ParseError,
    },

    /// A reused working tree does not exist.
    #[error("Working tree '{path}' does not exist; clone it first")]
    MissingWorkingTree { path: String },

    /// Failed to prepare a working directory.
    #[error("Failed to prepare '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
