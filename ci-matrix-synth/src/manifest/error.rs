//! Manifest rendering error types.

use thiserror::Error;

/// Errors that can occur while encoding or writing manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to encode the document model.
    #[error("Failed to encode manifest for {org}/{repo}@{branch} ({version}): {source}")]
    EncodeError {
        org: String,
        repo: String,
        branch: String,
        version: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Failed to write or remove a file.
    #[error("Failed to write '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
