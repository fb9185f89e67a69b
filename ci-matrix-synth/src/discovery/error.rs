//! Discovery error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering test targets and images.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Failed to read a file or directory in the working tree.
    #[error("Failed to read '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to walk an image context root.
    #[error("Failed to walk '{root}': {source}")]
    WalkError {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Two build contexts normalize to the same image name.
    #[error("Image name '{name}' is produced by both '{first}' and '{second}'")]
    ImageCollision {
        name: String,
        first: String,
        second: String,
    },
}
