//! Reporter injection error types.

use thiserror::Error;

/// Errors that can occur while injecting Slack reporters.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// Failed to read or write a job file.
    #[error("Failed to update '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
