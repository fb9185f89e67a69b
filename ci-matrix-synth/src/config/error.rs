//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading the synthesis configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Cannot read configuration '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown shapes.
    #[error("Malformed configuration '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A setting, branch or repository entry was rejected.
    #[error("Invalid configuration '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// No configuration file at the given path.
    #[error("Configuration file not found: {path}")]
    MissingFile { path: String },
}
