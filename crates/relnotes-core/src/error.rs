//! Error types for relnotes-core

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while writing the XML document.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The output sink rejected a write.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// A release date could not be parsed and the render options forbid the sentinel.
    #[error("release {version} has an unparseable date: {text:?}")]
    InvalidDate {
        /// Version of the offending release.
        version: String,
        /// The cleaned date text that failed to parse.
        text: String,
    },
}

/// Errors from a full read-parse-render pass.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Reading the changelog failed.
    #[error("failed to read changelog: {0}")]
    Read(#[source] std::io::Error),

    /// Rendering or writing the XML failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type alias using [`ConvertError`].
pub type ConvertResult<T> = Result<T, ConvertError>;
