//! Error types for xcembed operations.
//!
//! Module-level errors stay typed where they arise (embed pipeline, slice
//! operations, script environment) and are wrapped into one closed set here
//! for the binary's exit path.

use thiserror::Error;

/// Result type alias for top-level operations.
pub type Result<T> = std::result::Result<T, XcembedError>;

/// Main error type for the xcembed binary.
#[derive(Error, Debug)]
pub enum XcembedError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Script environment errors
    #[error("environment error: {0}")]
    Env(#[from] crate::embedder::EnvError),

    /// Embed pipeline errors
    #[error("{0}")]
    Embed(#[from] crate::embedder::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}
