//! CLI error type.

use thiserror::Error;
use wrapmirror::MirrorError;

/// Errors reported by the `wrapmirror` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The mirror run failed.
    #[error(transparent)]
    Mirror(#[from] MirrorError),

    /// The logging subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
