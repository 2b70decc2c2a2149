//! Error types for mirror runs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors that can occur while building a mirror.
///
/// Every error returned from [`Mirror::run`](crate::mirror::Mirror::run) ends the run.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Failed to read a file.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to copy a canonical file to one of its aliases.
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// A value cannot be used as a single segment of a mirror path.
    #[error("invalid path segment {segment:?}: {reason}")]
    InvalidSegment { segment: String, reason: &'static str },

    /// The HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// A request could not be completed.
    #[error("failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The upstream answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Network timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The project catalog could not be parsed.
    #[error("malformed project catalog {}: {reason}", path.display())]
    MalformedCatalog { path: PathBuf, reason: String },

    /// A project's version list could not be parsed.
    #[error("malformed version list for {project} ({}): {reason}", path.display())]
    MalformedVersionList {
        project: String,
        path: PathBuf,
        reason: String,
    },

    /// A wrap descriptor is missing required keys or has invalid values.
    #[error("malformed wrap descriptor {}: {reason}", path.display())]
    MalformedDescriptor { path: PathBuf, reason: String },

    /// The descriptor declares an archive URL unrelated to the address it was fetched from.
    #[error(
        "wrap for {project} {branch}-{revision} declares archive url {declared}, expected {expected}"
    )]
    ArchiveUrlMismatch {
        project: String,
        branch: String,
        revision: u64,
        expected: String,
        declared: String,
    },

    /// Checksum verification failed.
    #[error("checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}
