//! Retrieval of upstream resources.
//!
//! The mirror only needs one capability from the transport: fetch the bytes
//! at a URL and persist them to a path. [`ResourceFetcher`] captures that so
//! the orchestrator can be driven by [`HttpFetcher`] in production and by an
//! in-memory fake in tests.

mod http;

pub use http::{HttpFetcher, DEFAULT_TIMEOUT_SECS};

use std::fs;
use std::path::Path;

use crate::error::{MirrorError, MirrorResult};

/// Fetches a URL and writes its bytes to a file.
pub trait ResourceFetcher {
    /// Download `url` to `dest`, replacing any existing file.
    ///
    /// Parent directories of `dest` are created as needed. Returns the
    /// number of bytes written.
    fn fetch(&self, url: &str, dest: &Path) -> MirrorResult<u64>;
}

impl<F: ResourceFetcher + ?Sized> ResourceFetcher for &F {
    fn fetch(&self, url: &str, dest: &Path) -> MirrorResult<u64> {
        (**self).fetch(url, dest)
    }
}

/// Create the parent directory of `dest`.
pub(crate) fn ensure_parent(dest: &Path) -> MirrorResult<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| MirrorError::CreateDirFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_parent_creates_directories() {
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("a").join("-").join("b");
        ensure_parent(&dest).unwrap();
        assert!(temp.path().join("a").join("-").is_dir());
        assert!(!dest.exists());
    }
}
