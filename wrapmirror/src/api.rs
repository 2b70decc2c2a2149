//! Upstream API documents and endpoint URLs.

use std::path::Path;

use serde::Deserialize;

use crate::error::{MirrorError, MirrorResult};
use crate::layout::{validate_segment, ApiAddress};

/// Root listing of all project identifiers (`/<api>/projects`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    pub projects: Vec<String>,
}

impl Catalog {
    /// Parse catalog JSON. Every project name must be usable as a path segment.
    pub fn parse(bytes: &[u8], path: &Path) -> MirrorResult<Self> {
        let malformed = |reason: String| MirrorError::MalformedCatalog {
            path: path.to_path_buf(),
            reason,
        };

        let catalog: Catalog =
            serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;
        for project in &catalog.projects {
            validate_segment(project).map_err(|e| malformed(e.to_string()))?;
        }
        Ok(catalog)
    }
}

/// One release line of a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Version {
    pub branch: String,
    pub revision: u64,
}

/// Versions of one project (`/<api>/projects/<project>`), in upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionList {
    pub versions: Vec<Version>,
}

impl VersionList {
    /// Parse a project's version list JSON.
    pub fn parse(bytes: &[u8], project: &str, path: &Path) -> MirrorResult<Self> {
        let malformed = |reason: String| MirrorError::MalformedVersionList {
            project: project.to_string(),
            path: path.to_path_buf(),
            reason,
        };

        let list: VersionList =
            serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;
        for version in &list.versions {
            validate_segment(&version.branch).map_err(|e| malformed(e.to_string()))?;
            if version.revision == 0 {
                return Err(malformed(format!(
                    "branch {} has revision 0, revisions start at 1",
                    version.branch
                )));
            }
        }
        Ok(list)
    }
}

/// Outcome of comparing a descriptor's declared archive URL with the canonical one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveUrlCheck {
    /// Declared URL is the canonical endpoint.
    Canonical,
    /// Declared URL is the canonical endpoint over plain HTTP.
    Insecure,
    /// Declared URL points somewhere else.
    Mismatch { expected: String },
}

/// Builds upstream URLs for API addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    api_version: String,
}

impl Endpoints {
    /// Create endpoints for `base_url` (e.g. `https://wrapdb.mesonbuild.com`) and an API version.
    pub fn new(base_url: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into(),
        }
    }

    /// `<base>/<api>/<address>`.
    pub fn url(&self, address: &ApiAddress) -> String {
        format!("{}/{}/{}", self.base_url, self.api_version, address.url_path())
    }

    /// The same URL over plain HTTP, if the base uses HTTPS.
    pub fn insecure_url(&self, address: &ApiAddress) -> Option<String> {
        self.url(address)
            .strip_prefix("https://")
            .map(|rest| format!("http://{}", rest))
    }

    /// Classify `declared` against the archive endpoint of `address`.
    pub fn check_archive_url(&self, address: &ApiAddress, declared: &str) -> ArchiveUrlCheck {
        let expected = self.url(address);
        if declared == expected {
            ArchiveUrlCheck::Canonical
        } else if self.insecure_url(address).as_deref() == Some(declared) {
            ArchiveUrlCheck::Insecure
        } else {
            ArchiveUrlCheck::Mismatch { expected }
        }
    }
}
