//! Configuration for a mirror run.

use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::DEFAULT_TIMEOUT_SECS;

/// Upstream WrapDB origin.
pub const DEFAULT_BASE_URL: &str = "https://wrapdb.mesonbuild.com";

/// API version mirrored by default.
pub const DEFAULT_API_VERSION: &str = "v1";

/// What to do when a project's version list cannot be parsed.
///
/// Transport failures are always fatal; this only governs documents that
/// arrived but could not be understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionListPolicy {
    /// Log the project, record it as skipped, and continue.
    #[default]
    Skip,
    /// Abort the whole run.
    Abort,
}

/// Configuration for a mirror run.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Directory receiving the `<api_version>-static` tree.
    pub output_dir: PathBuf,

    /// Upstream origin, without the API version.
    pub base_url: String,

    /// API version to mirror.
    pub api_version: String,

    /// HTTP request timeout for the default fetcher.
    pub timeout: Duration,

    /// Handling of unparsable version lists.
    pub version_list_policy: VersionListPolicy,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            version_list_policy: VersionListPolicy::default(),
        }
    }
}

impl MirrorConfig {
    /// Create a new configuration writing into `output_dir`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    /// Set the upstream origin.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the version list failure policy.
    pub fn with_version_list_policy(mut self, policy: VersionListPolicy) -> Self {
        self.version_list_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MirrorConfig::default();
        assert_eq!(config.base_url, "https://wrapdb.mesonbuild.com");
        assert_eq!(config.api_version, "v1");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.version_list_policy, VersionListPolicy::Skip);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MirrorConfig::new(PathBuf::from("/srv/mirror"))
            .with_base_url("http://localhost:8080")
            .with_api_version("v2")
            .with_timeout(Duration::from_secs(10))
            .with_version_list_policy(VersionListPolicy::Abort);

        assert_eq!(config.output_dir, PathBuf::from("/srv/mirror"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_version, "v2");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.version_list_policy, VersionListPolicy::Abort);
    }
}
