//! Mapping of API addresses onto the mirror directory tree.
//!
//! The mirror reproduces the upstream endpoint grammar as nested directories.
//! An address such as `projects/zlib` is both a resource (the version list
//! JSON) and a namespace (the parent of `projects/zlib/1.2.13/...`). Both
//! cannot live at the same filesystem path, so resources are stored under a
//! reserved [`RESOURCE_SENTINEL`] directory inside their parent namespace:
//!
//! ```text
//! v1-static/
//! ├── -/projects                               resource  projects
//! ├── projects/-/zlib                          resource  projects/zlib
//! ├── projects/zlib/1.2.13/1/-/get_wrap        resource  projects/zlib/1.2.13/1/get_wrap
//! ├── projects/zlib/1.2.13/1/zlib.wrap         alias
//! └── query/get_latest/-/zlib                  resource  query/get_latest/zlib
//! ```
//!
//! The sentinel is never a legal segment, which keeps the mapping injective.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{MirrorError, MirrorResult};

/// Directory name separating resources from namespaces.
pub const RESOURCE_SENTINEL: &str = "-";

/// Top-level namespace holding projects.
const PROJECTS: &str = "projects";

/// Top-level namespace holding query endpoints.
const QUERY: &str = "query";

/// Query endpoint resolving the newest version of a project.
const GET_LATEST: &str = "get_latest";

/// Per-version artifact endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactEndpoint {
    /// The wrap descriptor.
    GetWrap,
    /// The patch archive.
    GetZip,
}

impl ArtifactEndpoint {
    /// Endpoint name as it appears in URLs and mirror paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactEndpoint::GetWrap => "get_wrap",
            ArtifactEndpoint::GetZip => "get_zip",
        }
    }
}

impl fmt::Display for ArtifactEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that `segment` can be used as one component of a mirror path.
pub fn validate_segment(segment: &str) -> MirrorResult<()> {
    let reason = if segment.is_empty() {
        Some("empty")
    } else if segment == RESOURCE_SENTINEL {
        Some("reserved for resources")
    } else if segment == "." || segment == ".." {
        Some("relative path component")
    } else if segment.contains(['/', '\\', '\0']) {
        Some("contains a path separator")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(MirrorError::InvalidSegment {
            segment: segment.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// An address in the upstream API, as a sequence of path segments.
///
/// Addresses are relative to the API version prefix, so `projects/zlib`
/// stands for `/<api-version>/projects/zlib`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiAddress {
    segments: Vec<String>,
}

impl ApiAddress {
    /// Build an address from arbitrary segments, validating each one.
    pub fn new<I, S>(segments: I) -> MirrorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(MirrorError::InvalidSegment {
                segment: String::new(),
                reason: "address has no segments",
            });
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// `projects`: the catalog.
    pub fn catalog() -> Self {
        Self {
            segments: vec![PROJECTS.to_string()],
        }
    }

    /// `projects/<project>`: a project's version list.
    pub fn project(project: &str) -> MirrorResult<Self> {
        Self::new([PROJECTS, project])
    }

    /// `projects/<project>/<branch>/<revision>`: one version.
    pub fn version(project: &str, branch: &str, revision: u64) -> MirrorResult<Self> {
        Self::new([PROJECTS, project, branch, &revision.to_string()])
    }

    /// `projects/<project>/<branch>/<revision>/<endpoint>`.
    pub fn artifact(
        project: &str,
        branch: &str,
        revision: u64,
        endpoint: ArtifactEndpoint,
    ) -> MirrorResult<Self> {
        Self::new([
            PROJECTS,
            project,
            branch,
            &revision.to_string(),
            endpoint.as_str(),
        ])
    }

    /// `query/get_latest/<project>`.
    pub fn latest(project: &str) -> MirrorResult<Self> {
        Self::new([QUERY, GET_LATEST, project])
    }

    /// The address segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// URL path form, without a leading slash.
    pub fn url_path(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for ApiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url_path())
    }
}

/// Name of the mirror root directory for an API version.
pub fn mirror_root_name(api_version: &str) -> String {
    format!("{}-static", api_version)
}

/// Alias name `{project}.wrap`.
pub fn wrap_alias_name(project: &str) -> String {
    format!("{}.wrap", project)
}

/// Alias name `{project}-{branch}-{revision}.wrap`.
pub fn versioned_wrap_alias_name(project: &str, branch: &str, revision: u64) -> String {
    format!("{}-{}-{}.wrap", project, branch, revision)
}

/// Filesystem layout of one mirror tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorLayout {
    root: PathBuf,
}

impl MirrorLayout {
    /// Layout rooted at `<output_dir>/<api_version>-static`.
    pub fn new(output_dir: &Path, api_version: &str) -> Self {
        Self {
            root: output_dir.join(mirror_root_name(api_version)),
        }
    }

    /// The mirror root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the children of `address`.
    pub fn namespace_path(&self, address: &ApiAddress) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(address.segments());
        path
    }

    /// File holding the bytes served at `address`.
    pub fn resource_path(&self, address: &ApiAddress) -> PathBuf {
        let mut path = self.root.clone();
        if let Some((last, parents)) = address.segments().split_last() {
            path.extend(parents);
            path.push(RESOURCE_SENTINEL);
            path.push(last);
        }
        path
    }

    /// Path of an alias file placed in a version's namespace directory.
    pub fn version_alias_path(
        &self,
        project: &str,
        branch: &str,
        revision: u64,
        file_name: &str,
    ) -> MirrorResult<PathBuf> {
        validate_segment(file_name)?;
        let version = ApiAddress::version(project, branch, revision)?;
        Ok(self.namespace_path(&version).join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout() -> MirrorLayout {
        MirrorLayout::new(Path::new("/out"), "v1")
    }

    #[test]
    fn test_root_is_versioned() {
        assert_eq!(layout().root(), Path::new("/out/v1-static"));
    }

    #[test]
    fn test_catalog_paths() {
        let address = ApiAddress::catalog();
        assert_eq!(
            layout().resource_path(&address),
            PathBuf::from("/out/v1-static/-/projects")
        );
        assert_eq!(
            layout().namespace_path(&address),
            PathBuf::from("/out/v1-static/projects")
        );
    }

    #[test]
    fn test_project_resource_path() {
        let address = ApiAddress::project("zlib").unwrap();
        assert_eq!(
            layout().resource_path(&address),
            PathBuf::from("/out/v1-static/projects/-/zlib")
        );
    }

    #[test]
    fn test_artifact_resource_path() {
        let address =
            ApiAddress::artifact("zlib", "1.2.13", 1, ArtifactEndpoint::GetWrap).unwrap();
        assert_eq!(
            layout().resource_path(&address),
            PathBuf::from("/out/v1-static/projects/zlib/1.2.13/1/-/get_wrap")
        );
        assert_eq!(address.url_path(), "projects/zlib/1.2.13/1/get_wrap");
    }

    #[test]
    fn test_latest_resource_path() {
        let address = ApiAddress::latest("zlib").unwrap();
        assert_eq!(
            layout().resource_path(&address),
            PathBuf::from("/out/v1-static/query/get_latest/-/zlib")
        );
    }

    #[test]
    fn test_version_alias_path() {
        let path = layout()
            .version_alias_path("zlib", "1.2.13", 1, "zlib.wrap")
            .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/out/v1-static/projects/zlib/1.2.13/1/zlib.wrap")
        );
    }

    #[test]
    fn test_alias_names() {
        assert_eq!(wrap_alias_name("zlib"), "zlib.wrap");
        assert_eq!(
            versioned_wrap_alias_name("zlib", "1.2.13", 1),
            "zlib-1.2.13-1.wrap"
        );
    }

    #[test]
    fn test_rejects_invalid_segments() {
        assert!(ApiAddress::project("-").is_err());
        assert!(ApiAddress::project("").is_err());
        assert!(ApiAddress::project("..").is_err());
        assert!(ApiAddress::project("a/b").is_err());
        assert!(ApiAddress::new(Vec::<String>::new()).is_err());
        assert!(layout()
            .version_alias_path("zlib", "1.2.13", 1, "../evil.zip")
            .is_err());
    }

    #[test]
    fn test_sentinel_allowed_inside_names() {
        assert!(validate_segment("foo-bar").is_ok());
        assert!(validate_segment("-foo").is_ok());
    }

    fn segment() -> impl Strategy<Value = String> {
        "[a-z0-9._-]{1,6}".prop_filter("valid segment", |s| validate_segment(s).is_ok())
    }

    fn address() -> impl Strategy<Value = ApiAddress> {
        prop::collection::vec(segment(), 1..5)
            .prop_map(|segments| ApiAddress::new(segments).unwrap())
    }

    proptest! {
        #[test]
        fn prop_resource_paths_are_injective(a in address(), b in address()) {
            let layout = layout();
            if a != b {
                prop_assert_ne!(layout.resource_path(&a), layout.resource_path(&b));
            }
        }

        #[test]
        fn prop_resource_never_equals_namespace(a in address(), b in address()) {
            let layout = layout();
            prop_assert_ne!(layout.resource_path(&a), layout.namespace_path(&b));
        }

        #[test]
        fn prop_namespace_paths_are_injective(a in address(), b in address()) {
            let layout = layout();
            if a != b {
                prop_assert_ne!(layout.namespace_path(&a), layout.namespace_path(&b));
            }
        }
    }
}
