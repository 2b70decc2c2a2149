//! Mirror traversal.
//!
//! [`Mirror`] walks the API from the project catalog down to every archive:
//!
//! ```text
//! projects                      catalog
//!   └── projects/<p>            version list
//!         ├── .../<b>/<r>/get_wrap   descriptor (+ <p>.wrap, <p>-<b>-<r>.wrap)
//!         ├── .../<b>/<r>/get_zip    archive (+ declared filename), verified
//!         └── query/get_latest/<p>   only if <p> has versions
//! ```
//!
//! Execution is strictly sequential. Each resource is written to its
//! canonical path before the next request is made, and nothing is rolled
//! back when a later step fails; re-running rewrites the same paths.

mod config;
mod report;

pub use config::{MirrorConfig, VersionListPolicy, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
pub use report::MirrorReport;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::api::{ArchiveUrlCheck, Catalog, Endpoints, Version, VersionList};
use crate::checksum;
use crate::error::{MirrorError, MirrorResult};
use crate::fetch::{ensure_parent, HttpFetcher, ResourceFetcher};
use crate::layout::{
    versioned_wrap_alias_name, wrap_alias_name, ApiAddress, ArtifactEndpoint, MirrorLayout,
};
use crate::wrap::WrapDescriptor;

/// Drives one mirror run over an injected [`ResourceFetcher`].
#[derive(Debug)]
pub struct Mirror<F> {
    fetcher: F,
    layout: MirrorLayout,
    endpoints: Endpoints,
    version_list_policy: VersionListPolicy,
}

impl Mirror<HttpFetcher> {
    /// Create a mirror fetching over HTTP with the configured timeout.
    pub fn from_config(config: &MirrorConfig) -> MirrorResult<Self> {
        let fetcher = HttpFetcher::with_timeout(config.timeout)?;
        Ok(Self::new(config, fetcher))
    }
}

impl<F: ResourceFetcher> Mirror<F> {
    /// Create a mirror using `fetcher` for every download.
    pub fn new(config: &MirrorConfig, fetcher: F) -> Self {
        Self {
            fetcher,
            layout: MirrorLayout::new(&config.output_dir, &config.api_version),
            endpoints: Endpoints::new(config.base_url.clone(), config.api_version.clone()),
            version_list_policy: config.version_list_policy,
        }
    }

    /// The on-disk layout this mirror writes.
    pub fn layout(&self) -> &MirrorLayout {
        &self.layout
    }

    /// Mirror the whole API.
    ///
    /// # Errors
    ///
    /// Any returned error is fatal for the run: transport and filesystem
    /// failures, an unparsable catalog, a wrap whose archive URL does not
    /// belong to its address, or an archive failing checksum verification.
    /// Files written before the failure stay on disk.
    pub fn run(&self) -> MirrorResult<MirrorReport> {
        let root = self.layout.root();
        fs::create_dir_all(root).map_err(|e| MirrorError::CreateDirFailed {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut report = MirrorReport::default();
        let catalog = self.mirror_catalog(&mut report)?;
        info!(projects = catalog.projects.len(), "Catalog fetched");

        for project in &catalog.projects {
            self.mirror_project(project, &mut report)?;
        }

        Ok(report)
    }

    fn mirror_catalog(&self, report: &mut MirrorReport) -> MirrorResult<Catalog> {
        let path = self.fetch_resource(&ApiAddress::catalog(), report)?;
        Catalog::parse(&read_file(&path)?, &path)
    }

    fn mirror_project(&self, project: &str, report: &mut MirrorReport) -> MirrorResult<()> {
        info!(project, "Project");

        let path = self.fetch_resource(&ApiAddress::project(project)?, report)?;
        let versions = match VersionList::parse(&read_file(&path)?, project, &path) {
            Ok(list) => list.versions,
            Err(e) => match self.version_list_policy {
                VersionListPolicy::Skip => {
                    warn!(project, error = %e, "Skipping project with unreadable version list");
                    report.projects_skipped.push(project.to_string());
                    return Ok(());
                }
                VersionListPolicy::Abort => return Err(e),
            },
        };

        for version in &versions {
            self.mirror_version(project, version, report)?;
        }

        if !versions.is_empty() {
            self.fetch_resource(&ApiAddress::latest(project)?, report)?;
        }

        report.projects_mirrored += 1;
        Ok(())
    }

    fn mirror_version(
        &self,
        project: &str,
        version: &Version,
        report: &mut MirrorReport,
    ) -> MirrorResult<()> {
        let Version { branch, revision } = version;
        let revision = *revision;
        info!(project, branch = %branch, revision, "Version");

        let wrap_address =
            ApiAddress::artifact(project, branch, revision, ArtifactEndpoint::GetWrap)?;
        let wrap_path = self.fetch_resource(&wrap_address, report)?;

        let wrap_aliases = [
            wrap_alias_name(project),
            versioned_wrap_alias_name(project, branch, revision),
        ];
        for alias in &wrap_aliases {
            let alias_path = self
                .layout
                .version_alias_path(project, branch, revision, alias)?;
            copy_file(&wrap_path, &alias_path)?;
        }

        let wrap = WrapDescriptor::from_file(&wrap_path)?;
        if wrap_aliases.contains(&wrap.archive_filename) {
            return Err(MirrorError::MalformedDescriptor {
                path: wrap_path,
                reason: format!(
                    "patch_filename {} collides with a wrap alias",
                    wrap.archive_filename
                ),
            });
        }

        let zip_address =
            ApiAddress::artifact(project, branch, revision, ArtifactEndpoint::GetZip)?;
        match self
            .endpoints
            .check_archive_url(&zip_address, &wrap.archive_url)
        {
            ArchiveUrlCheck::Canonical => {}
            ArchiveUrlCheck::Insecure => {
                warn!(
                    project,
                    file = %wrap.archive_filename,
                    url = %wrap.archive_url,
                    "http zip url in wrap file"
                );
                report.insecure_archive_urls += 1;
            }
            ArchiveUrlCheck::Mismatch { expected } => {
                return Err(MirrorError::ArchiveUrlMismatch {
                    project: project.to_string(),
                    branch: branch.clone(),
                    revision,
                    expected,
                    declared: wrap.archive_url,
                });
            }
        }

        let zip_path = self.fetch_resource(&zip_address, report)?;
        let zip_alias =
            self.layout
                .version_alias_path(project, branch, revision, &wrap.archive_filename)?;
        copy_file(&zip_path, &zip_alias)?;

        checksum::verify_file(&zip_path, &wrap.archive_checksum)?;
        report.archives_verified += 1;
        Ok(())
    }

    /// Fetch `address` to its resource path.
    fn fetch_resource(
        &self,
        address: &ApiAddress,
        report: &mut MirrorReport,
    ) -> MirrorResult<PathBuf> {
        let url = self.endpoints.url(address);
        let path = self.layout.resource_path(address);
        info!(url = %url, path = %path.display(), "Downloading");

        let bytes = self.fetcher.fetch(&url, &path)?;
        report.record_fetch(bytes);
        Ok(path)
    }
}

fn read_file(path: &Path) -> MirrorResult<Vec<u8>> {
    fs::read(path).map_err(|e| MirrorError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copy `from` over `to`, creating the destination directory.
fn copy_file(from: &Path, to: &Path) -> MirrorResult<()> {
    ensure_parent(to)?;
    fs::copy(from, to).map_err(|e| MirrorError::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
