//! Summary of a completed mirror run.

use std::fmt;

/// Counters accumulated while mirroring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Projects whose versions were fully mirrored.
    pub projects_mirrored: usize,

    /// Projects skipped because their version list could not be parsed.
    pub projects_skipped: Vec<String>,

    /// Archives fetched and checked against their wrap's checksum.
    pub archives_verified: usize,

    /// Wraps declaring the plain-HTTP variant of their archive URL.
    pub insecure_archive_urls: usize,

    /// Upstream resources fetched.
    pub files_fetched: usize,

    /// Bytes fetched from upstream.
    pub bytes_fetched: u64,
}

impl MirrorReport {
    pub(crate) fn record_fetch(&mut self, bytes: u64) {
        self.files_fetched += 1;
        self.bytes_fetched += bytes;
    }
}

impl fmt::Display for MirrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} projects mirrored, {} skipped, {} archives verified, {} files ({} bytes) fetched",
            self.projects_mirrored,
            self.projects_skipped.len(),
            self.archives_verified,
            self.files_fetched,
            self.bytes_fetched
        )?;
        if self.insecure_archive_urls > 0 {
            write!(
                f,
                ", {} wraps with http archive urls",
                self.insecure_archive_urls
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fetch() {
        let mut report = MirrorReport::default();
        report.record_fetch(10);
        report.record_fetch(5);
        assert_eq!(report.files_fetched, 2);
        assert_eq!(report.bytes_fetched, 15);
    }

    #[test]
    fn test_display() {
        let report = MirrorReport {
            projects_mirrored: 2,
            projects_skipped: vec!["broken".to_string()],
            archives_verified: 3,
            insecure_archive_urls: 0,
            files_fetched: 12,
            bytes_fetched: 4096,
        };
        assert_eq!(
            report.to_string(),
            "2 projects mirrored, 1 skipped, 3 archives verified, 12 files (4096 bytes) fetched"
        );

        let report = MirrorReport {
            insecure_archive_urls: 1,
            ..report
        };
        assert!(report.to_string().ends_with("1 wraps with http archive urls"));
    }
}
