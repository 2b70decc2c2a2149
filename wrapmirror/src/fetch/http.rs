//! Blocking HTTP fetcher.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::{ensure_parent, ResourceFetcher};
use crate::error::{MirrorError, MirrorResult};

/// Default timeout for HTTP requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("wrapmirror/", env!("CARGO_PKG_VERSION"));

/// Fetches resources over HTTP(S) with a blocking client.
///
/// Every fetch is a plain GET that truncates the destination, so a second
/// run over the same tree rewrites each file from scratch.
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> MirrorResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> MirrorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MirrorError::HttpClient(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request_error(&self, url: &str, e: reqwest::Error) -> MirrorError {
        if e.is_timeout() {
            MirrorError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            MirrorError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }

    /// Map a body read failure, keeping timeouts distinct.
    fn read_error(&self, url: &str, e: io::Error) -> MirrorError {
        let timed_out = e.kind() == io::ErrorKind::TimedOut
            || e
                .get_ref()
                .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
                .is_some_and(reqwest::Error::is_timeout);

        if timed_out {
            MirrorError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            MirrorError::DownloadFailed {
                url: url.to_string(),
                reason: format!("Read error: {}", e),
            }
        }
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> MirrorResult<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        ensure_parent(dest)?;
        let write_failed = |e| MirrorError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        };
        let file = File::create(dest).map_err(write_failed)?;

        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut downloaded = 0u64;

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| self.read_error(url, e))?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(write_failed)?;
            downloaded += bytes_read as u64;
        }

        writer.flush().map_err(write_failed)?;

        debug!(url, path = %dest.display(), bytes = downloaded, "fetched");
        Ok(downloaded)
    }
}
