//! Wrap descriptor parsing.
//!
//! A wrap file is INI text. The mirror only reads the patch archive entries of
//! the `[wrap-file]` section:
//!
//! ```ini
//! [wrap-file]
//! directory = zlib-1.2.13
//! source_url = https://zlib.net/fossils/zlib-1.2.13.tar.gz
//! source_filename = zlib-1.2.13.tar.gz
//! source_hash = b3a24de97a8fdbc835b9833169501030b8977031bcb54b3b3ac13740f846ab30
//! patch_url = https://wrapdb.mesonbuild.com/v1/projects/zlib/1.2.13/1/get_zip
//! patch_filename = zlib-1.2.13-1-wrap.zip
//! patch_hash = 3a6d7a8b...
//!
//! [provide]
//! zlib = zlib_dep
//! ```
//!
//! Key order, unrelated keys and unrelated sections do not matter.

use std::fs;
use std::path::Path;

use ini::{Ini, ParseOption, Properties};

use crate::checksum::is_sha256_hex;
use crate::error::{MirrorError, MirrorResult};
use crate::layout::validate_segment;

/// Section holding the archive entries.
pub const WRAP_SECTION: &str = "wrap-file";

const PATCH_URL: &str = "patch_url";
const PATCH_FILENAME: &str = "patch_filename";
const PATCH_HASH: &str = "patch_hash";

/// Archive metadata declared by a wrap descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapDescriptor {
    /// Where the descriptor says the archive lives.
    pub archive_url: String,
    /// File name the archive is published under.
    pub archive_filename: String,
    /// Expected SHA-256 of the archive, lowercase hex.
    pub archive_checksum: String,
}

impl WrapDescriptor {
    /// Parse descriptor bytes. `path` identifies the source in errors.
    pub fn parse(bytes: &[u8], path: &Path) -> MirrorResult<Self> {
        let malformed = |reason: String| MirrorError::MalformedDescriptor {
            path: path.to_path_buf(),
            reason,
        };

        let text = std::str::from_utf8(bytes)
            .map_err(|e| malformed(format!("not valid UTF-8: {}", e)))?;

        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options).map_err(|e| malformed(e.to_string()))?;

        let section = ini
            .section(Some(WRAP_SECTION))
            .ok_or_else(|| malformed(format!("missing [{}] section", WRAP_SECTION)))?;

        let required = |key: &str| {
            lookup(section, key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| malformed(format!("missing required key '{}'", key)))
        };

        let archive_url = required(PATCH_URL)?;
        let archive_filename = required(PATCH_FILENAME)?;
        let archive_checksum = required(PATCH_HASH)?;

        validate_segment(&archive_filename)
            .map_err(|e| malformed(format!("unusable {}: {}", PATCH_FILENAME, e)))?;

        if !is_sha256_hex(&archive_checksum) {
            return Err(malformed(format!(
                "{} is not a hex SHA-256 digest: {}",
                PATCH_HASH, archive_checksum
            )));
        }

        Ok(Self {
            archive_url,
            archive_filename,
            archive_checksum: archive_checksum.to_ascii_lowercase(),
        })
    }

    /// Read and parse a descriptor file.
    pub fn from_file(path: &Path) -> MirrorResult<Self> {
        let bytes = fs::read(path).map_err(|e| MirrorError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&bytes, path)
    }
}

/// Case-insensitive key lookup, trimming the value.
fn lookup(section: &Properties, key: &str) -> Option<String> {
    section
        .iter()
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim().to_string())
}
