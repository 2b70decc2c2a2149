//! SHA-256 verification of mirrored archives.
//!
//! A mismatch is never recoverable: the orchestrator aborts the run rather
//! than leave a corrupt archive in the tree.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{MirrorError, MirrorResult};

/// Buffer size for reading files during checksum calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Lowercase hexadecimal SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Calculate SHA-256 checksum of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn calculate_file_checksum(path: &Path) -> MirrorResult<String> {
    let read_failed = |e| MirrorError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = File::open(path).map_err(read_failed)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(read_failed)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Lexical check that `value` is a 64-digit hex SHA-256 digest.
pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Verify that `bytes` hash to `expected`.
///
/// `path` only labels the error. Hex comparison is case-insensitive.
pub fn verify_bytes(bytes: &[u8], expected: &str, path: &Path) -> MirrorResult<()> {
    compare(sha256_hex(bytes), expected, path)
}

/// Verify that the file at `path` hashes to `expected`.
pub fn verify_file(path: &Path, expected: &str) -> MirrorResult<()> {
    compare(calculate_file_checksum(path)?, expected, path)
}

fn compare(actual: String, expected: &str, path: &Path) -> MirrorResult<()> {
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(MirrorError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_sha256_hex() {
        assert_eq!(sha256_hex(b"hello world"), HELLO_WORLD);
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_calculate_file_checksum() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.txt");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"hello world").unwrap();

        assert_eq!(calculate_file_checksum(&file_path).unwrap(), HELLO_WORLD);
    }

    #[test]
    fn test_calculate_nonexistent_file() {
        let result = calculate_file_checksum(Path::new("/nonexistent/file.txt"));
        assert!(matches!(result, Err(MirrorError::ReadFailed { .. })));
    }

    #[test]
    fn test_large_file_matches_in_memory_digest() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("large.bin");

        // Larger than the read buffer
        let data = vec![0xABu8; 100_000];
        File::create(&file_path).unwrap().write_all(&data).unwrap();

        assert_eq!(
            calculate_file_checksum(&file_path).unwrap(),
            sha256_hex(&data)
        );
    }

    #[test]
    fn test_verify_bytes_match() {
        assert!(verify_bytes(b"hello world", HELLO_WORLD, Path::new("x")).is_ok());
        assert!(verify_bytes(
            b"hello world",
            &HELLO_WORLD.to_uppercase(),
            Path::new("x")
        )
        .is_ok());
    }

    #[test]
    fn test_verify_file_mismatch() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("get_zip");
        File::create(&file_path)
            .unwrap()
            .write_all(b"tampered")
            .unwrap();

        match verify_file(&file_path, HELLO_WORLD) {
            Err(MirrorError::ChecksumMismatch {
                path,
                expected,
                actual,
            }) => {
                assert_eq!(path, file_path);
                assert_eq!(expected, HELLO_WORLD);
                assert_eq!(actual, sha256_hex(b"tampered"));
            }
            other => panic!("Expected ChecksumMismatch error, got {:?}", other),
        }
    }

    #[test]
    fn test_is_sha256_hex() {
        assert!(is_sha256_hex(HELLO_WORLD));
        assert!(is_sha256_hex(&HELLO_WORLD.to_uppercase()));
        assert!(!is_sha256_hex("abc123"));
        assert!(!is_sha256_hex(&HELLO_WORLD.replace('b', "z")));
    }
}
