//! Error types for cache operations.

use std::path::PathBuf;

use pwa_common::AssetKind;

/// Errors that can occur during cache operations.
///
/// None of these ever escape [`AssetCache`](crate::AssetCache): a bad entry
/// is a cache miss, a failed write or delete is logged and skipped. The enum
/// exists for propagation inside the cache subsystem and for log messages.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An entry file has an invalid, truncated or missing header.
    #[error("invalid cache entry header in {path}: {reason}")]
    InvalidHeader {
        /// The entry file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The stored checksum does not match the computed checksum of the payload.
    #[error("checksum mismatch in {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The entry file path.
        path: PathBuf,
        /// The expected checksum from the header.
        expected: String,
        /// The actual checksum computed from the payload.
        actual: String,
    },

    /// The entry format version does not match the current version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The entry file path.
        path: PathBuf,
        /// The expected format version.
        expected: u32,
        /// The actual format version found in the file.
        actual: u32,
    },

    /// The entry header names a different asset category than its directory.
    #[error("kind mismatch in {path}: expected {expected}, got {actual}")]
    KindMismatch {
        /// The entry file path.
        path: PathBuf,
        /// The category the entry was looked up under.
        expected: AssetKind,
        /// The category recorded in the header.
        actual: AssetKind,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/tmp/cache/favicon/abc.img"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("abc.img"));
    }

    #[test]
    fn invalid_header_display() {
        let err = CacheError::InvalidHeader {
            path: PathBuf::from("bad.img"),
            reason: "missing magic bytes".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid cache entry header"));
        assert!(msg.contains("missing magic bytes"));
    }

    #[test]
    fn checksum_mismatch_display() {
        let err = CacheError::ChecksumMismatch {
            path: PathBuf::from("file.img"),
            expected: "aabb".to_string(),
            actual: "ccdd".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("checksum mismatch"));
        assert!(msg.contains("aabb"));
        assert!(msg.contains("ccdd"));
    }

    #[test]
    fn version_mismatch_display() {
        let err = CacheError::VersionMismatch {
            path: PathBuf::from("old.img"),
            expected: 2,
            actual: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("version mismatch"));
        assert!(msg.contains("expected 2"));
        assert!(msg.contains("got 1"));
    }

    #[test]
    fn kind_mismatch_display() {
        let err = CacheError::KindMismatch {
            path: PathBuf::from("moved.img"),
            expected: AssetKind::Splash,
            actual: AssetKind::Favicon,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected splash"));
        assert!(msg.contains("got favicon"));
    }

    #[test]
    fn serialization_error_display() {
        let err = CacheError::Serialization {
            reason: "invalid bincode data".to_string(),
        };
        assert!(err.to_string().contains("invalid bincode data"));
    }
}
