//! On-disk storage of rendered cache entries.
//!
//! Entries live at `<cache_dir>/<kind dir>/<key>.img`. Each file starts with a
//! 4-byte little-endian header length, then a bincode-encoded header carrying
//! magic bytes, the format version, the asset kind and a checksum of the
//! payload, then the payload itself (the rendered image bytes).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use pwa_common::{AssetKind, ContentHash};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::key::CacheKey;

/// Magic bytes identifying a cache entry.
const ENTRY_MAGIC: [u8; 4] = *b"PWAC";

/// Current entry format version. Increment on breaking changes to
/// the header or payload format.
const ENTRY_FORMAT_VERSION: u32 = 1;

/// File extension of committed entries.
const ENTRY_EXT: &str = "img";

/// File extension of entries being written.
const TEMP_EXT: &str = "tmp";

/// Upper bound on an encoded header. Real headers are well under 100 bytes;
/// the bound also caps allocations made while decoding a damaged one.
const MAX_HEADER_LEN: usize = 1024;

/// Header prepended to every cache entry for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryHeader {
    /// Magic bytes: must be `b"PWAC"`.
    pub magic: [u8; 4],

    /// Entry format version.
    pub format_version: u32,

    /// Tool version that produced this entry.
    pub tool_version: String,

    /// Category the entry belongs to.
    pub kind: AssetKind,

    /// Content hash of the payload (for integrity checks).
    pub checksum: ContentHash,
}

/// Content-addressed store for rendered entries.
///
/// Knows nothing about touched sets or rendering; it only reads, writes,
/// lists and garbage-collects validated entry files.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// Root cache directory.
    cache_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a new store rooted at the given cache directory.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    /// Returns the root cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the directory holding all entries of a kind.
    pub fn kind_dir(&self, kind: AssetKind) -> PathBuf {
        self.cache_dir.join(kind.dir_name())
    }

    /// Ensures that the directory for the given kind exists.
    pub fn ensure_dirs(&self, kind: AssetKind) -> Result<(), CacheError> {
        let dir = self.kind_dir(kind);
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            path: dir,
            source: e,
        })
    }

    /// Returns the file path for the entry with the given key.
    pub fn entry_path(&self, kind: AssetKind, key: &CacheKey) -> PathBuf {
        self.kind_dir(kind).join(format!("{key}.{ENTRY_EXT}"))
    }

    /// Writes an entry and returns its path.
    ///
    /// The file is first written under a temporary name and then renamed into
    /// place, so a reader never observes a half-written entry.
    pub fn write_entry(
        &self,
        kind: AssetKind,
        key: &CacheKey,
        data: &[u8],
        tool_version: &str,
    ) -> Result<PathBuf, CacheError> {
        self.ensure_dirs(kind)?;

        let header = EntryHeader {
            magic: ENTRY_MAGIC,
            format_version: ENTRY_FORMAT_VERSION,
            tool_version: tool_version.to_string(),
            kind,
            checksum: ContentHash::from_bytes(data),
        };
        let output = encode_entry(&header, data)?;

        let path = self.entry_path(kind, key);
        let tmp = self.kind_dir(kind).join(format!("{key}.{TEMP_EXT}"));
        std::fs::write(&tmp, &output).map_err(|e| CacheError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(CacheError::Io {
                path: path.clone(),
                source: e,
            });
        }

        Ok(path)
    }

    /// Reads an entry, validating its header.
    ///
    /// Returns `Ok(None)` when no entry exists for the key and `Err` when one
    /// exists but cannot be trusted (unreadable, truncated, wrong magic,
    /// version, kind or checksum). Callers treat both as a miss.
    pub fn read_entry(
        &self,
        kind: AssetKind,
        key: &CacheKey,
    ) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(kind, key);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io { path, source: e }),
        };

        let invalid = |reason: &str| CacheError::InvalidHeader {
            path: path.clone(),
            reason: reason.to_string(),
        };

        if raw.len() < 4 {
            return Err(invalid("file shorter than header length prefix"));
        }
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&raw[..4]);
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        if header_len > MAX_HEADER_LEN {
            return Err(invalid("header length exceeds limit"));
        }
        if raw.len() < 4 + header_len {
            return Err(invalid("header extends past end of file"));
        }

        let config = bincode::config::standard().with_limit::<MAX_HEADER_LEN>();
        let header: EntryHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], config)
                .map_err(|e| invalid(&e.to_string()))?
                .0;

        if header.magic != ENTRY_MAGIC {
            return Err(invalid("missing magic bytes"));
        }
        if header.format_version != ENTRY_FORMAT_VERSION {
            return Err(CacheError::VersionMismatch {
                path,
                expected: ENTRY_FORMAT_VERSION,
                actual: header.format_version,
            });
        }
        if header.kind != kind {
            return Err(CacheError::KindMismatch {
                path,
                expected: kind,
                actual: header.kind,
            });
        }

        let payload = &raw[4 + header_len..];
        let actual = ContentHash::from_bytes(payload);
        if actual != header.checksum {
            return Err(CacheError::ChecksumMismatch {
                path,
                expected: header.checksum.to_string(),
                actual: actual.to_string(),
            });
        }

        Ok(Some(payload.to_vec()))
    }

    /// Lists the keys of all committed entries of a kind, sorted.
    ///
    /// Files whose stem is not a valid key are skipped.
    pub fn list(&self, kind: AssetKind) -> Result<Vec<CacheKey>, CacheError> {
        let mut keys: Vec<CacheKey> = self
            .entry_files(kind)?
            .into_iter()
            .filter(|file| file.committed)
            .filter_map(|file| file.key)
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Removes entries of a kind whose key is not in `live`.
    ///
    /// Entry files with an unparseable name can never be live and are removed
    /// too, as are leftover temporary files of dead keys. A file that cannot be deleted is logged and skipped; the returned
    /// count only includes files actually removed. Fails only when the kind's
    /// directory cannot be listed.
    pub fn gc(&self, kind: AssetKind, live: &HashSet<CacheKey>) -> Result<usize, CacheError> {
        let mut removed = 0;
        for EntryFile { path, key, .. } in self.entry_files(kind)? {
            if key.is_some_and(|k| live.contains(&k)) {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove stale cache entry");
                }
            }
        }
        Ok(removed)
    }

    /// Collects every `*.img` and `*.tmp` file of a kind.
    fn entry_files(&self, kind: AssetKind) -> Result<Vec<EntryFile>, CacheError> {
        let dir = self.kind_dir(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            let committed = match path.extension().and_then(|e| e.to_str()) {
                Some(ENTRY_EXT) => true,
                Some(TEMP_EXT) => false,
                _ => continue,
            };
            let key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<CacheKey>().ok());
            files.push(EntryFile {
                path,
                key,
                committed,
            });
        }
        Ok(files)
    }
}

/// A file found in a kind directory.
struct EntryFile {
    path: PathBuf,
    /// Parsed from the file stem; `None` for foreign names.
    key: Option<CacheKey>,
    /// `false` for a temporary file left by an interrupted write.
    committed: bool,
}

/// Serializes a header and payload into the on-disk entry layout.
fn encode_entry(header: &EntryHeader, data: &[u8]) -> Result<Vec<u8>, CacheError> {
    let header_bytes = bincode::serde::encode_to_vec(header, bincode::config::standard())
        .map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;

    let header_len = header_bytes.len() as u32;
    let mut output = Vec::with_capacity(4 + header_bytes.len() + data.len());
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(data);
    Ok(output)
}
