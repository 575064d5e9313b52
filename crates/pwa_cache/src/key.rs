//! Render requests and the cache keys derived from them.

use std::fmt;
use std::str::FromStr;

use pwa_common::{AssetKind, Color, ContentHash, ParseHashError, ResizeMode};
use xxhash_rust::xxh3::Xxh3;

/// Version of the canonical request encoding. Bump to invalidate every key.
const KEY_SCHEMA_VERSION: u8 = 1;

/// A fully resolved description of one raster output.
///
/// Holds exactly the inputs that change the rendered bytes. Anything not in
/// here (output file name, HTML attributes, media query) must not influence
/// the cache key, so two devices with the same rendered size share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderRequest {
    /// The category this output belongs to.
    pub kind: AssetKind,
    /// Identity of the project, normally its canonical root path.
    pub project: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Background fill.
    pub background: Color,
    /// How the source is fitted into `width` x `height`.
    pub resize_mode: ResizeMode,
    /// Hash of the source image bytes.
    pub source: ContentHash,
}

/// Digest identifying a [`RenderRequest`] in the cache.
///
/// Computed with XXH3-128 over a canonical encoding: every field is written
/// in a fixed order, prefixed with a field tag, variable-length fields with
/// their length. Equal requests always produce equal keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(ContentHash);

impl CacheKey {
    /// Derives the key for a request.
    pub fn for_request(request: &RenderRequest) -> Self {
        let mut h = Xxh3::new();
        h.update(&[KEY_SCHEMA_VERSION]);

        h.update(&[b'k', request.kind.tag()]);

        h.update(b"p");
        h.update(&(request.project.len() as u64).to_le_bytes());
        h.update(request.project.as_bytes());

        h.update(b"w");
        h.update(&request.width.to_le_bytes());
        h.update(b"h");
        h.update(&request.height.to_le_bytes());

        h.update(b"b");
        h.update(&request.background.to_array());

        h.update(&[b'r', request.resize_mode.tag()]);

        h.update(b"s");
        h.update(request.source.as_bytes());

        Self(ContentHash::from_digest(h.digest128()))
    }

    /// The underlying hash.
    pub fn hash(&self) -> ContentHash {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.0)
    }
}

impl FromStr for CacheKey {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
