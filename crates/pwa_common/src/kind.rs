//! Asset category kinds.
//!
//! Every rendered image belongs to exactly one category. The category decides
//! which fixed size set is generated and partitions the on-disk cache so that
//! sweeping one category never evicts another's entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category an image asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    /// Browser tab icons plus the `favicon.ico` container.
    Favicon,
    /// Home-screen touch icon (`apple-touch-icon`).
    PlatformIcon,
    /// Icons embedded into the web-app manifest (`chrome-icon`).
    ManifestIcon,
    /// Per-device, per-orientation startup images.
    Splash,
}

impl AssetKind {
    /// All kinds in a fixed order.
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Favicon,
        AssetKind::PlatformIcon,
        AssetKind::ManifestIcon,
        AssetKind::Splash,
    ];

    /// The canonical request name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            AssetKind::Favicon => "favicon",
            AssetKind::PlatformIcon => "platform-icon",
            AssetKind::ManifestIcon => "manifest-icon",
            AssetKind::Splash => "splash",
        }
    }

    /// Directory name used for this kind inside the cache and the output tree.
    pub fn dir_name(self) -> &'static str {
        match self {
            AssetKind::Favicon => "favicon",
            AssetKind::PlatformIcon => "apple-touch-icon",
            AssetKind::ManifestIcon => "chrome-icon",
            AssetKind::Splash => "apple-touch-startup-image",
        }
    }

    /// Stable one-byte tag used when hashing requests of this kind.
    pub fn tag(self) -> u8 {
        match self {
            AssetKind::Favicon => 1,
            AssetKind::PlatformIcon => 2,
            AssetKind::ManifestIcon => 3,
            AssetKind::Splash => 4,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognized kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset kind '{0}'")]
pub struct ParseKindError(pub String);

impl FromStr for AssetKind {
    type Err = ParseKindError;

    /// Accepts the canonical names plus the legacy aliases
    /// `safari-icon` and `chrome-icon`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "favicon" => Ok(AssetKind::Favicon),
            "platform-icon" | "safari-icon" | "apple-touch-icon" => Ok(AssetKind::PlatformIcon),
            "manifest-icon" | "chrome-icon" => Ok(AssetKind::ManifestIcon),
            "splash" | "apple-touch-startup-image" => Ok(AssetKind::Splash),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}
