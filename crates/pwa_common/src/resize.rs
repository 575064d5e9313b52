//! How a source image is fitted into a target box.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy for fitting the source image into the requested width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Scale to fill the box, cropping the overflow (centered).
    Cover,
    /// Scale to fit inside the box, padding with the background color.
    #[default]
    Contain,
    /// Scale each axis independently to exactly the box size.
    Stretch,
}

impl ResizeMode {
    /// Stable one-byte tag used when hashing requests.
    pub fn tag(self) -> u8 {
        match self {
            ResizeMode::Cover => 1,
            ResizeMode::Contain => 2,
            ResizeMode::Stretch => 3,
        }
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResizeMode::Cover => "cover",
            ResizeMode::Contain => "contain",
            ResizeMode::Stretch => "stretch",
        })
    }
}
