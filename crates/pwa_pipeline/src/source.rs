//! What a generation call is asked to produce, and from what.

use std::fmt;
use std::str::FromStr;

use pwa_common::AssetKind;
use pwa_config::IconSpec;

use crate::error::PipelineError;

/// A kind accepted by [`AssetPipeline::generate`](crate::AssetPipeline::generate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// A cached raster category.
    Asset(AssetKind),
    /// The web-app manifest.
    Manifest,
}

impl FromStr for RequestKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "manifest" {
            return Ok(RequestKind::Manifest);
        }
        s.parse::<AssetKind>()
            .map(RequestKind::Asset)
            .map_err(|_| PipelineError::InvalidRequestKind {
                kind: s.to_string(),
            })
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Asset(kind) => kind.fmt(f),
            RequestKind::Manifest => f.write_str("manifest"),
        }
    }
}

/// One explicitly listed splash image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplashIcon {
    /// Source and transform options.
    pub spec: IconSpec,
    /// Rendered width.
    pub width: u32,
    /// Rendered height.
    pub height: u32,
    /// Media query of the generated tag.
    pub media: String,
}

/// The icon input of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// One source, expanded by the pipeline into the category's sizes.
    Single(IconSpec),
    /// Splash images listed one by one, used verbatim and in order.
    Expanded(Vec<SplashIcon>),
}

impl From<IconSpec> for IconSource {
    fn from(spec: IconSpec) -> Self {
        IconSource::Single(spec)
    }
}

impl From<Vec<SplashIcon>> for IconSource {
    fn from(icons: Vec<SplashIcon>) -> Self {
        IconSource::Expanded(icons)
    }
}
