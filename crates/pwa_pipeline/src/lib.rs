//! Device-aware generation of PWA image assets.
//!
//! An [`AssetPipeline`] turns a logical request (favicon, platform touch
//! icon, manifest icons or splash screens) plus a source icon into the list
//! of raster files a web app needs, together with the `<link>` tags and
//! manifest entries that reference them. Every raster goes through the
//! content-addressable [`pwa_cache::AssetCache`], so unchanged inputs are
//! never rendered twice and stale entries are swept after each run.

#![warn(missing_docs)]

pub mod backend;
pub mod devices;
pub mod error;
pub mod manifest;
pub mod media;
pub mod output;
pub mod pipeline;
pub mod source;

pub use backend::{
    IcoAssembler, IcoOptions, ImageBackend, ImageIcoAssembler, RenderBackend, RenderParams,
    SourceImage,
};
pub use devices::{
    DeviceEntry, DeviceFilter, DeviceMatrix, DeviceProfile, Orientation, OrientationFilter,
    SplashTarget,
};
pub use error::{PipelineError, RenderError};
pub use manifest::{generate_manifest_json, WebManifest};
pub use media::selector_for;
pub use output::{AssetOutput, HtmlTag, LinkAttributes, ManifestIcon};
pub use pipeline::{
    AssetPipeline, ProjectOptions, FAVICON_SIZES, MANIFEST_ICON_SIZES, PLATFORM_ICON_SIZES,
};
pub use source::{IconSource, RequestKind, SplashIcon};
