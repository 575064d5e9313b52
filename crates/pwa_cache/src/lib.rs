//! Content-addressable cache for rendered image assets.
//!
//! Rendered bytes are stored under a key derived from every input that affects
//! them (see [`RenderRequest`]). Each generation run records the keys it used
//! per asset category, and a sweep at the end of the run evicts everything in
//! that category the run did not touch.

#![warn(missing_docs)]

pub mod artifact;
pub mod cache;
pub mod error;
pub mod key;

pub use artifact::ArtifactStore;
pub use cache::{AssetCache, CacheRun};
pub use error::CacheError;
pub use key::{CacheKey, RenderRequest};
