//! Shared foundational types used across the PWA asset toolchain.
//!
//! This crate provides content hashing, the asset category kinds that
//! partition the image cache, and the render options (background color,
//! resize mode) that both configuration and cache keys are built from.

#![warn(missing_docs)]

pub mod color;
pub mod hash;
pub mod kind;
pub mod resize;

pub use color::{Color, ParseColorError};
pub use hash::{ContentHash, ParseHashError};
pub use kind::{AssetKind, ParseKindError};
pub use resize::ResizeMode;
