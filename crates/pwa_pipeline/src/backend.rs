//! Image-processing backends: raster rendering and ICO assembly.
//!
//! Both are traits so tests and embedders can swap them. The defaults are
//! built on the `image` crate and always emit PNG.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgba, RgbaImage};
use pwa_common::{Color, ContentHash, ResizeMode};

use crate::error::RenderError;

/// Frame sizes of an assembled `favicon.ico`.
pub const ICO_SIZES: [u32; 3] = [16, 32, 48];

/// Largest frame the ICO format can describe.
const ICO_MAX_SIZE: u32 = 256;

/// Source image bytes read once per generation call.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Resolved path the bytes were read from.
    pub path: PathBuf,
    /// Raw, still-encoded file contents.
    pub bytes: Arc<[u8]>,
    /// Hash of `bytes`; part of every cache key.
    pub fingerprint: ContentHash,
}

impl SourceImage {
    /// Wraps already-loaded bytes.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let fingerprint = ContentHash::from_bytes(&bytes);
        Self {
            path: path.into(),
            bytes: bytes.into(),
            fingerprint,
        }
    }

    /// Reads and fingerprints the file at `path`.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path, bytes))
    }
}

/// Target of a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParams {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Fill behind the source.
    pub background: Color,
    /// How the source is fitted.
    pub resize_mode: ResizeMode,
}

/// Turns a source image into encoded raster bytes.
///
/// Implementations must be deterministic: equal inputs give equal bytes.
/// They are called from the rayon pool, hence `Send + Sync`.
pub trait RenderBackend: Send + Sync {
    /// Renders `source` at the size and with the options in `params`.
    fn render(&self, source: &SourceImage, params: &RenderParams) -> Result<Vec<u8>, RenderError>;
}

/// Options for [`IcoAssembler::assemble`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IcoOptions {
    /// Derive every standard ICO size from the largest input instead of
    /// using each input at its own size.
    pub resize: bool,
}

/// Packs raster images into a multi-resolution ICO container.
pub trait IcoAssembler: Send + Sync {
    /// Builds an ICO file from encoded images.
    fn assemble(&self, images: &[Vec<u8>], options: IcoOptions) -> Result<Vec<u8>, RenderError>;
}

/// Default renderer backed by the `image` crate.
///
/// Resampling uses Lanczos3. `cover` fills the target and crops the
/// overflow around the centre, `contain` fits the whole source and centres
/// it on the background, `stretch` ignores the aspect ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBackend;

impl RenderBackend for ImageBackend {
    fn render(&self, source: &SourceImage, params: &RenderParams) -> Result<Vec<u8>, RenderError> {
        let (width, height) = (params.width, params.height);
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let img = decode(&source.bytes)?;

        let fitted = match params.resize_mode {
            ResizeMode::Cover => img.resize_to_fill(width, height, FilterType::Lanczos3),
            ResizeMode::Contain => img.resize(width, height, FilterType::Lanczos3),
            ResizeMode::Stretch => img.resize_exact(width, height, FilterType::Lanczos3),
        }
        .to_rgba8();

        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(params.background.to_array()));
        let x = (width - fitted.width().min(width)) / 2;
        let y = (height - fitted.height().min(height)) / 2;
        imageops::overlay(&mut canvas, &fitted, i64::from(x), i64::from(y));

        encode_png(&DynamicImage::ImageRgba8(canvas))
    }
}

/// Default ICO assembler backed by `image::codecs::ico`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageIcoAssembler;

impl IcoAssembler for ImageIcoAssembler {
    fn assemble(&self, images: &[Vec<u8>], options: IcoOptions) -> Result<Vec<u8>, RenderError> {
        let decoded = images
            .iter()
            .map(|bytes| decode(bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let frames: Vec<DynamicImage> = if options.resize {
            let Some(largest) = decoded.iter().max_by_key(|img| img.width() * img.height()) else {
                return Err(RenderError::InvalidDimensions {
                    width: 0,
                    height: 0,
                });
            };
            ICO_SIZES
                .iter()
                .map(|&size| largest.resize_exact(size, size, FilterType::Lanczos3))
                .collect()
        } else {
            decoded
        };

        if frames.is_empty() {
            return Err(RenderError::InvalidDimensions {
                width: 0,
                height: 0,
            });
        }

        let mut pngs = Vec::with_capacity(frames.len());
        for frame in &frames {
            let (width, height) = (frame.width(), frame.height());
            if width > ICO_MAX_SIZE || height > ICO_MAX_SIZE {
                return Err(RenderError::InvalidDimensions { width, height });
            }
            pngs.push((encode_png(frame)?, width, height));
        }

        let ico_frames = pngs
            .iter()
            .map(|(png, width, height)| {
                IcoFrame::as_png(png, *width, *height, ExtendedColorType::Rgba8)
                    .map_err(encode_error)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::new();
        IcoEncoder::new(&mut out)
            .encode_images(&ico_frames)
            .map_err(encode_error)?;
        Ok(out)
    }
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, RenderError> {
    image::load_from_memory(bytes).map_err(|e| RenderError::Decode {
        reason: e.to_string(),
    })
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(encode_error)?;
    Ok(buf)
}

fn encode_error(e: image::ImageError) -> RenderError {
    RenderError::Encode {
        reason: e.to_string(),
    }
}
