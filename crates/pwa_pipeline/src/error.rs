//! Error types for asset generation.

use std::path::PathBuf;

use pwa_config::ConfigError;

/// Errors raised by a [`RenderBackend`](crate::RenderBackend) or an
/// [`IcoAssembler`](crate::IcoAssembler).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The input could not be decoded as an image.
    #[error("failed to decode image: {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },

    /// The output could not be encoded.
    #[error("failed to encode image: {reason}")]
    Encode {
        /// Encoder message.
        reason: String,
    },

    /// The requested size cannot be produced.
    #[error("invalid target dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Errors returned by [`AssetPipeline`](crate::AssetPipeline) operations.
///
/// Cache problems never show up here: a corrupt entry is re-rendered and a
/// failed sweep is logged, neither fails a generation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The request kind is not one the pipeline knows.
    #[error("unknown asset request kind '{kind}'")]
    InvalidRequestKind {
        /// The kind as given by the caller.
        kind: String,
    },

    /// The operation needs a project root or explicit configuration and has neither.
    #[error("no project root or configuration available")]
    MissingProjectContext,

    /// The icon source shape cannot be used for this kind.
    #[error("an explicit icon list is only supported for splash screens, not {kind}")]
    UnsupportedSource {
        /// Kind the source was passed for.
        kind: String,
    },

    /// The source image could not be read.
    #[error("failed to read source image {path}: {source}")]
    SourceUnreadable {
        /// Resolved source path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Rendering one of the outputs failed; the whole call fails with it.
    #[error("failed to render {width}x{height}: {source}")]
    RenderFailure {
        /// Target width of the failed output.
        width: u32,
        /// Target height of the failed output.
        height: u32,
        /// Backend error.
        source: RenderError,
    },

    /// Assembling the ICO container failed.
    #[error("failed to assemble favicon.ico: {source}")]
    IcoAssembly {
        /// Assembler error.
        source: RenderError,
    },

    /// The project configuration could not be loaded.
    #[error(transparent)]
    Config(ConfigError),

    /// The web manifest could not be produced.
    #[error("failed to build manifest: {reason}")]
    Manifest {
        /// Description of the problem.
        reason: String,
    },
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingProjectContext => PipelineError::MissingProjectContext,
            other => PipelineError::Config(other),
        }
    }
}
