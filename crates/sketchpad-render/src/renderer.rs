//! Renderer errors and limits.

use thiserror::Error;

/// Largest accepted surface side, in pixels.
pub const MAX_SURFACE_SIZE: u32 = 8192;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Font error: {0}")]
    Font(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
