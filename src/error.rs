//! Error types for map loading and rendering.

/// Errors raised while building or replacing a [`HeightMap`](crate::HeightMap).
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("failed to decode map image: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors raised by a render pass. The frame buffer is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("invalid render target dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
