//! Terrain rendering into an owned pixel grid.
//!
//! - [`ColumnRenderer`]: front-to-back depth marching with per-column occlusion
//! - [`FrameBuffer`]: the row-major ARGB8888 output grid
//!
//! The renderer never touches a display; presenting the buffer is the caller's job.

mod column;
mod framebuffer;
mod parallel;

pub use column::{ColumnRenderer, RenderConfig, RenderOutcome};
pub use framebuffer::FrameBuffer;
